//! # Touch Controls
//!
//! On-screen movement pad and action buttons for touch devices. The mouse
//! doubles as a single touch so the controls also work on desktop.

use crate::input::PlayerInput;
use macroquad::prelude::*;

/// Buttons shown on the right-hand side, top to bottom.
const BUTTONS: [PlayerInput; 6] = [
    PlayerInput::Interact,
    PlayerInput::Craft,
    PlayerInput::Travel,
    PlayerInput::PreviousRecipe,
    PlayerInput::NextRecipe,
    PlayerInput::Talk,
];

/// Touch input gathered this frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchState {
    /// Pad vector while a finger rests on the pad
    pub move_vector: Option<(f32, f32)>,
    /// Buttons whose press started this frame
    pub pressed: Vec<PlayerInput>,
}

/// Converts a point on the pad into a move vector in `[-1, 1]²`.
///
/// Points outside the radius are projected onto the rim.
pub fn pad_vector(center: Vec2, radius: f32, point: Vec2) -> (f32, f32) {
    let offset = (point - center) / radius;
    let clamped = if offset.length() > 1.0 {
        offset.normalize()
    } else {
        offset
    };
    (clamped.x, clamped.y)
}

/// Screen-space layout of the touch controls.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchLayout {
    pub pad_center: Vec2,
    pub pad_radius: f32,
    pub buttons: Vec<(PlayerInput, Rect)>,
}

impl TouchLayout {
    /// Lays the controls out for a screen size.
    pub fn new(screen_w: f32, screen_h: f32) -> Self {
        let unit = (screen_h / 8.0).clamp(32.0, 72.0);
        let pad_radius = unit * 1.2;
        let pad_center = vec2(pad_radius + unit * 0.4, screen_h - pad_radius - unit * 0.4);

        let size = unit * 0.9;
        let gap = unit * 0.15;
        let x = screen_w - size - gap * 2.0;
        let top = screen_h - (size + gap) * BUTTONS.len() as f32 - gap;
        let buttons = BUTTONS
            .iter()
            .enumerate()
            .map(|(i, &action)| (action, Rect::new(x, top + i as f32 * (size + gap), size, size)))
            .collect();

        Self {
            pad_center,
            pad_radius,
            buttons,
        }
    }

    /// The button under a point, if any.
    pub fn button_at(&self, point: Vec2) -> Option<PlayerInput> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(action, _)| *action)
    }

    /// Whether a point is over the movement pad.
    pub fn on_pad(&self, point: Vec2) -> bool {
        point.distance(self.pad_center) <= self.pad_radius * 1.5
    }
}

/// Touch controls for the touch-focused variant.
#[derive(Debug, Clone)]
pub struct TouchUi {
    /// Whether the controls are drawn and polled
    pub enabled: bool,
    layout: TouchLayout,
}

impl Default for TouchUi {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchUi {
    /// Creates touch controls sized for the current screen.
    pub fn new() -> Self {
        Self {
            enabled: true,
            layout: TouchLayout::new(screen_width(), screen_height()),
        }
    }

    /// Reads touches (and the mouse) for this frame.
    pub fn poll(&mut self) -> TouchState {
        let mut state = TouchState::default();
        if !self.enabled {
            return state;
        }
        self.layout = TouchLayout::new(screen_width(), screen_height());

        let mut points: Vec<(Vec2, bool)> = touches()
            .into_iter()
            .filter(|touch| !matches!(touch.phase, TouchPhase::Ended | TouchPhase::Cancelled))
            .map(|touch| (touch.position, touch.phase == TouchPhase::Started))
            .collect();
        if is_mouse_button_down(MouseButton::Left) {
            let (x, y) = mouse_position();
            points.push((vec2(x, y), is_mouse_button_pressed(MouseButton::Left)));
        }

        for (point, started) in points {
            if self.layout.on_pad(point) {
                state.move_vector = Some(pad_vector(
                    self.layout.pad_center,
                    self.layout.pad_radius,
                    point,
                ));
            } else if started {
                if let Some(action) = self.layout.button_at(point) {
                    if !state.pressed.contains(&action) {
                        state.pressed.push(action);
                    }
                }
            }
        }
        state
    }

    /// Draws the pad and the buttons in screen space.
    pub fn draw(&self) {
        if !self.enabled {
            return;
        }
        let faint = Color::new(1.0, 1.0, 1.0, 0.15);
        let edge = Color::new(1.0, 1.0, 1.0, 0.4);

        draw_circle(
            self.layout.pad_center.x,
            self.layout.pad_center.y,
            self.layout.pad_radius,
            faint,
        );
        draw_circle_lines(
            self.layout.pad_center.x,
            self.layout.pad_center.y,
            self.layout.pad_radius,
            2.0,
            edge,
        );

        for (action, rect) in &self.layout.buttons {
            draw_rectangle(rect.x, rect.y, rect.w, rect.h, faint);
            draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 2.0, edge);
            let label = action.label();
            let size = rect.h * 0.4;
            let dims = measure_text(label, None, size as u16, 1.0);
            draw_text(
                label,
                rect.x + (rect.w - dims.width) / 2.0,
                rect.y + (rect.h + dims.offset_y) / 2.0,
                size,
                WHITE,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_vector_clamps_to_rim() {
        let center = vec2(100.0, 100.0);
        assert_eq!(pad_vector(center, 50.0, vec2(125.0, 100.0)), (0.5, 0.0));
        let (x, y) = pad_vector(center, 50.0, vec2(300.0, 100.0));
        assert!((x - 1.0).abs() < 1e-6);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn test_layout_buttons_do_not_overlap_pad() {
        let layout = TouchLayout::new(1024.0, 768.0);
        assert_eq!(layout.buttons.len(), BUTTONS.len());
        for (action, rect) in &layout.buttons {
            let center = rect.center();
            assert_eq!(layout.button_at(center), Some(*action));
            assert!(!layout.on_pad(center));
        }
        assert!(layout.on_pad(layout.pad_center));
        assert_eq!(layout.button_at(layout.pad_center), None);
    }
}

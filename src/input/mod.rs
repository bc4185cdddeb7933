//! # Input Module
//!
//! Turns keyboard and touch state into move intents and discrete actions.
//!
//! Movement is continuous: a vector in `[-1, 1]²` combining held keys and the
//! on-screen pad. Actions are edge-triggered and reported exactly once per
//! physical press.

use macroquad::prelude::*;

/// A discrete player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerInput {
    /// Harvest a nearby node, or talk if only an NPC is near
    Interact,
    /// Craft the selected recipe
    Craft,
    /// Sail to the next island
    Travel,
    /// Select the next recipe
    NextRecipe,
    /// Select the previous recipe
    PreviousRecipe,
    /// Talk to the island NPC
    Talk,
    /// Zoom the camera in
    ZoomIn,
    /// Zoom the camera out
    ZoomOut,
    /// Show help information
    Help,
    /// Quit the game
    Quit,
}

impl PlayerInput {
    /// Short label for touch buttons.
    pub fn label(self) -> &'static str {
        match self {
            PlayerInput::Interact => "E",
            PlayerInput::Craft => "C",
            PlayerInput::Travel => "SAIL",
            PlayerInput::NextRecipe => ">",
            PlayerInput::PreviousRecipe => "<",
            PlayerInput::Talk => "T",
            PlayerInput::ZoomIn => "+",
            PlayerInput::ZoomOut => "-",
            PlayerInput::Help => "?",
            PlayerInput::Quit => "X",
        }
    }
}

/// Builds a move vector from four held directions.
///
/// Opposite directions cancel out.
pub fn keyboard_vector(left: bool, right: bool, up: bool, down: bool) -> (f32, f32) {
    let axis = |neg: bool, pos: bool| match (neg, pos) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    };
    (axis(left, right), axis(up, down))
}

/// Adds keyboard and touch intents and clamps the result to the unit square.
pub fn combine_intents(keyboard: (f32, f32), touch: Option<(f32, f32)>) -> (f32, f32) {
    let (tx, ty) = touch.unwrap_or((0.0, 0.0));
    (
        (keyboard.0 + tx).clamp(-1.0, 1.0),
        (keyboard.1 + ty).clamp(-1.0, 1.0),
    )
}

/// Key bindings for discrete actions, checked in order.
const ACTION_KEYS: &[(KeyCode, PlayerInput)] = &[
    (KeyCode::Escape, PlayerInput::Quit),
    (KeyCode::F1, PlayerInput::Help),
    (KeyCode::E, PlayerInput::Interact),
    (KeyCode::C, PlayerInput::Craft),
    (KeyCode::Space, PlayerInput::Travel),
    (KeyCode::R, PlayerInput::NextRecipe),
    (KeyCode::Q, PlayerInput::PreviousRecipe),
    (KeyCode::T, PlayerInput::Talk),
    (KeyCode::Equal, PlayerInput::ZoomIn),
    (KeyCode::KpAdd, PlayerInput::ZoomIn),
    (KeyCode::Minus, PlayerInput::ZoomOut),
    (KeyCode::KpSubtract, PlayerInput::ZoomOut),
];

/// Input handler for processing player commands.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Whether the Vi-style movement keys (hjkl) also move the player
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: false,
        }
    }

    /// Current move intent from held keys plus an optional touch pad vector.
    pub fn move_intent(&self, touch: Option<(f32, f32)>) -> (f32, f32) {
        let held = |keys: &[KeyCode]| keys.iter().any(|&key| is_key_down(key));
        let vi = self.vi_keys_enabled;

        let left = held(&[KeyCode::Left, KeyCode::A]) || (vi && is_key_down(KeyCode::H));
        let right = held(&[KeyCode::Right, KeyCode::D]) || (vi && is_key_down(KeyCode::L));
        let up = held(&[KeyCode::Up, KeyCode::W]) || (vi && is_key_down(KeyCode::K));
        let down = held(&[KeyCode::Down, KeyCode::S]) || (vi && is_key_down(KeyCode::J));

        combine_intents(keyboard_vector(left, right, up, down), touch)
    }

    /// Actions pressed this frame, merged with touch presses, without
    /// duplicates.
    pub fn actions(&self, touch_pressed: &[PlayerInput]) -> Vec<PlayerInput> {
        let mut actions: Vec<PlayerInput> = Vec::new();
        let keyed = ACTION_KEYS
            .iter()
            .filter(|(key, _)| is_key_pressed(*key))
            .map(|(_, action)| *action);
        for action in keyed.chain(touch_pressed.iter().copied()) {
            if !actions.contains(&action) {
                actions.push(action);
            }
        }
        actions
    }
}

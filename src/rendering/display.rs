//! # Display Management
//!
//! Paints the current island, its entities, the player and the HUD with
//! macroquad.

use crate::config::TILE_SIZE;
use crate::game::{
    Direction, EntityCommand, EntityId, EntityKind, EntityVariant, GameSession, Island, ItemKind,
    Position, Quest, ResourceType, WorldPoint,
};
use crate::generation::{edge_blend, Biome, EdgeBlend};
use crate::rendering::TouchUi;
use macroquad::prelude::*;
use std::collections::HashMap;

/// Width of a blend strip in world units.
const BLEND_WIDTH: f32 = 3.0;

/// Converts `0xRRGGBB` into a macroquad color.
pub fn hex_color(rgb: u32) -> Color {
    Color::from_rgba(
        ((rgb >> 16) & 0xff) as u8,
        ((rgb >> 8) & 0xff) as u8,
        (rgb & 0xff) as u8,
        255,
    )
}

/// Darkens a color slightly per texture variant.
pub fn shade(color: Color, variant: u32) -> Color {
    let factor = 1.0 - 0.06 * variant as f32;
    Color::new(color.r * factor, color.g * factor, color.b * factor, color.a)
}

fn resource_color(kind: ResourceType) -> Color {
    match kind {
        ResourceType::Wood => hex_color(0x6b4528),
        ResourceType::Stone => hex_color(0x9097a3),
        ResourceType::Fiber => hex_color(0x79b34d),
    }
}

/// What the display knows about an entity, built from entity commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteInstance {
    pub kind: EntityKind,
    pub tile: Position,
    pub variant: EntityVariant,
}

/// Macroquad display manager for the game.
pub struct MacroquadDisplay {
    /// Sprites keyed by entity id
    pub sprites: HashMap<EntityId, SpriteInstance>,
    /// Message history
    pub messages: Vec<String>,
    /// Maximum number of messages to keep
    pub max_messages: usize,
    /// Touch controls
    pub ui: TouchUi,
    /// Whether the help overlay is shown
    pub show_help: bool,
}

impl Default for MacroquadDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroquadDisplay {
    /// Creates a new display manager.
    pub fn new() -> Self {
        Self {
            sprites: HashMap::new(),
            messages: Vec::new(),
            max_messages: 100,
            ui: TouchUi::new(),
            show_help: false,
        }
    }

    /// Applies entity commands from the session, in order.
    pub fn apply_commands(&mut self, commands: Vec<EntityCommand>) {
        for command in commands {
            match command {
                EntityCommand::Place { id, kind, tile } => {
                    self.sprites.insert(
                        id,
                        SpriteInstance {
                            kind,
                            tile,
                            variant: EntityVariant::Normal,
                        },
                    );
                }
                EntityCommand::Remove { id } => {
                    self.sprites.remove(&id);
                }
                EntityCommand::SetVariant { id, variant } => {
                    if let Some(sprite) = self.sprites.get_mut(&id) {
                        sprite.variant = variant;
                    }
                }
            }
        }
    }

    /// Adds a message to the message history.
    pub fn add_message(&mut self, message: String) {
        self.messages.push(message);

        if self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }

    /// Renders the complete frame.
    pub fn render(&self, session: &GameSession) {
        clear_background(hex_color(0x1f3f67));

        self.set_world_camera(session);
        self.render_terrain(session);
        self.render_sprites();
        self.render_player(session.player_position());

        set_default_camera();
        self.render_hud(session);
        if self.show_help {
            self.render_help();
        }
        self.ui.draw();
    }

    /// Fits the island to the screen, applies the session zoom and follows
    /// the player.
    fn set_world_camera(&self, session: &GameSession) {
        let island = session.island();
        let world_w = island.width as f32 * TILE_SIZE;
        let world_h = island.height as f32 * TILE_SIZE;
        let fit = (screen_width() / world_w).min(screen_height() / world_h);
        let scale = fit * session.camera_zoom();
        let view_w = screen_width() / scale;
        let view_h = screen_height() / scale;

        let player = session.player_position();
        let clamp_axis = |value: f32, view: f32, world: f32| {
            if view >= world {
                world / 2.0
            } else {
                value.clamp(view / 2.0, world - view / 2.0)
            }
        };

        set_camera(&Camera2D {
            target: vec2(
                clamp_axis(player.x, view_w, world_w),
                clamp_axis(player.y, view_h, world_h),
            ),
            zoom: vec2(2.0 / view_w, -2.0 / view_h),
            ..Default::default()
        });
    }

    fn render_terrain(&self, session: &GameSession) {
        let palette = session.island().palette;
        let biome_color = |biome: Biome| match biome {
            Biome::Grass => hex_color(palette.ground),
            Biome::Beach => hex_color(palette.beach),
            Biome::Water => hex_color(palette.water),
        };

        let terrain = session.terrain();
        for (pos, cell) in terrain.iter() {
            let x = pos.x as f32 * TILE_SIZE;
            let y = pos.y as f32 * TILE_SIZE;
            draw_rectangle(x, y, TILE_SIZE, TILE_SIZE, shade(biome_color(cell.biome), cell.variant));

            for blend in edge_blend(pos.x, pos.y, terrain) {
                Self::render_blend(x, y, blend, biome_color(blend.target));
            }
        }
    }

    fn render_blend(x: f32, y: f32, blend: EdgeBlend, color: Color) {
        let far = TILE_SIZE - BLEND_WIDTH;
        let (dx, dy, w, h) = match blend.direction {
            Direction::North => (0.0, 0.0, TILE_SIZE, BLEND_WIDTH),
            Direction::South => (0.0, far, TILE_SIZE, BLEND_WIDTH),
            Direction::West => (0.0, 0.0, BLEND_WIDTH, TILE_SIZE),
            Direction::East => (far, 0.0, BLEND_WIDTH, TILE_SIZE),
            Direction::Northwest => (0.0, 0.0, BLEND_WIDTH, BLEND_WIDTH),
            Direction::Northeast => (far, 0.0, BLEND_WIDTH, BLEND_WIDTH),
            Direction::Southwest => (0.0, far, BLEND_WIDTH, BLEND_WIDTH),
            Direction::Southeast => (far, far, BLEND_WIDTH, BLEND_WIDTH),
        };
        draw_rectangle(x + dx, y + dy, w, h, color);
    }

    fn render_sprites(&self) {
        for sprite in self.sprites.values() {
            let center = sprite.tile.center();
            match sprite.kind {
                EntityKind::Resource(kind) => {
                    let color = match sprite.variant {
                        EntityVariant::Normal => resource_color(kind),
                        EntityVariant::Depleted => Color::new(0.2, 0.2, 0.2, 0.35),
                    };
                    draw_rectangle(center.x - 5.0, center.y - 5.0, 10.0, 10.0, color);
                }
                EntityKind::Dock => {
                    draw_rectangle(center.x - 8.0, center.y - 12.0, 16.0, 24.0, hex_color(0x8c6a3b));
                }
                EntityKind::Bench => {
                    draw_rectangle(center.x - 8.0, center.y - 8.0, 16.0, 16.0, hex_color(0x59432b));
                }
                EntityKind::Npc => {
                    draw_circle(center.x, center.y, 6.0, hex_color(0x3b3f8c));
                    draw_circle(center.x, center.y - 4.0, 3.0, hex_color(0x1b1d40));
                }
            }
        }
    }

    fn render_player(&self, player: WorldPoint) {
        draw_circle(player.x, player.y, 6.0, hex_color(0xd63b3b));
        draw_line(player.x, player.y - 6.0, player.x, player.y + 6.0, 1.0, BLACK);
        for (ox, oy) in [(-3.0, -2.0), (3.0, -2.0), (-3.0, 3.0), (3.0, 3.0)] {
            draw_circle(player.x + ox, player.y + oy, 1.2, hex_color(0x111111));
        }
    }

    fn render_hud(&self, session: &GameSession) {
        let text = hex_color(0xf9f2d7);
        let line_height = 20.0;
        let mut line_y = 24.0;
        let mut line = |content: &str, size: f32, color: Color| {
            draw_text(content, 12.0, line_y, size, color);
            line_y += line_height;
        };

        line(&format!("Island: {}", session.island().name), 24.0, text);
        line(&format!("Materials  {}", session.inventory()), 18.0, text);

        let crafted = session.crafted();
        line(
            &format!(
                "Crafted    raft-kit:{} bug-lantern:{}",
                crafted.count(ItemKind::RaftKit),
                crafted.count(ItemKind::BugLantern)
            ),
            18.0,
            text,
        );

        let recipe = session.recipes().selected();
        line(
            &format!("Recipe     {} ({})", recipe.label, recipe.cost_summary()),
            18.0,
            text,
        );

        if let Some(quest) = quest_line(session.quest(), session.islands()) {
            line(&quest, 18.0, SKYBLUE);
        }

        let mut hints = Vec::new();
        if session.near_bench() {
            hints.push("C: craft");
        }
        if session.near_dock() {
            hints.push("SPACE: sail");
        }
        if session.near_npc() {
            hints.push("E/T: talk");
        }
        if !hints.is_empty() {
            line(&hints.join("  "), 18.0, GREEN);
        }

        draw_text(
            session.status(),
            12.0,
            screen_height() - 16.0,
            20.0,
            hex_color(0xffe39d),
        );
    }

    fn render_help(&self) {
        let lines = [
            "Move: WASD/Arrows or the pad",
            "Harvest/talk: E   Craft: C   Sail: SPACE",
            "Recipe: Q / R   Talk: T   Zoom: + / -",
            "Help: F1   Quit: ESC",
        ];
        let top = screen_height() / 2.0 - 50.0;
        draw_rectangle(40.0, top - 28.0, screen_width() - 80.0, 110.0, Color::new(0.0, 0.0, 0.0, 0.7));
        for (i, text) in lines.iter().enumerate() {
            draw_text(text, 56.0, top + i as f32 * 22.0, 20.0, WHITE);
        }
    }
}

/// HUD quest line. Names the island whose resident asked for the lantern.
pub fn quest_line(quest: Quest, islands: &[Island]) -> Option<String> {
    match quest {
        Quest::Dormant => None,
        Quest::Requested => {
            let target = islands
                .iter()
                .find(|island| island.npc.is_some())
                .map_or("the lantern keeper", |island| island.name.as_str());
            Some(format!("Quest      bring a Bug Lantern to {}", target))
        }
        Quest::Delivered => Some("Quest      lantern delivered".to_string()),
    }
}

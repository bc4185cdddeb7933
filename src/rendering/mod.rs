//! # Rendering Module
//!
//! Macroquad presentation: island painting, entity sprites, HUD and touch
//! controls. Consumes the session read-only plus the entity command stream.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;

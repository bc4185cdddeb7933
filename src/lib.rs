//! # Ladybug Isles
//!
//! A small top-down exploration and crafting game: a ladybug roams procedurally
//! painted islands, gathers wood, stone and fiber, crafts items at a bench and
//! sails from island to island.
//!
//! ## Architecture Overview
//!
//! The crate is split into a headless core and a thin presentation layer:
//!
//! - **Game**: the gameplay rules engine (inventory, recipes, quest, travel) and
//!   the explicit [`GameSession`] that owns all mutable state
//! - **Generation**: the deterministic terrain classifier that turns an island
//!   seed into a biome grid with texture variants and edge blends
//! - **Input / Rendering / Scenes**: macroquad collaborators that read intents,
//!   paint the island and drive the per-frame tick
//!
//! The core never performs I/O on its own. Persistence goes through
//! [`GameSession::snapshot`] and [`GameSession::restore`], which the scene layer
//! calls on a timer, after mutations and on shutdown.

pub mod config;
pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod scenes;

pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;

pub use config::{GameConfig, RulesConfig};
pub use scenes::SceneManager;

/// Core error type for Ladybug Isles.
///
/// The pure rule functions report gameplay refusals (standing too far from
/// the bench, missing materials) as [`RuleViolation`] values. `GameSession`
/// actions surface those as [`IslesError::Rule`], next to I/O failures,
/// corrupt data and caller bugs.
#[derive(thiserror::Error, Debug)]
pub enum IslesError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// A recipe index outside the fixed catalog was requested
    #[error("Recipe index {index} is outside the catalog of {len} recipes")]
    RecipeOutOfBounds { index: usize, len: usize },

    /// Terrain generation produced an unusable island
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Configuration file could not be used
    #[error("Configuration error: {0}")]
    Config(String),

    /// A gameplay rule rejected the action
    #[error("Rule violation: {0}")]
    Rule(#[from] RuleViolation),
}

/// Result type used throughout the Ladybug Isles codebase.
pub type IslesResult<T> = Result<T, IslesError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

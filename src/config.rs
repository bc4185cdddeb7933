//! # Configuration
//!
//! Compile-time defaults plus the runtime [`GameConfig`], which can be loaded
//! from a JSON file and is then overridden by command line flags.

use crate::generation::TerrainConfig;
use crate::{IslesError, IslesResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Size of one map tile in world units.
pub const TILE_SIZE: f32 = 16.0;

/// Island grid width in tiles.
pub const ISLAND_WIDTH: u32 = 20;

/// Island grid height in tiles.
pub const ISLAND_HEIGHT: u32 = 12;

/// Default seconds between periodic autosaves.
pub const DEFAULT_AUTOSAVE_SECS: f32 = 10.0;

/// Default save file location, relative to the working directory.
pub const DEFAULT_SAVE_PATH: &str = "ladybug-isles-save.json";

/// Camera zoom used when no save provides one.
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Distances and speeds used by the gameplay rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Maximum distance from a resource node to harvest it
    pub harvest_radius: f32,
    /// Maximum distance from the craft bench to craft
    pub bench_radius: f32,
    /// Maximum distance from the dock to set sail
    pub dock_radius: f32,
    /// Maximum distance from the NPC to talk
    pub npc_radius: f32,
    /// Player speed in world units per second
    pub move_speed: f32,
    /// Smallest allowed camera zoom
    pub min_zoom: f32,
    /// Largest allowed camera zoom
    pub max_zoom: f32,
    /// Zoom change per key press
    pub zoom_step: f32,
    /// Fiber granted when the lantern quest is completed
    pub quest_reward_fiber: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            harvest_radius: 24.0,
            bench_radius: 28.0,
            dock_radius: 28.0,
            npc_radius: 34.0,
            move_speed: 60.0,
            min_zoom: 0.75,
            max_zoom: 2.25,
            zoom_step: 0.25,
            quest_reward_fiber: 2,
        }
    }
}

impl RulesConfig {
    /// Clamps a zoom value into the allowed range.
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        if zoom.is_nan() {
            return DEFAULT_ZOOM.clamp(self.min_zoom, self.max_zoom);
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

/// Runtime configuration for a play session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Interaction radii and movement
    pub rules: RulesConfig,
    /// Terrain classifier thresholds
    pub terrain: TerrainConfig,
    /// Added to every island seed; 0 keeps the stock islands
    pub seed_offset: u32,
    /// Seconds between periodic autosaves
    pub autosave_secs: f32,
    /// Where the session is persisted; `None` disables saving
    pub save_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            terrain: TerrainConfig::default(),
            seed_offset: 0,
            autosave_secs: DEFAULT_AUTOSAVE_SECS,
            save_path: Some(PathBuf::from(DEFAULT_SAVE_PATH)),
        }
    }
}

impl GameConfig {
    /// Creates a configuration for tests: no save file, default rules.
    pub fn for_testing() -> Self {
        Self {
            save_path: None,
            ..Self::default()
        }
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn load(path: &Path) -> IslesResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&text)?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Checks that the configuration is internally consistent.
    pub fn validate(&self) -> IslesResult<()> {
        let rules = &self.rules;
        if rules.min_zoom <= 0.0 || rules.min_zoom > rules.max_zoom {
            return Err(IslesError::Config(format!(
                "invalid zoom range [{}, {}]",
                rules.min_zoom, rules.max_zoom
            )));
        }
        if rules.move_speed < 0.0 {
            return Err(IslesError::Config("move speed must not be negative".to_string()));
        }
        if self.terrain.grass_threshold >= self.terrain.beach_threshold {
            return Err(IslesError::Config(
                "grass threshold must be below beach threshold".to_string(),
            ));
        }
        if self.autosave_secs <= 0.0 {
            return Err(IslesError::Config("autosave interval must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
        assert!(GameConfig::for_testing().save_path.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "rules": { "harvest_radius": 30.0 } }"#).unwrap();
        assert_eq!(config.rules.harvest_radius, 30.0);
        assert_eq!(config.rules.npc_radius, 34.0);
        assert_eq!(config.terrain, TerrainConfig::default());
    }

    #[test]
    fn test_invalid_zoom_range_rejected() {
        let mut config = GameConfig::default();
        config.rules.min_zoom = 3.0;
        assert!(matches!(config.validate(), Err(IslesError::Config(_))));
    }

    #[test]
    fn test_clamp_zoom() {
        let rules = RulesConfig::default();
        assert_eq!(rules.clamp_zoom(5.0), 2.25);
        assert_eq!(rules.clamp_zoom(0.1), 0.75);
        assert_eq!(rules.clamp_zoom(1.5), 1.5);
        assert_eq!(rules.clamp_zoom(f32::NAN), 1.0);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "seed_offset": 7, "save_path": null }"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.seed_offset, 7);
        assert!(config.save_path.is_none());
    }
}

//! # Generation Module
//!
//! Deterministic terrain generation for islands.
//!
//! Every island is painted from its seed alone: a radial falloff with a hashed
//! perturbation decides water, beach or grass for each tile, a second hash
//! picks a texture variant, and a neighbor scan reports where the renderer
//! should blend biome borders. Nothing here is stored; the grid is rebuilt
//! whenever an island loads.

pub mod blending;
pub mod terrain;

pub use blending::*;
pub use terrain::*;

use crate::game::Island;
use crate::IslesResult;
use serde::{Deserialize, Serialize};

/// Thresholds and variant settings for the terrain classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Perturbed distance below which a tile is grass
    pub grass_threshold: f32,
    /// Perturbed distance below which a tile is beach
    pub beach_threshold: f32,
    /// Scale applied to the normalized horizontal offset
    pub horizontal_falloff: f32,
    /// Scale applied to the normalized vertical offset
    pub vertical_falloff: f32,
    /// Maximum absolute noise added to the distance
    pub noise_amplitude: f32,
    /// Number of grass texture variants
    pub grass_variants: u32,
    /// Number of beach texture variants
    pub beach_variants: u32,
    /// Number of water texture variants
    pub water_variants: u32,
}

impl TerrainConfig {
    /// Creates the stock configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use ladybug_isles::TerrainConfig;
    ///
    /// let config = TerrainConfig::new();
    /// assert!(config.grass_threshold < config.beach_threshold);
    /// // Islands read as wide, not round
    /// assert!(config.horizontal_falloff < config.vertical_falloff);
    /// ```
    pub fn new() -> Self {
        Self {
            grass_threshold: 0.98,
            beach_threshold: 1.24,
            horizontal_falloff: 1.35,
            vertical_falloff: 1.6,
            noise_amplitude: 0.09,
            grass_variants: 4,
            beach_variants: 3,
            water_variants: 3,
        }
    }

    /// A configuration without noise, for predictable test maps.
    pub fn for_testing() -> Self {
        Self {
            noise_amplitude: 0.0,
            ..Self::new()
        }
    }

    /// Number of texture variants for a biome.
    pub fn variant_count(&self, biome: Biome) -> u32 {
        match biome {
            Biome::Grass => self.grass_variants,
            Biome::Beach => self.beach_variants,
            Biome::Water => self.water_variants,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for procedural generators.
///
/// Generators are pure: the same island always yields the same content.
pub trait Generator<T> {
    /// Generates content for an island.
    fn generate(&self, island: &Island) -> IslesResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, island: &Island) -> IslesResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_counts() {
        let config = TerrainConfig::new();
        assert_eq!(config.variant_count(Biome::Grass), 4);
        assert_eq!(config.variant_count(Biome::Beach), 3);
        assert_eq!(config.variant_count(Biome::Water), 3);
    }

    #[test]
    fn test_testing_config_has_no_noise() {
        let config = TerrainConfig::for_testing();
        assert_eq!(config.noise_amplitude, 0.0);
        assert_eq!(config.grass_threshold, TerrainConfig::new().grass_threshold);
    }
}

//! # Terrain Classification
//!
//! Maps every tile of an island grid to a biome and a texture variant.
//!
//! The landmass is an ellipse: the tile's offset from the grid center is
//! normalized by the half extents, scaled more gently horizontally than
//! vertically, and perturbed by a bounded hash of `(x, y, seed)`. Two fixed
//! thresholds then cut grass from beach and beach from water, which leaves a
//! beach ring of roughly even width.

use crate::game::{Island, Position};
use crate::generation::{Generator, TerrainConfig};
use crate::{IslesError, IslesResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

const GRASS_VARIANT_SALT: u32 = 0x6a09_e667;
const BEACH_VARIANT_SALT: u32 = 0xbb67_ae85;
const WATER_VARIANT_SALT: u32 = 0x3c6e_f372;

/// Terrain classification of a tile.
///
/// Ordered by layering: water sits below beach, beach below grass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Biome {
    Water,
    Beach,
    Grass,
}

impl Biome {
    /// Whether the player can stand on this biome.
    pub fn is_walkable(self) -> bool {
        self != Biome::Water
    }

    fn variant_salt(self) -> u32 {
        match self {
            Biome::Grass => GRASS_VARIANT_SALT,
            Biome::Beach => BEACH_VARIANT_SALT,
            Biome::Water => WATER_VARIANT_SALT,
        }
    }
}

/// Deterministic 32-bit hash of a tile coordinate and a seed.
pub fn hash_tile(x: i32, y: i32, seed: u32) -> u32 {
    let mut h = seed ^ 0x9e37_79b9;
    h ^= (x as u32).wrapping_mul(0x85eb_ca6b);
    h = h.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    h ^= (y as u32).wrapping_mul(0xc2b2_ae35);
    h = h.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);

    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Hash of a tile mapped into `[0, 1)`.
pub fn unit_noise(x: i32, y: i32, seed: u32) -> f32 {
    (hash_tile(x, y, seed) >> 8) as f32 / (1u32 << 24) as f32
}

/// Perturbed, anisotropic distance of a tile from the grid center.
///
/// Roughly 0 at the center and 1 near the grass edge.
pub fn island_distance(x: i32, y: i32, seed: u32, width: u32, height: u32, config: &TerrainConfig) -> f32 {
    let half_w = ((width as f32 - 1.0) / 2.0).max(1.0);
    let half_h = ((height as f32 - 1.0) / 2.0).max(1.0);
    let nx = (x as f32 - (width as f32 - 1.0) / 2.0) / half_w * config.horizontal_falloff;
    let ny = (y as f32 - (height as f32 - 1.0) / 2.0) / half_h * config.vertical_falloff;
    let offset = (unit_noise(x, y, seed) - 0.5) * 2.0 * config.noise_amplitude;
    nx.hypot(ny) + offset
}

/// Classifies one tile.
///
/// # Examples
///
/// ```
/// use ladybug_isles::{classify, Biome, TerrainConfig};
///
/// let config = TerrainConfig::new();
/// assert_eq!(classify(10, 6, 42, 21, 13, &config), Biome::Grass);
/// assert_eq!(classify(0, 0, 42, 21, 13, &config), Biome::Water);
/// ```
pub fn classify(x: i32, y: i32, seed: u32, width: u32, height: u32, config: &TerrainConfig) -> Biome {
    let d = island_distance(x, y, seed, width, height, config);
    if d < config.grass_threshold {
        Biome::Grass
    } else if d < config.beach_threshold {
        Biome::Beach
    } else {
        Biome::Water
    }
}

/// Picks a texture variant in `[0, count)`. Counts of 0 or 1 always yield 0.
pub fn variant(x: i32, y: i32, count: u32, seed: u32) -> u32 {
    if count <= 1 {
        return 0;
    }
    hash_tile(x, y, seed) % count
}

/// Variant for a tile of a given biome, salted per biome so the grass, beach
/// and water patterns are independent.
pub fn biome_variant(x: i32, y: i32, biome: Biome, island_seed: u32, config: &TerrainConfig) -> u32 {
    variant(
        x,
        y,
        config.variant_count(biome),
        island_seed ^ biome.variant_salt(),
    )
}

/// Classification of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerrainCell {
    pub biome: Biome,
    pub variant: u32,
}

/// Biome classification for a whole island. Derived and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomeGrid {
    pub width: u32,
    pub height: u32,
    cells: Vec<TerrainCell>,
}

impl BiomeGrid {
    /// Classifies every tile of a `width` x `height` grid.
    pub fn classify(width: u32, height: u32, seed: u32, config: &TerrainConfig) -> Self {
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let biome = classify(x, y, seed, width, height, config);
                cells.push(TerrainCell {
                    biome,
                    variant: biome_variant(x, y, biome, seed, config),
                });
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x as u32 >= self.width || pos.y as u32 >= self.height {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Gets the cell at a tile.
    pub fn get(&self, pos: Position) -> Option<&TerrainCell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    /// Biome at a tile; tiles outside the grid are open water.
    pub fn biome_at(&self, pos: Position) -> Biome {
        self.get(pos).map_or(Biome::Water, |cell| cell.biome)
    }

    /// Whether the player may stand on a tile.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.biome_at(pos).is_walkable()
    }

    /// Number of tiles of a biome.
    pub fn count(&self, biome: Biome) -> usize {
        self.cells.iter().filter(|cell| cell.biome == biome).count()
    }

    /// Iterates over `(position, cell)` pairs row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &TerrainCell)> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            (Position::new((i % width) as i32, (i / width) as i32), cell)
        })
    }

    /// Raises a water tile to beach. Land tiles are left alone.
    fn ensure_land(&mut self, pos: Position, seed: u32, config: &TerrainConfig) -> bool {
        let Some(index) = self.index(pos) else {
            return false;
        };
        if self.cells[index].biome != Biome::Water {
            return false;
        }
        self.cells[index] = TerrainCell {
            biome: Biome::Beach,
            variant: biome_variant(pos.x, pos.y, Biome::Beach, seed, config),
        };
        true
    }

    /// Walkable tiles reachable from `start` through orthogonal steps.
    pub fn reachable_from(&self, start: Position) -> HashSet<Position> {
        let mut seen = HashSet::new();
        if !self.is_walkable(start) {
            return seen;
        }
        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some(pos) = queue.pop_front() {
            for dir in crate::game::Direction::cardinal() {
                let next = pos + dir.to_delta();
                if self.is_walkable(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }
}

/// Generates the biome grid of an island.
///
/// Hotspot tiles (spawn, dock, bench, NPC, resources) that land in the water
/// are raised to beach so every island stays playable.
#[derive(Debug, Clone, Default)]
pub struct IslandTerrainGenerator {
    /// Classifier thresholds
    pub config: TerrainConfig,
    /// Mixed into every island seed
    pub seed_offset: u32,
}

impl IslandTerrainGenerator {
    /// Creates a generator.
    pub fn new(config: TerrainConfig, seed_offset: u32) -> Self {
        Self {
            config,
            seed_offset,
        }
    }

    /// The seed actually used for an island.
    pub fn island_seed(&self, island: &Island) -> u32 {
        island.seed.wrapping_add(self.seed_offset)
    }
}

impl Generator<BiomeGrid> for IslandTerrainGenerator {
    fn generate(&self, island: &Island) -> IslesResult<BiomeGrid> {
        let seed = self.island_seed(island);
        let mut grid = BiomeGrid::classify(island.width, island.height, seed, &self.config);

        let repaired = island
            .hotspot_tiles()
            .into_iter()
            .filter(|&tile| grid.ensure_land(tile, seed, &self.config))
            .count();
        if repaired > 0 {
            debug!(
                "{}: raised {} hotspot tiles to beach on {}",
                self.generator_type(),
                repaired,
                island.name
            );
        }

        self.validate(&grid, island)?;
        Ok(grid)
    }

    fn validate(&self, grid: &BiomeGrid, island: &Island) -> IslesResult<()> {
        if grid.width != island.width || grid.height != island.height {
            return Err(IslesError::GenerationFailed(format!(
                "{}: {} grid is {}x{}, expected {}x{}",
                self.generator_type(),
                island.name,
                grid.width,
                grid.height,
                island.width,
                island.height
            )));
        }
        if grid.count(Biome::Water) == grid.cells.len() {
            return Err(IslesError::GenerationFailed(format!(
                "{}: {} has no land",
                self.generator_type(),
                island.name
            )));
        }

        let reachable = grid.reachable_from(island.spawn);
        for tile in [island.dock, island.bench] {
            if !reachable.contains(&tile) {
                return Err(IslesError::GenerationFailed(format!(
                    "{}: {:?} on {} cannot be reached from the spawn",
                    self.generator_type(),
                    tile,
                    island.name
                )));
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "IslandTerrainGenerator"
    }
}

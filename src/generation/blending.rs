//! # Edge Blending
//!
//! Advisory output for the renderer: where a tile borders a lower biome and
//! should get a strip (orthogonal) or corner (diagonal) in that biome's color.
//! Has no effect on gameplay.

use crate::game::{Direction, Position};
use crate::generation::{Biome, BiomeGrid};

/// One border piece the renderer should paint on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeBlend {
    /// Side or corner of the tile
    pub direction: Direction,
    /// Biome whose color bleeds in
    pub target: Biome,
}

/// Lists the blend pieces for the tile at `(x, y)`.
///
/// A neighbor contributes when its biome sits lower in the layering
/// (grass over beach over water). Tiles outside the grid count as water.
/// Diagonal neighbors only produce a corner when neither adjoining side
/// already produced a strip, so corners never double up with edges.
///
/// # Examples
///
/// ```
/// use ladybug_isles::{edge_blend, BiomeGrid, Biome, Direction, TerrainConfig};
///
/// let grid = BiomeGrid::classify(20, 12, 1, &TerrainConfig::for_testing());
/// // The top-left tile is open water: nothing lies below it
/// assert!(edge_blend(0, 0, &grid).is_empty());
/// ```
pub fn edge_blend(x: i32, y: i32, grid: &BiomeGrid) -> Vec<EdgeBlend> {
    let pos = Position::new(x, y);
    let own = grid.biome_at(pos);
    let lower = |dir: Direction| {
        let neighbor = grid.biome_at(pos + dir.to_delta());
        (neighbor < own).then_some(neighbor)
    };

    let mut blends: Vec<EdgeBlend> = Direction::cardinal()
        .into_iter()
        .filter_map(|direction| lower(direction).map(|target| EdgeBlend { direction, target }))
        .collect();

    for direction in Direction::all().into_iter().filter(|d| d.is_diagonal()) {
        let Some(target) = lower(direction) else {
            continue;
        };
        let Some((a, b)) = direction.components() else {
            continue;
        };
        let side_taken = blends.iter().any(|blend| blend.direction == a || blend.direction == b);
        if !side_taken {
            blends.push(EdgeBlend { direction, target });
        }
    }

    blends
}

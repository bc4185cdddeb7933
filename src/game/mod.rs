//! # Game Module
//!
//! The gameplay rules engine and the session state it operates on.
//!
//! This module contains the fundamental building blocks of Ladybug Isles:
//! - Inventory and resource types
//! - The recipe catalog and crafting
//! - Island definitions and resource nodes
//! - The lantern quest
//! - Pure rule functions and the [`GameSession`] that wraps them
//! - Snapshot/restore persistence

pub mod crafting;
pub mod entities;
pub mod islands;
pub mod quest;
pub mod resources;
pub mod rules;
pub mod save;
pub mod state;

pub use crafting::*;
pub use entities::*;
pub use islands::*;
pub use quest::*;
pub use resources::*;
pub use rules::*;
pub use save::*;
pub use state::*;

use crate::config::TILE_SIZE;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a tile coordinate on an island grid.
///
/// # Examples
///
/// ```
/// use ladybug_isles::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// let neighbor = pos + ladybug_isles::Direction::East.to_delta();
/// assert_eq!(neighbor, Position::new(11, 5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the world-space center of this tile.
    pub fn center(self) -> WorldPoint {
        WorldPoint::new(
            self.x as f32 * TILE_SIZE + TILE_SIZE / 2.0,
            self.y as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        )
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// A point in continuous world space (tiles are [`TILE_SIZE`] units wide).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new world point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculates the Euclidean distance to another point.
    ///
    /// # Examples
    ///
    /// ```
    /// use ladybug_isles::WorldPoint;
    ///
    /// let a = WorldPoint::new(0.0, 0.0);
    /// let b = WorldPoint::new(3.0, 4.0);
    /// assert_eq!(a.distance(b), 5.0);
    /// ```
    pub fn distance(self, other: WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the tile that contains this point.
    pub fn tile(self) -> Position {
        Position::new(
            (self.x / TILE_SIZE).floor() as i32,
            (self.y / TILE_SIZE).floor() as i32,
        )
    }
}

/// Directions for neighbor lookups and edge blending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use ladybug_isles::{Direction, Position};
    ///
    /// let delta = Direction::North.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::South => Position::new(0, 1),
            Direction::East => Position::new(1, 0),
            Direction::West => Position::new(-1, 0),
            Direction::Northeast => Position::new(1, -1),
            Direction::Northwest => Position::new(-1, -1),
            Direction::Southeast => Position::new(1, 1),
            Direction::Southwest => Position::new(-1, 1),
        }
    }

    /// Returns all 8 directions, cardinals first.
    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::Northeast,
            Direction::Northwest,
            Direction::Southeast,
            Direction::Southwest,
        ]
    }

    /// Returns only the 4 cardinal directions.
    pub fn cardinal() -> [Direction; 4] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }

    /// Whether this is one of the four diagonals.
    pub fn is_diagonal(self) -> bool {
        !matches!(
            self,
            Direction::North | Direction::South | Direction::East | Direction::West
        )
    }

    /// Splits a diagonal into its two cardinal components.
    ///
    /// Cardinal directions return `None`.
    pub fn components(self) -> Option<(Direction, Direction)> {
        match self {
            Direction::Northeast => Some((Direction::North, Direction::East)),
            Direction::Northwest => Some((Direction::North, Direction::West)),
            Direction::Southeast => Some((Direction::South, Direction::East)),
            Direction::Southwest => Some((Direction::South, Direction::West)),
            _ => None,
        }
    }
}

/// Unique identifier for entities the presentation layer draws.
pub type EntityId = Uuid;

/// Creates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_arithmetic() {
        let pos1 = Position::new(5, 10);
        let pos2 = Position::new(3, 2);
        assert_eq!(pos1 + pos2, Position::new(8, 12));
        assert_eq!(pos1 - pos2, Position::new(2, 8));
    }

    #[test]
    fn test_tile_center_round_trip() {
        let tile = Position::new(4, 7);
        let center = tile.center();
        assert_eq!(center, WorldPoint::new(72.0, 120.0));
        assert_eq!(center.tile(), tile);
    }

    #[test]
    fn test_world_point_distance() {
        let a = WorldPoint::new(1.0, 1.0);
        let b = WorldPoint::new(4.0, 5.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn test_direction_components() {
        assert_eq!(
            Direction::Southwest.components(),
            Some((Direction::South, Direction::West))
        );
        assert_eq!(Direction::North.components(), None);
        assert!(Direction::Northeast.is_diagonal());
        assert!(!Direction::East.is_diagonal());

        for dir in Direction::all() {
            if let Some((a, b)) = dir.components() {
                assert_eq!(a.to_delta() + b.to_delta(), dir.to_delta());
            }
        }
    }

    #[test]
    fn test_entity_id_uniqueness() {
        let id1 = new_entity_id();
        let id2 = new_entity_id();
        assert_ne!(id1, id2);
    }
}

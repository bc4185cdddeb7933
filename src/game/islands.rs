//! # Islands
//!
//! Static island definitions and the per-visit resource nodes spawned from
//! them.

use crate::config::{ISLAND_HEIGHT, ISLAND_WIDTH};
use crate::game::resources::ResourceType;
use crate::game::{EntityId, Position, WorldPoint};

/// Colors used to paint an island. Not gameplay relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IslandPalette {
    pub ground: u32,
    pub beach: u32,
    pub water: u32,
}

/// Where a resource node is placed when the island loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpawn {
    pub kind: ResourceType,
    pub tile: Position,
}

/// The island's resident NPC, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcSpawn {
    pub name: String,
    pub tile: Position,
}

/// A named, self-contained level area.
///
/// Islands are immutable and defined at startup; their order in the catalog
/// is the sailing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Island {
    /// Display name
    pub name: String,
    /// Terrain seed
    pub seed: u32,
    /// Grid width in tiles
    pub width: u32,
    /// Grid height in tiles
    pub height: u32,
    /// Paint colors
    pub palette: IslandPalette,
    /// Where the player appears on arrival
    pub spawn: Position,
    /// Travel hotspot
    pub dock: Position,
    /// Crafting hotspot
    pub bench: Position,
    /// Optional quest giver
    pub npc: Option<NpcSpawn>,
    /// Resource layout
    pub resources: Vec<ResourceSpawn>,
}

impl Island {
    /// Every tile that must stay walkable for the island to be playable.
    pub fn hotspot_tiles(&self) -> Vec<Position> {
        let mut tiles = vec![self.spawn, self.dock, self.bench];
        if let Some(npc) = &self.npc {
            tiles.push(npc.tile);
        }
        tiles.extend(self.resources.iter().map(|r| r.tile));
        tiles
    }

    /// Whether a tile lies inside the island grid.
    pub fn contains(&self, tile: Position) -> bool {
        tile.x >= 0 && tile.y >= 0 && (tile.x as u32) < self.width && (tile.y as u32) < self.height
    }
}

fn spawn(kind: ResourceType, x: i32, y: i32) -> ResourceSpawn {
    ResourceSpawn {
        kind,
        tile: Position::new(x, y),
    }
}

/// The stock island catalog, in travel order.
pub fn default_islands() -> Vec<Island> {
    use ResourceType::{Fiber, Stone, Wood};

    let shell = |name: &str, seed: u32, palette: IslandPalette| Island {
        name: name.to_string(),
        seed,
        width: ISLAND_WIDTH,
        height: ISLAND_HEIGHT,
        palette,
        spawn: Position::new(10, 5),
        dock: Position::new(17, 5),
        bench: Position::new(2, 5),
        npc: None,
        resources: Vec::new(),
    };

    vec![
        Island {
            resources: vec![
                spawn(Wood, 5, 5),
                spawn(Wood, 9, 3),
                spawn(Fiber, 13, 6),
                spawn(Fiber, 11, 8),
                spawn(Stone, 7, 8),
            ],
            ..shell(
                "Mossy Nest",
                0x1a2b_3c4d,
                IslandPalette {
                    ground: 0x6baf57,
                    beach: 0xd9c58c,
                    water: 0x2d5f8d,
                },
            )
        },
        Island {
            npc: Some(NpcSpawn {
                name: "Old Beetle".to_string(),
                tile: Position::new(12, 3),
            }),
            resources: vec![
                spawn(Stone, 5, 4),
                spawn(Stone, 11, 6),
                spawn(Wood, 8, 7),
                spawn(Fiber, 14, 5),
            ],
            ..shell(
                "Pebble Ring",
                0x5e6f_7081,
                IslandPalette {
                    ground: 0x79c7b0,
                    beach: 0xe3d4a6,
                    water: 0x2a6a94,
                },
            )
        },
        Island {
            resources: vec![
                spawn(Fiber, 6, 6),
                spawn(Fiber, 14, 6),
                spawn(Wood, 10, 4),
                spawn(Stone, 10, 8),
            ],
            ..shell(
                "Sunset Atoll",
                0x9192_a3b4,
                IslandPalette {
                    ground: 0x91b35e,
                    beach: 0xe8d89f,
                    water: 0x33598a,
                },
            )
        },
    ]
}

/// A harvestable point of interest on the current island.
///
/// Nodes are recreated every time an island loads, so the harvested flag
/// only lives for one visit.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    /// Presentation handle
    pub entity: EntityId,
    /// Material yielded
    pub kind: ResourceType,
    /// Tile position
    pub tile: Position,
    /// One-way false to true
    pub harvested: bool,
}

impl ResourceNode {
    /// Creates an un-harvested node.
    pub fn new(entity: EntityId, kind: ResourceType, tile: Position) -> Self {
        Self {
            entity,
            kind,
            tile,
            harvested: false,
        }
    }

    /// World-space center of the node.
    pub fn position(&self) -> WorldPoint {
        self.tile.center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        let islands = default_islands();
        assert_eq!(islands.len(), 3);
        assert_eq!(islands[0].name, "Mossy Nest");
        assert_eq!(islands[0].resources.len(), 5);
        assert!(islands.iter().all(|i| i.resources.len() >= 4));
        assert_eq!(islands.iter().filter(|i| i.npc.is_some()).count(), 1);
    }

    #[test]
    fn test_hotspots_inside_grid() {
        for island in default_islands() {
            for tile in island.hotspot_tiles() {
                assert!(island.contains(tile), "{} has {:?} outside", island.name, tile);
            }
        }
    }

    #[test]
    fn test_seeds_are_distinct() {
        let islands = default_islands();
        assert_ne!(islands[0].seed, islands[1].seed);
        assert_ne!(islands[1].seed, islands[2].seed);
    }
}

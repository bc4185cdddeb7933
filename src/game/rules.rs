//! # Gameplay Rules
//!
//! Pure decision functions: each one checks its preconditions and then applies
//! an all-or-nothing mutation to the state it was handed. None of them touch
//! rendering, input or timing, so they can be tested without a window.

use crate::game::crafting::{CraftedCounts, ItemKind, Recipe};
use crate::game::islands::ResourceNode;
use crate::game::quest::Quest;
use crate::game::resources::{Inventory, ResourceAmount, ResourceType};
use crate::game::{EntityId, Position, WorldPoint};
use log::debug;

/// Why an action was not performed. Never fatal; shown to the player.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("No resource nearby. Get close and press E.")]
    NothingToHarvest,

    #[error("Stand by the craft bench to craft.")]
    NotNearBench,

    #[error("Not enough materials: need {}.", format_missing(.missing))]
    InsufficientMaterials { missing: Vec<ResourceAmount> },

    #[error("Walk onto the dock to set sail.")]
    NotNearDock,

    #[error("Nobody close enough to talk to.")]
    NotNearNpc,

    #[error("Nobody lives on this island.")]
    NoNpcOnIsland,
}

fn format_missing(missing: &[ResourceAmount]) -> String {
    missing
        .iter()
        .map(|(resource, amount)| format!("{amount} more {resource}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// What a successful harvest produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestYield {
    pub kind: ResourceType,
    pub entity: EntityId,
    pub tile: Position,
}

/// Result of talking to the NPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpcOutcome {
    /// First conversation: the lantern was asked for
    Requested,
    /// The lantern was handed over and the reward granted
    Delivered { reward: ResourceAmount },
    /// Quest is requested but no lantern is in hand yet
    AwaitingLantern,
    /// Quest finished; flavor text only
    AlreadyHelped,
}

/// Harvests the nearest un-harvested node within `radius` of `player`.
///
/// Nodes are ranked strictly by distance; equal distances go to the node that
/// comes first in `nodes`. On success the node is marked harvested and one
/// unit of its resource is added to `inventory`.
pub fn harvest(
    player: WorldPoint,
    nodes: &mut [ResourceNode],
    radius: f32,
    inventory: &mut Inventory,
) -> Result<HarvestYield, RuleViolation> {
    let mut nearest: Option<(usize, f32)> = None;
    for (index, node) in nodes.iter().enumerate() {
        if node.harvested {
            continue;
        }
        let distance = player.distance(node.position());
        if distance > radius {
            continue;
        }
        match nearest {
            Some((_, best)) if best <= distance => {}
            _ => nearest = Some((index, distance)),
        }
    }

    let (index, distance) = nearest.ok_or(RuleViolation::NothingToHarvest)?;
    let node = &mut nodes[index];
    node.harvested = true;
    inventory.add(node.kind, 1);
    debug!("Harvested {} at {:?} (distance {:.1})", node.kind, node.tile, distance);

    Ok(HarvestYield {
        kind: node.kind,
        entity: node.entity,
        tile: node.tile,
    })
}

/// Crafts `recipe` at the bench.
///
/// Fails without touching anything if the player is away from the bench or
/// any material is short; otherwise the whole cost is deducted and the item
/// count goes up by one.
pub fn craft(
    recipe: &Recipe,
    inventory: &mut Inventory,
    crafted: &mut CraftedCounts,
    near_bench: bool,
) -> Result<ItemKind, RuleViolation> {
    if !near_bench {
        return Err(RuleViolation::NotNearBench);
    }
    inventory
        .try_spend(&recipe.cost)
        .map_err(|missing| RuleViolation::InsufficientMaterials { missing })?;
    crafted.increment(recipe.key);
    debug!("Crafted {} for {}", recipe.label, recipe.cost_summary());
    Ok(recipe.key)
}

/// Picks the island to sail to.
///
/// # Panics
///
/// Panics if `island_count` is zero.
pub fn travel(current: usize, island_count: usize, near_dock: bool) -> Result<usize, RuleViolation> {
    assert!(island_count > 0, "island catalog must not be empty");
    if !near_dock {
        return Err(RuleViolation::NotNearDock);
    }
    Ok((current + 1) % island_count)
}

/// Talks to the island NPC and advances the lantern quest.
///
/// The quest only moves forward: dormant to requested on the first talk,
/// requested to delivered once a bug lantern is in hand (it is consumed and
/// `reward_fiber` fiber is granted). After delivery every talk is flavor only.
pub fn npc_interact(
    player: WorldPoint,
    npc: Option<WorldPoint>,
    radius: f32,
    quest: &mut Quest,
    crafted: &mut CraftedCounts,
    inventory: &mut Inventory,
    reward_fiber: u32,
) -> Result<NpcOutcome, RuleViolation> {
    let npc = npc.ok_or(RuleViolation::NoNpcOnIsland)?;
    if player.distance(npc) > radius {
        return Err(RuleViolation::NotNearNpc);
    }

    let outcome = match *quest {
        Quest::Dormant => {
            quest.advance_to(Quest::Requested);
            NpcOutcome::Requested
        }
        Quest::Requested => {
            if crafted.take_one(ItemKind::BugLantern) {
                quest.advance_to(Quest::Delivered);
                inventory.add(ResourceType::Fiber, reward_fiber);
                NpcOutcome::Delivered {
                    reward: (ResourceType::Fiber, reward_fiber),
                }
            } else {
                NpcOutcome::AwaitingLantern
            }
        }
        Quest::Delivered => NpcOutcome::AlreadyHelped,
    };
    debug!("NPC interaction: {:?} -> quest {:?}", outcome, quest);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::crafting::RecipeBook;
    use crate::game::new_entity_id;

    fn node(kind: ResourceType, x: i32, y: i32) -> ResourceNode {
        ResourceNode::new(new_entity_id(), kind, Position::new(x, y))
    }

    #[test]
    fn test_harvest_picks_nearest() {
        let mut nodes = vec![node(ResourceType::Wood, 3, 0), node(ResourceType::Stone, 1, 0)];
        let mut inventory = Inventory::new();
        let player = Position::new(0, 0).center();

        let yielded = harvest(player, &mut nodes, 40.0, &mut inventory).unwrap();
        assert_eq!(yielded.kind, ResourceType::Stone);
        assert!(nodes[1].harvested);
        assert!(!nodes[0].harvested);
        assert_eq!(inventory.count(ResourceType::Stone), 1);
    }

    #[test]
    fn test_harvest_tie_goes_to_first_in_list() {
        let mut nodes = vec![node(ResourceType::Fiber, 0, 1), node(ResourceType::Wood, 1, 0)];
        let mut inventory = Inventory::new();
        let player = Position::new(0, 0).center();

        let yielded = harvest(player, &mut nodes, 20.0, &mut inventory).unwrap();
        assert_eq!(yielded.kind, ResourceType::Fiber);
    }

    #[test]
    fn test_harvest_out_of_range() {
        let mut nodes = vec![node(ResourceType::Wood, 5, 5)];
        let mut inventory = Inventory::new();
        let result = harvest(WorldPoint::new(0.0, 0.0), &mut nodes, 24.0, &mut inventory);
        assert_eq!(result, Err(RuleViolation::NothingToHarvest));
        assert_eq!(inventory, Inventory::new());
        assert!(!nodes[0].harvested);
    }

    #[test]
    fn test_harvest_same_node_twice() {
        let mut nodes = vec![node(ResourceType::Wood, 0, 0)];
        let mut inventory = Inventory::new();
        let player = nodes[0].position();

        harvest(player, &mut nodes, 24.0, &mut inventory).unwrap();
        let second = harvest(player, &mut nodes, 24.0, &mut inventory);
        assert_eq!(second, Err(RuleViolation::NothingToHarvest));
        assert_eq!(inventory.count(ResourceType::Wood), 1);
    }

    #[test]
    fn test_craft_requires_bench() {
        let book = RecipeBook::default();
        let mut inventory = Inventory::with_counts(9, 9, 9);
        let mut crafted = CraftedCounts::new();

        let result = craft(book.selected(), &mut inventory, &mut crafted, false);
        assert_eq!(result, Err(RuleViolation::NotNearBench));
        assert_eq!(inventory, Inventory::with_counts(9, 9, 9));
    }

    #[test]
    fn test_craft_insufficient_materials() {
        let book = RecipeBook::default();
        let lantern = book.recipe(1).unwrap();
        let mut inventory = Inventory::with_counts(0, 1, 0);
        let mut crafted = CraftedCounts::new();

        let result = craft(lantern, &mut inventory, &mut crafted, true);
        assert_eq!(
            result,
            Err(RuleViolation::InsufficientMaterials {
                missing: vec![(ResourceType::Wood, 1), (ResourceType::Stone, 1)]
            })
        );
        assert_eq!(inventory, Inventory::with_counts(0, 1, 0));
        assert_eq!(crafted, CraftedCounts::new());
    }

    #[test]
    fn test_insufficient_materials_message() {
        let violation = RuleViolation::InsufficientMaterials {
            missing: vec![(ResourceType::Wood, 1), (ResourceType::Stone, 2)],
        };
        assert_eq!(
            violation.to_string(),
            "Not enough materials: need 1 more wood, 2 more stone."
        );
    }

    #[test]
    fn test_travel_wraps() {
        assert_eq!(travel(0, 3, true), Ok(1));
        assert_eq!(travel(2, 3, true), Ok(0));
        assert_eq!(travel(1, 3, false), Err(RuleViolation::NotNearDock));
    }

    #[test]
    fn test_npc_quest_progression() {
        let npc = WorldPoint::new(100.0, 100.0);
        let mut quest = Quest::Dormant;
        let mut crafted = CraftedCounts::new();
        let mut inventory = Inventory::new();
        let talk = |quest: &mut Quest, crafted: &mut CraftedCounts, inventory: &mut Inventory| {
            npc_interact(npc, Some(npc), 34.0, quest, crafted, inventory, 2)
        };

        assert_eq!(talk(&mut quest, &mut crafted, &mut inventory), Ok(NpcOutcome::Requested));
        assert_eq!(
            talk(&mut quest, &mut crafted, &mut inventory),
            Ok(NpcOutcome::AwaitingLantern)
        );
        assert_eq!(quest, Quest::Requested);

        crafted.increment(ItemKind::BugLantern);
        assert_eq!(
            talk(&mut quest, &mut crafted, &mut inventory),
            Ok(NpcOutcome::Delivered {
                reward: (ResourceType::Fiber, 2)
            })
        );
        assert_eq!(crafted.count(ItemKind::BugLantern), 0);
        assert_eq!(inventory.count(ResourceType::Fiber), 2);

        crafted.increment(ItemKind::BugLantern);
        assert_eq!(
            talk(&mut quest, &mut crafted, &mut inventory),
            Ok(NpcOutcome::AlreadyHelped)
        );
        assert_eq!(crafted.count(ItemKind::BugLantern), 1);
        assert_eq!(quest, Quest::Delivered);
    }

    #[test]
    fn test_npc_out_of_range_is_noop() {
        let mut quest = Quest::Dormant;
        let mut crafted = CraftedCounts::new();
        let mut inventory = Inventory::new();

        let result = npc_interact(
            WorldPoint::new(0.0, 0.0),
            Some(WorldPoint::new(100.0, 0.0)),
            34.0,
            &mut quest,
            &mut crafted,
            &mut inventory,
            2,
        );
        assert_eq!(result, Err(RuleViolation::NotNearNpc));
        assert_eq!(quest, Quest::Dormant);

        let result = npc_interact(
            WorldPoint::new(0.0, 0.0),
            None,
            34.0,
            &mut quest,
            &mut crafted,
            &mut inventory,
            2,
        );
        assert_eq!(result, Err(RuleViolation::NoNpcOnIsland));
    }
}

//! # Entity Arena
//!
//! Logical handles for everything the presentation layer draws on an island.
//!
//! The core never holds sprites. It asks the arena to place or remove entities
//! by id, and the arena records one-way [`EntityCommand`]s that the renderer
//! drains once per frame.

use crate::game::resources::ResourceType;
use crate::game::{new_entity_id, EntityId, Position};
use std::collections::HashMap;

/// What an entity represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Resource(ResourceType),
    Dock,
    Bench,
    Npc,
}

/// Visual state hint for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityVariant {
    #[default]
    Normal,
    /// A harvested resource node
    Depleted,
}

/// An entity the arena is tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRecord {
    pub kind: EntityKind,
    pub tile: Position,
    pub variant: EntityVariant,
}

/// Fire-and-forget request for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityCommand {
    Place {
        id: EntityId,
        kind: EntityKind,
        tile: Position,
    },
    Remove {
        id: EntityId,
    },
    SetVariant {
        id: EntityId,
        variant: EntityVariant,
    },
}

/// Owns entity ids for the current island and the pending command queue.
#[derive(Debug, Clone, Default)]
pub struct EntityArena {
    entities: HashMap<EntityId, EntityRecord>,
    pending: Vec<EntityCommand>,
}

impl EntityArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a new entity and returns its handle.
    pub fn place(&mut self, kind: EntityKind, tile: Position) -> EntityId {
        let id = new_entity_id();
        self.entities.insert(
            id,
            EntityRecord {
                kind,
                tile,
                variant: EntityVariant::Normal,
            },
        );
        self.pending.push(EntityCommand::Place { id, kind, tile });
        id
    }

    /// Removes an entity. Unknown ids are ignored.
    pub fn remove(&mut self, id: EntityId) {
        if self.entities.remove(&id).is_some() {
            self.pending.push(EntityCommand::Remove { id });
        }
    }

    /// Changes the visual variant of an entity. Unknown ids are ignored.
    pub fn set_variant(&mut self, id: EntityId, variant: EntityVariant) {
        if let Some(record) = self.entities.get_mut(&id) {
            if record.variant != variant {
                record.variant = variant;
                self.pending.push(EntityCommand::SetVariant { id, variant });
            }
        }
    }

    /// Removes every entity, e.g. when leaving an island.
    pub fn clear(&mut self) {
        let ids: Vec<EntityId> = self.entities.keys().copied().collect();
        for id in ids {
            self.remove(id);
        }
    }

    /// Looks up a live entity.
    pub fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.entities.get(&id)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity is live.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Takes all commands recorded since the last drain, in order.
    pub fn drain_commands(&mut self) -> Vec<EntityCommand> {
        std::mem::take(&mut self.pending)
    }

    /// Re-issues `Place` commands for every live entity.
    ///
    /// Used when a renderer attaches after the island was loaded.
    pub fn replay(&self) -> Vec<EntityCommand> {
        let mut commands = Vec::with_capacity(self.entities.len() * 2);
        for (&id, record) in &self.entities {
            commands.push(EntityCommand::Place {
                id,
                kind: record.kind,
                tile: record.tile,
            });
            if record.variant != EntityVariant::Normal {
                commands.push(EntityCommand::SetVariant {
                    id,
                    variant: record.variant,
                });
            }
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_remove_emit_commands() {
        let mut arena = EntityArena::new();
        let id = arena.place(EntityKind::Dock, Position::new(1, 2));
        assert_eq!(arena.len(), 1);

        arena.remove(id);
        arena.remove(id);
        assert!(arena.is_empty());

        let commands = arena.drain_commands();
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], EntityCommand::Place { kind: EntityKind::Dock, .. }));
        assert_eq!(commands[1], EntityCommand::Remove { id });
        assert!(arena.drain_commands().is_empty());
    }

    #[test]
    fn test_set_variant_only_on_change() {
        let mut arena = EntityArena::new();
        let id = arena.place(EntityKind::Resource(ResourceType::Wood), Position::new(0, 0));
        arena.drain_commands();

        arena.set_variant(id, EntityVariant::Depleted);
        arena.set_variant(id, EntityVariant::Depleted);
        assert_eq!(arena.drain_commands().len(), 1);
        assert_eq!(arena.get(id).unwrap().variant, EntityVariant::Depleted);
    }

    #[test]
    fn test_clear_and_replay() {
        let mut arena = EntityArena::new();
        let a = arena.place(EntityKind::Bench, Position::new(0, 0));
        arena.place(EntityKind::Npc, Position::new(3, 3));
        arena.set_variant(a, EntityVariant::Depleted);
        arena.drain_commands();

        assert_eq!(arena.replay().len(), 3);

        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.drain_commands().len(), 2);
        assert!(arena.replay().is_empty());
    }
}

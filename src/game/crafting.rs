//! # Crafting
//!
//! The fixed recipe catalog, the selection cursor and crafted item counts.

use crate::game::resources::{ResourceAmount, ResourceType};
use crate::{IslesError, IslesResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An item that can be produced at the craft bench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    RaftKit,
    BugLantern,
}

impl ItemKind {
    /// All craftable items in catalog order.
    pub const ALL: [ItemKind; 2] = [ItemKind::RaftKit, ItemKind::BugLantern];

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::RaftKit => "Raft Kit",
            ItemKind::BugLantern => "Bug Lantern",
        }
    }

    fn slot(self) -> usize {
        match self {
            ItemKind::RaftKit => 0,
            ItemKind::BugLantern => 1,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fixed material-cost rule producing one crafted item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Item produced
    pub key: ItemKind,
    /// Label shown in the HUD
    pub label: &'static str,
    /// Materials consumed
    pub cost: Vec<ResourceAmount>,
}

impl Recipe {
    /// Formats the cost as `2 wood + 2 fiber`.
    pub fn cost_summary(&self) -> String {
        self.cost
            .iter()
            .map(|(resource, amount)| format!("{amount} {resource}"))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

/// The ordered recipe catalog.
pub fn default_recipes() -> Vec<Recipe> {
    vec![
        Recipe {
            key: ItemKind::RaftKit,
            label: ItemKind::RaftKit.label(),
            cost: vec![(ResourceType::Wood, 2), (ResourceType::Fiber, 2)],
        },
        Recipe {
            key: ItemKind::BugLantern,
            label: ItemKind::BugLantern.label(),
            cost: vec![(ResourceType::Wood, 1), (ResourceType::Stone, 2)],
        },
    ]
}

/// Recipe catalog with a wrapping selection cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
    selected: usize,
}

impl Default for RecipeBook {
    fn default() -> Self {
        Self::new(default_recipes())
    }
}

impl RecipeBook {
    /// Creates a book over a non-empty catalog with the first recipe selected.
    ///
    /// # Panics
    ///
    /// Panics if `recipes` is empty; the catalog is fixed at startup.
    pub fn new(recipes: Vec<Recipe>) -> Self {
        assert!(!recipes.is_empty(), "recipe catalog must not be empty");
        Self { recipes, selected: 0 }
    }

    /// Number of recipes in the catalog.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Always false; the catalog cannot be empty.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Index of the selected recipe.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The selected recipe.
    pub fn selected(&self) -> &Recipe {
        &self.recipes[self.selected]
    }

    /// Looks up a recipe by catalog index.
    pub fn recipe(&self, index: usize) -> IslesResult<&Recipe> {
        self.recipes.get(index).ok_or(IslesError::RecipeOutOfBounds {
            index,
            len: self.recipes.len(),
        })
    }

    /// Moves the cursor to a specific recipe.
    pub fn select(&mut self, index: usize) -> IslesResult<()> {
        self.recipe(index)?;
        self.selected = index;
        Ok(())
    }

    /// Advances the cursor, wrapping to the first recipe.
    pub fn select_next(&mut self) -> &Recipe {
        self.selected = (self.selected + 1) % self.recipes.len();
        self.selected()
    }

    /// Moves the cursor back, wrapping to the last recipe.
    pub fn select_previous(&mut self) -> &Recipe {
        let len = self.recipes.len();
        self.selected = (self.selected + len - 1) % len;
        self.selected()
    }

    /// Iterates over the catalog in order.
    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }
}

/// How many of each item has been crafted (and not yet handed over).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CraftedCounts {
    counts: [u32; 2],
}

impl CraftedCounts {
    /// Creates zeroed counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count of an item.
    pub fn count(&self, item: ItemKind) -> u32 {
        self.counts[item.slot()]
    }

    /// Overwrites the count of an item.
    pub fn set(&mut self, item: ItemKind, amount: u32) {
        self.counts[item.slot()] = amount;
    }

    /// Increments an item count.
    pub fn increment(&mut self, item: ItemKind) {
        let slot = &mut self.counts[item.slot()];
        *slot = slot.saturating_add(1);
    }

    /// Decrements an item count; returns false if none was held.
    pub fn take_one(&mut self, item: ItemKind) -> bool {
        let slot = &mut self.counts[item.slot()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

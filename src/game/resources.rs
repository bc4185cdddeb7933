//! # Resources and Inventory
//!
//! The three gatherable materials and the player's material counts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A gatherable material type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Wood,
    Stone,
    Fiber,
}

impl ResourceType {
    /// All resource types in display order.
    pub const ALL: [ResourceType; 3] = [ResourceType::Wood, ResourceType::Stone, ResourceType::Fiber];

    /// Lower-case name used in messages and save files.
    pub fn name(self) -> &'static str {
        match self {
            ResourceType::Wood => "wood",
            ResourceType::Stone => "stone",
            ResourceType::Fiber => "fiber",
        }
    }

    fn slot(self) -> usize {
        match self {
            ResourceType::Wood => 0,
            ResourceType::Stone => 1,
            ResourceType::Fiber => 2,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One resource amount in a cost or a shortfall.
pub type ResourceAmount = (ResourceType, u32);

/// Material counts held by the player.
///
/// Counts are unsigned, so the inventory can never go negative; spending is
/// all-or-nothing through [`Inventory::try_spend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Inventory {
    counts: [u32; 3],
}

impl Inventory {
    /// Creates an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an inventory with the given counts.
    ///
    /// # Examples
    ///
    /// ```
    /// use ladybug_isles::{Inventory, ResourceType};
    ///
    /// let inventory = Inventory::with_counts(2, 0, 1);
    /// assert_eq!(inventory.count(ResourceType::Wood), 2);
    /// assert_eq!(inventory.count(ResourceType::Fiber), 1);
    /// ```
    pub fn with_counts(wood: u32, stone: u32, fiber: u32) -> Self {
        Self {
            counts: [wood, stone, fiber],
        }
    }

    /// Current count of a resource.
    pub fn count(&self, resource: ResourceType) -> u32 {
        self.counts[resource.slot()]
    }

    /// Overwrites the count of a resource.
    pub fn set(&mut self, resource: ResourceType, amount: u32) {
        self.counts[resource.slot()] = amount;
    }

    /// Adds to a resource count, saturating at `u32::MAX`.
    pub fn add(&mut self, resource: ResourceType, amount: u32) {
        let slot = &mut self.counts[resource.slot()];
        *slot = slot.saturating_add(amount);
    }

    /// Lists every resource in `cost` the inventory cannot cover, with the
    /// amount still missing.
    pub fn shortfall(&self, cost: &[ResourceAmount]) -> Vec<ResourceAmount> {
        cost.iter()
            .filter_map(|&(resource, needed)| {
                let have = self.count(resource);
                (have < needed).then(|| (resource, needed - have))
            })
            .collect()
    }

    /// Whether every component of `cost` is available.
    pub fn can_afford(&self, cost: &[ResourceAmount]) -> bool {
        self.shortfall(cost).is_empty()
    }

    /// Deducts `cost` if it is fully affordable.
    ///
    /// On failure the inventory is untouched and the shortfall is returned.
    pub fn try_spend(&mut self, cost: &[ResourceAmount]) -> Result<(), Vec<ResourceAmount>> {
        let missing = self.shortfall(cost);
        if !missing.is_empty() {
            return Err(missing);
        }
        for &(resource, amount) in cost {
            self.counts[resource.slot()] -= amount;
        }
        Ok(())
    }

    /// Iterates over `(resource, count)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = ResourceAmount> + '_ {
        ResourceType::ALL.iter().map(move |&r| (r, self.count(r)))
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(r, n)| format!("{r}:{n}")).collect();
        f.write_str(&parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_count() {
        let mut inventory = Inventory::new();
        inventory.add(ResourceType::Stone, 3);
        inventory.add(ResourceType::Stone, 1);
        assert_eq!(inventory.count(ResourceType::Stone), 4);
        assert_eq!(inventory.count(ResourceType::Wood), 0);
    }

    #[test]
    fn test_try_spend_is_all_or_nothing() {
        let mut inventory = Inventory::with_counts(5, 1, 0);
        let cost = [(ResourceType::Wood, 1), (ResourceType::Stone, 2)];

        let missing = inventory.try_spend(&cost).unwrap_err();
        assert_eq!(missing, vec![(ResourceType::Stone, 1)]);
        assert_eq!(inventory, Inventory::with_counts(5, 1, 0));

        inventory.add(ResourceType::Stone, 1);
        inventory.try_spend(&cost).unwrap();
        assert_eq!(inventory, Inventory::with_counts(4, 0, 0));
    }

    #[test]
    fn test_add_saturates() {
        let mut inventory = Inventory::with_counts(u32::MAX, 0, 0);
        inventory.add(ResourceType::Wood, 1);
        assert_eq!(inventory.count(ResourceType::Wood), u32::MAX);
    }

    #[test]
    fn test_display() {
        let inventory = Inventory::with_counts(2, 0, 1);
        assert_eq!(inventory.to_string(), "wood:2 stone:0 fiber:1");
    }
}

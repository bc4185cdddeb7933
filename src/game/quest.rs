//! # Lantern Quest
//!
//! A three-step side objective: the island NPC asks for a bug lantern and
//! rewards the player once it is delivered.

use serde::{Deserialize, Serialize};

/// Progress of the lantern quest. Only ever advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Quest {
    #[default]
    Dormant,
    Requested,
    Delivered,
}

/// Persisted form of [`Quest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuestFlags {
    #[serde(deserialize_with = "crate::game::save::lenient_bool")]
    pub lantern_requested: bool,
    #[serde(deserialize_with = "crate::game::save::lenient_bool")]
    pub lantern_delivered: bool,
}

impl Quest {
    /// Whether the quest reached its terminal state.
    pub fn is_complete(self) -> bool {
        self == Quest::Delivered
    }

    /// Moves the quest forward to `next`; moving backwards is ignored.
    ///
    /// Returns true if the state changed.
    pub fn advance_to(&mut self, next: Quest) -> bool {
        if next > *self {
            *self = next;
            true
        } else {
            false
        }
    }

    /// Converts to the two persisted flags.
    pub fn to_flags(self) -> QuestFlags {
        QuestFlags {
            lantern_requested: self >= Quest::Requested,
            lantern_delivered: self == Quest::Delivered,
        }
    }

    /// Reads the persisted flags. A delivered flag implies the request.
    ///
    /// # Examples
    ///
    /// ```
    /// use ladybug_isles::{Quest, QuestFlags};
    ///
    /// let flags = QuestFlags { lantern_requested: false, lantern_delivered: true };
    /// assert_eq!(Quest::from_flags(flags), Quest::Delivered);
    /// ```
    pub fn from_flags(flags: QuestFlags) -> Self {
        if flags.lantern_delivered {
            Quest::Delivered
        } else if flags.lantern_requested {
            Quest::Requested
        } else {
            Quest::Dormant
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_is_monotonic() {
        let mut quest = Quest::Dormant;
        assert!(quest.advance_to(Quest::Requested));
        assert!(quest.advance_to(Quest::Delivered));
        assert!(!quest.advance_to(Quest::Requested));
        assert!(!quest.advance_to(Quest::Dormant));
        assert!(quest.is_complete());
    }

    #[test]
    fn test_flags_round_trip() {
        for quest in [Quest::Dormant, Quest::Requested, Quest::Delivered] {
            assert_eq!(Quest::from_flags(quest.to_flags()), quest);
        }
    }
}

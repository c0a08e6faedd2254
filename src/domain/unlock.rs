//! Level unlocks
//!
//! Each unlock ties a reward to a level: once a player's current level
//! reaches the unlock's level, the reward is available.

use serde::{Deserialize, Serialize};

use super::level::LevelId;

/// What an unlock grants, tagged by reward category.
///
/// The item id points into the table for that category (plants,
/// irrigation methods, tools). Tools and "other" rewards carry an id
/// but have no backing table yet, so they resolve to no detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "item_id", rename_all = "snake_case")]
pub enum UnlockReward {
    Plant(i64),
    Irrigation(i64),
    Tool(i64),
    Other(i64),
}

impl UnlockReward {
    /// Reconstruct from the stored (kind, item_id) pair.
    /// Unknown kinds degrade to `Other` rather than failing the row.
    pub fn from_parts(kind: &str, item_id: i64) -> Self {
        match kind {
            "plant" => Self::Plant(item_id),
            "irrigation" => Self::Irrigation(item_id),
            "tool" => Self::Tool(item_id),
            _ => Self::Other(item_id),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Plant(_) => "plant",
            Self::Irrigation(_) => "irrigation",
            Self::Tool(_) => "tool",
            Self::Other(_) => "other",
        }
    }

    pub fn item_id(&self) -> i64 {
        match self {
            Self::Plant(id) | Self::Irrigation(id) | Self::Tool(id) | Self::Other(id) => *id,
        }
    }
}

/// A reward made available upon reaching a level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unlock {
    pub id: i64,
    pub level_id: LevelId,
    #[serde(flatten)]
    pub reward: UnlockReward,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_from_parts() {
        assert_eq!(UnlockReward::from_parts("plant", 3), UnlockReward::Plant(3));
        assert_eq!(
            UnlockReward::from_parts("irrigation", 1),
            UnlockReward::Irrigation(1)
        );
        assert_eq!(UnlockReward::from_parts("tool", 9), UnlockReward::Tool(9));
        // Unknown tags fall back to Other instead of erroring
        assert_eq!(
            UnlockReward::from_parts("mystery", 4),
            UnlockReward::Other(4)
        );
    }

    #[test]
    fn test_reward_round_trip() {
        let reward = UnlockReward::Irrigation(2);
        assert_eq!(UnlockReward::from_parts(reward.kind(), reward.item_id()), reward);
    }
}

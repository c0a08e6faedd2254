//! Per-player progression state

use serde::{Deserialize, Serialize};

use super::level::LevelId;

/// A player's mutable progression record.
///
/// Created lazily on first access, seeded at the catalog's minimum
/// level with zero experience. Experience only ever accumulates; the
/// level only ever climbs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub player_id: i64,
    pub display_name: String,
    pub level_id: LevelId,
    pub xp: i64,
}

impl PlayerProgress {
    pub fn new(player_id: i64, display_name: impl Into<String>, level_id: LevelId) -> Self {
        Self {
            player_id,
            display_name: display_name.into(),
            level_id,
            xp: 0,
        }
    }
}

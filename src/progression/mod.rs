//! Progression engine
//!
//! Turns experience grants into level-ups. A level's `xp_required` is
//! the total experience needed to reach it, so a player may advance
//! whenever their accumulated experience meets the next level's
//! threshold. One large grant can cascade through several levels; each
//! step is persisted so a crash mid-cascade leaves a consistent record.
//!
//! Every lookup failure degrades to a safe default (no level-up, 100%
//! progress at the top of the ladder) rather than an error. The only
//! hard rejection is a negative grant amount.

mod view;

pub use view::{LevelView, ProgressView, UnlockView};

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{LevelCatalog, LevelId, PlayerProgress, Unlock};
use crate::store::{CatalogStore, ProgressStore};

#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    #[error("experience amount must be non-negative, got {0}")]
    InvalidAmount(i64),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Result of an experience grant
#[derive(Debug, Clone)]
pub struct GrantOutcome {
    /// Ids of the levels gained while resolving the grant, in order
    pub levels_gained: Vec<LevelId>,
}

impl GrantOutcome {
    pub fn leveled_up(&self) -> bool {
        !self.levels_gained.is_empty()
    }
}

/// The engine resolving experience grants into level state transitions
#[derive(Clone)]
pub struct ProgressionEngine {
    catalog: Arc<LevelCatalog>,
    progress: ProgressStore,
    catalog_store: CatalogStore,
}

impl ProgressionEngine {
    pub fn new(
        catalog: Arc<LevelCatalog>,
        progress: ProgressStore,
        catalog_store: CatalogStore,
    ) -> Self {
        Self {
            catalog,
            progress,
            catalog_store,
        }
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    /// Add experience to a player and resolve any pending level-ups.
    ///
    /// Negative amounts are rejected; experience never decreases. The
    /// updated record is persisted once for the grant and once per
    /// level-up step.
    pub fn grant_xp(
        &self,
        progress: &mut PlayerProgress,
        amount: i64,
    ) -> Result<GrantOutcome, ProgressionError> {
        if amount < 0 {
            return Err(ProgressionError::InvalidAmount(amount));
        }

        progress.xp += amount;
        self.progress.save(progress).map_err(ProgressionError::Storage)?;

        let levels_gained = self.resolve_pending_level_ups(progress)?;
        if levels_gained.is_empty() {
            debug!(player = progress.player_id, amount, xp = progress.xp, "granted xp");
        } else {
            info!(
                player = progress.player_id,
                amount,
                xp = progress.xp,
                level = progress.level_id,
                gained = levels_gained.len(),
                "granted xp with level-up"
            );
        }
        Ok(GrantOutcome { levels_gained })
    }

    /// Whether the player's experience already meets the next level's
    /// threshold. False at the top of the ladder, and false when the
    /// current level id is missing from the catalog.
    pub fn can_level_up(&self, progress: &PlayerProgress) -> bool {
        if self.catalog.get(progress.level_id).is_none() {
            return false;
        }
        match self.catalog.next_level(progress.level_id) {
            Some(next) => progress.xp >= next.xp_required,
            None => false,
        }
    }

    /// Advance one level if a next level exists. Returns whether the
    /// level changed; already being at the top is not an error.
    pub fn level_up(&self, progress: &mut PlayerProgress) -> Result<bool, ProgressionError> {
        let Some(next_id) = self.catalog.next_level(progress.level_id).map(|l| l.id) else {
            return Ok(false);
        };
        progress.level_id = next_id;
        self.progress.save(progress).map_err(ProgressionError::Storage)?;
        Ok(true)
    }

    /// Level up repeatedly until the next threshold is out of reach.
    ///
    /// The loop is capped at the catalog length; each step strictly
    /// increases the level id, so the cap is never the thing that
    /// actually stops a well-formed catalog.
    pub fn resolve_pending_level_ups(
        &self,
        progress: &mut PlayerProgress,
    ) -> Result<Vec<LevelId>, ProgressionError> {
        let mut gained = Vec::new();
        for _ in 0..self.catalog.len() {
            if !self.can_level_up(progress) {
                break;
            }
            if !self.level_up(progress)? {
                break;
            }
            gained.push(progress.level_id);
        }
        Ok(gained)
    }

    /// Completion percentage toward the next level, in [0, 100].
    ///
    /// Computed against the next level's absolute threshold. At the top
    /// of the ladder, or when the next threshold is not positive, the
    /// percentage is pinned to 100.
    pub fn progress_to_next_level(&self, progress: &PlayerProgress) -> f64 {
        match self.catalog.next_level(progress.level_id) {
            Some(next) if next.xp_required > 0 => {
                (progress.xp as f64 / next.xp_required as f64 * 100.0).min(100.0)
            }
            Some(_) => 100.0,
            None => 100.0,
        }
    }

    /// All unlocks available at the player's current level
    pub fn available_unlocks(
        &self,
        progress: &PlayerProgress,
    ) -> Result<Vec<Unlock>, ProgressionError> {
        self.catalog_store
            .load_unlocks(progress.level_id)
            .map_err(ProgressionError::Storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::GameDb;
    use tempfile::tempdir;

    /// Engine over the three-level ladder used throughout the tests:
    /// L1 at 0 xp, L2 at 100, L3 at 250.
    fn test_engine() -> (tempfile::TempDir, ProgressionEngine, PlayerProgress) {
        let dir = tempdir().unwrap();
        let db = GameDb::open(&dir.path().join("game.db")).unwrap();
        {
            let conn = db.conn();
            conn.execute_batch(
                r#"
                DELETE FROM unlocks;
                DELETE FROM levels;
                INSERT INTO levels (id, name, description, xp_required) VALUES
                    (1, 'L1', '', 0),
                    (2, 'L2', '', 100),
                    (3, 'L3', '', 250);
                INSERT INTO unlocks (id, level_id, kind, item_id) VALUES
                    (1, 1, 'plant', 1),
                    (2, 2, 'plant', 2),
                    (3, 3, 'plant', 3);
                "#,
            )
            .unwrap();
        }
        let catalog_store = CatalogStore::new(db.clone());
        let catalog = Arc::new(catalog_store.load_levels().unwrap());
        let progress_store = ProgressStore::new(db);
        let progress = progress_store.get_or_create(1, "Ada", 1).unwrap();
        let engine = ProgressionEngine::new(catalog, progress_store, catalog_store);
        (dir, engine, progress)
    }

    #[test]
    fn test_grant_accumulates_without_level_up() {
        let (_dir, engine, mut progress) = test_engine();
        let outcome = engine.grant_xp(&mut progress, 50).unwrap();
        assert!(!outcome.leveled_up());
        assert_eq!(progress.xp, 50);
        assert_eq!(progress.level_id, 1);
        assert!(!engine.can_level_up(&progress));
    }

    #[test]
    fn test_grant_resolves_single_level_up() {
        let (_dir, engine, mut progress) = test_engine();
        let outcome = engine.grant_xp(&mut progress, 150).unwrap();
        assert_eq!(outcome.levels_gained, vec![2]);
        assert_eq!(progress.level_id, 2);
        assert_eq!(progress.xp, 150);
        assert!(!engine.can_level_up(&progress));
        assert!((engine.progress_to_next_level(&progress) - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_large_grant_cascades_to_max() {
        let (_dir, engine, mut progress) = test_engine();
        let outcome = engine.grant_xp(&mut progress, 999).unwrap();
        assert_eq!(outcome.levels_gained, vec![2, 3]);
        assert_eq!(progress.level_id, 3);
        assert_eq!(progress.xp, 999);
        assert!(!engine.can_level_up(&progress));
        assert_eq!(engine.progress_to_next_level(&progress), 100.0);
    }

    #[test]
    fn test_grants_at_max_level_are_absorbed() {
        let (_dir, engine, mut progress) = test_engine();
        engine.grant_xp(&mut progress, 999).unwrap();
        let outcome = engine.grant_xp(&mut progress, 500).unwrap();
        assert!(!outcome.leveled_up());
        assert_eq!(progress.level_id, 3);
        assert_eq!(progress.xp, 1499);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let (_dir, engine, mut progress) = test_engine();
        engine.grant_xp(&mut progress, 30).unwrap();
        let err = engine.grant_xp(&mut progress, -10).unwrap_err();
        assert!(matches!(err, ProgressionError::InvalidAmount(-10)));
        // State untouched by the rejected grant
        assert_eq!(progress.xp, 30);
    }

    #[test]
    fn test_level_up_never_decreases_and_stops_at_max() {
        let (_dir, engine, mut progress) = test_engine();
        progress.xp = 999;
        assert!(engine.level_up(&mut progress).unwrap());
        assert!(engine.level_up(&mut progress).unwrap());
        assert_eq!(progress.level_id, 3);
        // Repeated calls at the top report "no change"
        assert!(!engine.level_up(&mut progress).unwrap());
        assert!(!engine.level_up(&mut progress).unwrap());
        assert_eq!(progress.level_id, 3);
    }

    #[test]
    fn test_dangling_level_is_fail_soft() {
        let (_dir, engine, mut progress) = test_engine();
        progress.level_id = 42;
        assert!(!engine.can_level_up(&progress));
        // Grants still accumulate without resolving a level-up
        let outcome = engine.grant_xp(&mut progress, 500).unwrap();
        assert!(!outcome.leveled_up());
        assert_eq!(progress.xp, 500);
    }

    #[test]
    fn test_equal_thresholds_still_terminate() {
        let (_dir, engine, _progress) = test_engine();
        // Rebuild with two levels sharing a threshold
        let catalog = Arc::new(
            crate::domain::LevelCatalog::new(vec![
                crate::domain::Level {
                    id: 1,
                    name: "L1".into(),
                    description: String::new(),
                    xp_required: 0,
                },
                crate::domain::Level {
                    id: 2,
                    name: "L2".into(),
                    description: String::new(),
                    xp_required: 100,
                },
                crate::domain::Level {
                    id: 3,
                    name: "L3".into(),
                    description: String::new(),
                    xp_required: 100,
                },
            ])
            .unwrap(),
        );
        let engine = ProgressionEngine::new(
            catalog,
            engine.progress.clone(),
            engine.catalog_store.clone(),
        );
        let mut progress = engine.progress.get_or_create(2, "Bram", 1).unwrap();
        let outcome = engine.grant_xp(&mut progress, 100).unwrap();
        assert_eq!(outcome.levels_gained, vec![2, 3]);
        assert_eq!(progress.level_id, 3);
    }

    #[test]
    fn test_zero_next_threshold_pins_percent_to_100() {
        let (_dir, engine, _progress) = test_engine();
        let catalog = Arc::new(
            crate::domain::LevelCatalog::new(vec![
                crate::domain::Level {
                    id: 1,
                    name: "L1".into(),
                    description: String::new(),
                    xp_required: 0,
                },
                crate::domain::Level {
                    id: 2,
                    name: "L2".into(),
                    description: String::new(),
                    xp_required: 0,
                },
            ])
            .unwrap(),
        );
        let engine = ProgressionEngine::new(
            catalog,
            engine.progress.clone(),
            engine.catalog_store.clone(),
        );
        let progress = PlayerProgress::new(3, "Cleo", 1);
        assert_eq!(engine.progress_to_next_level(&progress), 100.0);
    }

    #[test]
    fn test_available_unlocks_track_level() {
        let (_dir, engine, mut progress) = test_engine();
        let at_start = engine.available_unlocks(&progress).unwrap();
        assert_eq!(at_start.len(), 1);

        engine.grant_xp(&mut progress, 150).unwrap();
        let at_two = engine.available_unlocks(&progress).unwrap();
        assert_eq!(at_two.len(), 2);
        assert!(at_two.iter().all(|u| u.level_id <= progress.level_id));

        // Growing level only ever widens the set
        engine.grant_xp(&mut progress, 200).unwrap();
        let at_three = engine.available_unlocks(&progress).unwrap();
        assert_eq!(at_three.len(), 3);
    }
}

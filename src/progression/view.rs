//! Dashboard read model
//!
//! Assembles a player's progression into the payload the web client
//! renders. Pure projection: nothing here mutates state.

use serde::Serialize;

use super::ProgressionEngine;
use crate::domain::{IrrigationMethod, Level, Plant, PlayerProgress, Unlock, UnlockReward};
use crate::store::User;

/// Level detail as shown on the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct LevelView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub xp_required: i64,
}

impl From<&Level> for LevelView {
    fn from(level: &Level) -> Self {
        Self {
            id: level.id,
            name: level.name.clone(),
            description: level.description.clone(),
            xp_required: level.xp_required,
        }
    }
}

/// An unlock with its reward payload resolved where possible
#[derive(Debug, Clone, Serialize)]
pub struct UnlockView {
    pub id: i64,
    pub level_id: i64,
    pub kind: &'static str,
    pub item_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant: Option<Plant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irrigation: Option<IrrigationMethod>,
}

impl UnlockView {
    fn unresolved(unlock: &Unlock) -> Self {
        Self {
            id: unlock.id,
            level_id: unlock.level_id,
            kind: unlock.reward.kind(),
            item_id: unlock.reward.item_id(),
            plant: None,
            irrigation: None,
        }
    }
}

/// The authenticated user's identity fields
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub land_area_name: Option<String>,
    pub land_area_description: Option<String>,
    pub land_area_size: Option<f64>,
    pub land_area_coordinates: Option<serde_json::Value>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            land_area_name: user.land_area_name.clone(),
            land_area_description: user.land_area_description.clone(),
            land_area_size: user.land_area_size,
            land_area_coordinates: user.land_area_coordinates.clone(),
        }
    }
}

/// Progress fields for the dashboard header
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub name: String,
    pub level_id: i64,
    pub xp: i64,
    pub percent_to_next_level: f64,
    pub can_level_up: bool,
}

/// The complete dashboard payload
#[derive(Debug, Clone, Serialize)]
pub struct ProgressView {
    pub user: UserView,
    pub progress: ProgressSummary,
    pub current_level: Option<LevelView>,
    pub next_level: Option<LevelView>,
    pub unlocks: Vec<UnlockView>,
}

impl ProgressionEngine {
    /// Build the dashboard view for a player's current progress
    pub fn progress_view(
        &self,
        user: &User,
        progress: &PlayerProgress,
    ) -> Result<ProgressView, super::ProgressionError> {
        let catalog = self.catalog();
        let current_level = catalog.get(progress.level_id).map(LevelView::from);
        let next_level = catalog.next_level(progress.level_id).map(LevelView::from);

        let unlocks = self
            .available_unlocks(progress)?
            .iter()
            .map(|unlock| self.resolve_unlock(unlock))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProgressView {
            user: UserView::from(user),
            progress: ProgressSummary {
                name: progress.display_name.clone(),
                level_id: progress.level_id,
                xp: progress.xp,
                percent_to_next_level: self.progress_to_next_level(progress),
                can_level_up: self.can_level_up(progress),
            },
            current_level,
            next_level,
            unlocks,
        })
    }

    /// Inline the reward payload for the categories that have one.
    /// A missing item row leaves the unlock unresolved rather than
    /// failing the whole view.
    fn resolve_unlock(&self, unlock: &Unlock) -> Result<UnlockView, super::ProgressionError> {
        let mut view = UnlockView::unresolved(unlock);
        match unlock.reward {
            UnlockReward::Plant(id) => {
                view.plant = self.catalog_store.plant(id)?;
            }
            UnlockReward::Irrigation(id) => {
                view.irrigation = self.catalog_store.irrigation_method(id)?;
            }
            UnlockReward::Tool(_) | UnlockReward::Other(_) => {}
        }
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::ProgressionEngine;
    use crate::store::{CatalogStore, GameDb, NewUser, ProgressStore, UserStore};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn setup() -> (tempfile::TempDir, ProgressionEngine, User, PlayerProgress) {
        let dir = tempdir().unwrap();
        let db = GameDb::open(&dir.path().join("game.db")).unwrap();
        let catalog_store = CatalogStore::new(db.clone());
        let catalog = Arc::new(catalog_store.load_levels().unwrap());
        let progress_store = ProgressStore::new(db.clone());

        let user = UserStore::new(db)
            .create(&NewUser {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: "salt$hash".to_string(),
            })
            .unwrap();
        let progress = progress_store
            .get_or_create(user.id, &user.name, catalog.min_level().id)
            .unwrap();
        let engine = ProgressionEngine::new(catalog, progress_store, catalog_store);
        (dir, engine, user, progress)
    }

    #[test]
    fn test_view_for_fresh_player() {
        let (_dir, engine, user, progress) = setup();
        let view = engine.progress_view(&user, &progress).unwrap();

        assert_eq!(view.user.email, "ada@example.com");
        assert_eq!(view.progress.xp, 0);
        assert_eq!(view.progress.level_id, 1);
        assert!(!view.progress.can_level_up);
        let current = view.current_level.unwrap();
        assert_eq!(current.id, 1);
        assert!(view.next_level.is_some());
        assert!(!view.unlocks.is_empty());
    }

    #[test]
    fn test_view_resolves_reward_payloads() {
        let (_dir, engine, user, progress) = setup();
        let view = engine.progress_view(&user, &progress).unwrap();

        let plant_unlock = view.unlocks.iter().find(|u| u.kind == "plant").unwrap();
        assert!(plant_unlock.plant.is_some());
        let irrigation_unlock = view.unlocks.iter().find(|u| u.kind == "irrigation").unwrap();
        assert!(irrigation_unlock.irrigation.is_some());
    }

    #[test]
    fn test_view_with_dangling_level() {
        let (_dir, engine, user, mut progress) = setup();
        progress.level_id = 42;
        let view = engine.progress_view(&user, &progress).unwrap();
        assert!(view.current_level.is_none());
        assert!(!view.progress.can_level_up);
    }

    #[test]
    fn test_view_serializes_to_expected_shape() {
        let (_dir, engine, user, progress) = setup();
        let view = engine.progress_view(&user, &progress).unwrap();
        let json = serde_json::to_value(&view).unwrap();

        assert!(json.get("user").is_some());
        assert!(json["progress"]["percent_to_next_level"].is_number());
        assert!(json["unlocks"].is_array());
        // Password hash never leaks through the view
        assert!(json["user"].get("password_hash").is_none());
    }
}

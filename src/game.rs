//! Central manager wiring the stores and the progression engine
//!
//! Opens the database, validates the level catalog once at startup, and
//! hands out the per-concern interfaces.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::domain::LevelCatalog;
use crate::progression::{GrantOutcome, ProgressView, ProgressionEngine, ProgressionError};
use crate::store::{CatalogStore, GameDb, ProgressStore, SessionStore, UserStore};

/// Coordinates persistence and game logic for one database
#[derive(Clone)]
pub struct GameManager {
    db: GameDb,
    catalog: Arc<LevelCatalog>,
}

impl GameManager {
    /// Open the game at the default database location
    pub fn new() -> Result<Self> {
        Self::from_db(GameDb::open_default()?)
    }

    /// Open the game with a custom database path
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_db(GameDb::open(path)?)
    }

    /// Build a manager over an already-open database
    pub fn from_db(db: GameDb) -> Result<Self> {
        let catalog = CatalogStore::new(db.clone())
            .load_levels()
            .context("failed to load level catalog")?;
        Ok(Self {
            db,
            catalog: Arc::new(catalog),
        })
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn users(&self) -> UserStore {
        UserStore::new(self.db.clone())
    }

    pub fn sessions(&self) -> SessionStore {
        SessionStore::new(self.db.clone())
    }

    pub fn progress(&self) -> ProgressStore {
        ProgressStore::new(self.db.clone())
    }

    pub fn progression(&self) -> ProgressionEngine {
        ProgressionEngine::new(
            self.catalog.clone(),
            ProgressStore::new(self.db.clone()),
            CatalogStore::new(self.db.clone()),
        )
    }

    /// Grant experience to a player, creating their progress record on
    /// first touch. Returns the grant outcome and the updated record.
    pub fn grant_xp(
        &self,
        player_id: i64,
        display_name: &str,
        amount: i64,
    ) -> Result<(crate::domain::PlayerProgress, GrantOutcome), ProgressionError> {
        let mut progress = self
            .progress()
            .get_or_create(player_id, display_name, self.catalog.min_level().id)
            .map_err(ProgressionError::Storage)?;
        let outcome = self.progression().grant_xp(&mut progress, amount)?;
        Ok((progress, outcome))
    }

    /// Assemble the dashboard view for a user
    pub fn dashboard(&self, user: &crate::store::User) -> Result<ProgressView> {
        let progress = self
            .progress()
            .get_or_create(user.id, &user.name, self.catalog.min_level().id)?;
        let view = self.progression().progress_view(user, &progress)?;
        Ok(view)
    }
}

//! Read-only access to the level/unlock catalog

use anyhow::{Context, Result};
use rusqlite::OptionalExtension;

use super::GameDb;
use crate::domain::{IrrigationMethod, Level, LevelCatalog, LevelId, Plant, Unlock, UnlockReward};

/// Query interface for catalog tables
#[derive(Clone)]
pub struct CatalogStore {
    db: GameDb,
}

impl CatalogStore {
    pub fn new(db: GameDb) -> Self {
        Self { db }
    }

    /// Load and validate the full level ladder
    pub fn load_levels(&self) -> Result<LevelCatalog> {
        let conn = self.db.conn();
        let mut stmt = conn
            .prepare("SELECT id, name, description, xp_required FROM levels ORDER BY id ASC")?;
        let levels: Vec<Level> = stmt
            .query_map([], |row| {
                Ok(Level {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    xp_required: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<_, _>>()?;
        drop(stmt);
        drop(conn);

        LevelCatalog::new(levels).context("stored level catalog failed validation")
    }

    /// All unlocks reachable at or below `max_level`, in catalog order
    pub fn load_unlocks(&self, max_level: LevelId) -> Result<Vec<Unlock>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT id, level_id, kind, item_id FROM unlocks
             WHERE level_id <= ?1 ORDER BY level_id ASC, id ASC",
        )?;
        let unlocks = stmt
            .query_map([max_level], |row| {
                let kind: String = row.get(2)?;
                let item_id: i64 = row.get(3)?;
                Ok(Unlock {
                    id: row.get(0)?,
                    level_id: row.get(1)?,
                    reward: UnlockReward::from_parts(&kind, item_id),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(unlocks)
    }

    /// Look up a plant by id
    pub fn plant(&self, id: i64) -> Result<Option<Plant>> {
        let conn = self.db.conn();
        let plant = conn
            .query_row(
                "SELECT id, name, kind, growth_secs, value FROM plants WHERE id = ?1",
                [id],
                |row| {
                    Ok(Plant {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        kind: row.get(2)?,
                        growth_secs: row.get(3)?,
                        value: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(plant)
    }

    /// Look up an irrigation method by id
    pub fn irrigation_method(&self, id: i64) -> Result<Option<IrrigationMethod>> {
        let conn = self.db.conn();
        let method = conn
            .query_row(
                "SELECT id, name, efficiency, cost FROM irrigation_methods WHERE id = ?1",
                [id],
                |row| {
                    Ok(IrrigationMethod {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        efficiency: row.get(2)?,
                        cost: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_store() -> (tempfile::TempDir, CatalogStore) {
        let dir = tempdir().unwrap();
        let db = GameDb::open(&dir.path().join("game.db")).unwrap();
        (dir, CatalogStore::new(db))
    }

    #[test]
    fn test_seeded_catalog_is_valid() {
        let (_dir, store) = open_store();
        let catalog = store.load_levels().unwrap();
        assert_eq!(catalog.min_level().id, 1);
        assert_eq!(catalog.min_level().xp_required, 0);
        assert!(catalog.len() >= 3);
    }

    #[test]
    fn test_load_unlocks_filters_by_level() {
        let (_dir, store) = open_store();
        let at_min = store.load_unlocks(1).unwrap();
        assert!(!at_min.is_empty());
        assert!(at_min.iter().all(|u| u.level_id <= 1));

        let at_max = store.load_unlocks(i64::MAX).unwrap();
        assert!(at_max.len() > at_min.len());
        // Catalog order: level_id ascending, id as tiebreak
        for pair in at_max.windows(2) {
            assert!(
                (pair[0].level_id, pair[0].id) < (pair[1].level_id, pair[1].id),
                "unlocks out of order"
            );
        }
    }

    #[test]
    fn test_item_lookups() {
        let (_dir, store) = open_store();
        let plant = store.plant(1).unwrap().unwrap();
        assert!(!plant.name.is_empty());
        assert!(store.plant(999).unwrap().is_none());
        let method = store.irrigation_method(1).unwrap().unwrap();
        assert!(method.efficiency > 0.0);
        assert!(store.irrigation_method(999).unwrap().is_none());
    }
}

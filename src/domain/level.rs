//! Level catalog
//!
//! The ordered ladder of farm levels. Each level names the total
//! experience a player must accumulate to reach it.

use serde::{Deserialize, Serialize};

pub type LevelId = i64;

/// A single rung in the progression ladder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    pub description: String,
    /// Total experience required to reach this level
    pub xp_required: i64,
}

/// Errors raised when a stored catalog fails validation
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("level catalog is empty")]
    Empty,

    #[error("level ids must be strictly increasing: {prev} followed by {next}")]
    NonIncreasingId { prev: LevelId, next: LevelId },

    #[error("level {id} has a lower xp threshold than the level before it")]
    DecreasingThreshold { id: LevelId },

    #[error("level {id} has a negative xp threshold")]
    NegativeThreshold { id: LevelId },
}

/// The full, ordered set of levels.
///
/// Validated on construction: ids strictly increase and thresholds never
/// decrease, so walking the ladder upward always terminates.
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    /// Build a catalog from levels already sorted by id
    pub fn new(levels: Vec<Level>) -> Result<Self, CatalogError> {
        if levels.is_empty() {
            return Err(CatalogError::Empty);
        }
        for pair in levels.windows(2) {
            if pair[1].id <= pair[0].id {
                return Err(CatalogError::NonIncreasingId {
                    prev: pair[0].id,
                    next: pair[1].id,
                });
            }
            if pair[1].xp_required < pair[0].xp_required {
                return Err(CatalogError::DecreasingThreshold { id: pair[1].id });
            }
        }
        if let Some(bad) = levels.iter().find(|l| l.xp_required < 0) {
            return Err(CatalogError::NegativeThreshold { id: bad.id });
        }
        Ok(Self { levels })
    }

    /// Look up a level by id
    pub fn get(&self, id: LevelId) -> Option<&Level> {
        self.levels.iter().find(|l| l.id == id)
    }

    /// The level with the smallest id strictly greater than `id`,
    /// or `None` when `id` is already at (or past) the top of the ladder
    pub fn next_level(&self, id: LevelId) -> Option<&Level> {
        self.levels.iter().find(|l| l.id > id)
    }

    /// Starting level for new players
    pub fn min_level(&self) -> &Level {
        &self.levels[0]
    }

    /// Terminal level of the ladder
    pub fn max_level(&self) -> &Level {
        &self.levels[self.levels.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(id: LevelId, xp: i64) -> Level {
        Level {
            id,
            name: format!("L{id}"),
            description: String::new(),
            xp_required: xp,
        }
    }

    #[test]
    fn test_next_level_walks_upward() {
        let catalog = LevelCatalog::new(vec![level(1, 0), level(2, 100), level(3, 250)]).unwrap();
        assert_eq!(catalog.next_level(1).unwrap().id, 2);
        assert_eq!(catalog.next_level(2).unwrap().id, 3);
        assert!(catalog.next_level(3).is_none());
        // Gaps in the id sequence still resolve to the next existing level
        let sparse = LevelCatalog::new(vec![level(1, 0), level(5, 100)]).unwrap();
        assert_eq!(sparse.next_level(1).unwrap().id, 5);
    }

    #[test]
    fn test_min_and_max() {
        let catalog = LevelCatalog::new(vec![level(2, 0), level(7, 300)]).unwrap();
        assert_eq!(catalog.min_level().id, 2);
        assert_eq!(catalog.max_level().id, 7);
    }

    #[test]
    fn test_rejects_unsorted_ids() {
        let err = LevelCatalog::new(vec![level(2, 0), level(1, 100)]).unwrap_err();
        assert!(matches!(err, CatalogError::NonIncreasingId { .. }));
        let err = LevelCatalog::new(vec![level(1, 0), level(1, 100)]).unwrap_err();
        assert!(matches!(err, CatalogError::NonIncreasingId { .. }));
    }

    #[test]
    fn test_rejects_decreasing_thresholds() {
        let err = LevelCatalog::new(vec![level(1, 100), level(2, 50)]).unwrap_err();
        assert!(matches!(err, CatalogError::DecreasingThreshold { id: 2 }));
        // Equal thresholds are allowed
        assert!(LevelCatalog::new(vec![level(1, 100), level(2, 100)]).is_ok());
    }

    #[test]
    fn test_rejects_empty_catalog() {
        assert!(matches!(
            LevelCatalog::new(Vec::new()),
            Err(CatalogError::Empty)
        ));
    }
}

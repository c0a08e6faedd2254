//! Player progression persistence

use anyhow::Result;
use chrono::Utc;
use rusqlite::OptionalExtension;

use super::GameDb;
use crate::domain::{LevelId, PlayerProgress};

/// Reads and writes `player_progress` rows
#[derive(Clone)]
pub struct ProgressStore {
    db: GameDb,
}

impl ProgressStore {
    pub fn new(db: GameDb) -> Self {
        Self { db }
    }

    /// Load a player's progress if it exists
    pub fn get(&self, player_id: i64) -> Result<Option<PlayerProgress>> {
        let conn = self.db.conn();
        let progress = conn
            .query_row(
                "SELECT player_id, display_name, level_id, xp FROM player_progress WHERE player_id = ?1",
                [player_id],
                |row| {
                    Ok(PlayerProgress {
                        player_id: row.get(0)?,
                        display_name: row.get(1)?,
                        level_id: row.get(2)?,
                        xp: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(progress)
    }

    /// Load a player's progress, creating the record on first access.
    ///
    /// New records start at `start_level` with zero experience, using
    /// the player's account name as display name.
    pub fn get_or_create(
        &self,
        player_id: i64,
        display_name: &str,
        start_level: LevelId,
    ) -> Result<PlayerProgress> {
        if let Some(existing) = self.get(player_id)? {
            return Ok(existing);
        }

        let now = Utc::now().timestamp_millis();
        let conn = self.db.conn();
        conn.execute(
            r#"INSERT OR IGNORE INTO player_progress
               (player_id, display_name, level_id, xp, created_at, updated_at)
               VALUES (?1, ?2, ?3, 0, ?4, ?4)"#,
            rusqlite::params![player_id, display_name, start_level, now],
        )?;
        drop(conn);

        // Re-read in case a concurrent request created the row first
        self.get(player_id)?
            .ok_or_else(|| anyhow::anyhow!("progress row missing after insert for player {player_id}"))
    }

    /// Persist an updated progress record
    pub fn save(&self, progress: &PlayerProgress) -> Result<()> {
        let now = Utc::now().timestamp_millis();
        let conn = self.db.conn();
        conn.execute(
            r#"UPDATE player_progress
               SET display_name = ?2, level_id = ?3, xp = ?4, updated_at = ?5
               WHERE player_id = ?1"#,
            rusqlite::params![
                progress.player_id,
                progress.display_name,
                progress.level_id,
                progress.xp,
                now
            ],
        )?;
        Ok(())
    }
}

//! SQLite persistence for the game
//!
//! All state lives in one database file (`~/.farmstead/farmstead.db`):
//! user accounts, sessions, the level/unlock catalog and per-player
//! progression. The catalog tables are seeded on first open so a fresh
//! install has a playable ladder.

mod catalog;
mod progress;
mod seed;
mod sessions;
mod users;

pub use catalog::CatalogStore;
pub use progress::ProgressStore;
pub use sessions::SessionStore;
pub use users::{NewUser, ProfileUpdate, User, UserStore, UserStoreError};

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::config::Config;

/// Database wrapper shared between stores
#[derive(Clone)]
pub struct GameDb {
    conn: Arc<Mutex<Connection>>,
}

impl GameDb {
    /// Open or create the game database at the default location
    pub fn open_default() -> Result<Self> {
        let db_path = Config::data_dir().join("farmstead.db");
        Self::open(&db_path)
    }

    /// Open or create the game database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open game db: {}", path.display()))?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Get a reference to the connection (for queries)
    pub fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("Game DB lock poisoned")
    }

    /// Initialize the database schema and seed the catalog
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)?;
        drop(conn);
        self.run_migrations()?;
        seed::seed_catalog(self)?;
        Ok(())
    }

    /// Run any pending migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn();

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
            .unwrap_or(0);

        // Migration 2: land-area profile columns on users
        if version < 2 {
            let has_land_name: bool = conn
                .prepare("SELECT COUNT(*) FROM pragma_table_info('users') WHERE name = 'land_area_name'")
                .and_then(|mut s| s.query_row([], |r| r.get::<_, i32>(0)))
                .map(|c| c > 0)
                .unwrap_or(false);

            if !has_land_name {
                conn.execute_batch(
                    r#"
                    ALTER TABLE users ADD COLUMN land_area_name TEXT;
                    ALTER TABLE users ADD COLUMN land_area_description TEXT;
                    ALTER TABLE users ADD COLUMN land_area_size REAL;
                    ALTER TABLE users ADD COLUMN land_area_coordinates TEXT;
                    "#,
                )?;
            }
            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (2)", [])?;
        }

        Ok(())
    }

    /// Delete all player-facing state (accounts, sessions, progress).
    /// The seeded catalog is left in place.
    pub fn reset_players(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(
            r#"
            DELETE FROM sessions;
            DELETE FROM player_progress;
            DELETE FROM users;
            "#,
        )?;
        Ok(())
    }
}

/// SQL schema for the game database
const SCHEMA_SQL: &str = r#"
-- User accounts
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    land_area_name TEXT,
    land_area_description TEXT,
    land_area_size REAL,
    land_area_coordinates TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);

-- Login sessions (token per logged-in client)
CREATE TABLE IF NOT EXISTS sessions (
    token TEXT PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);

-- Level ladder
CREATE TABLE IF NOT EXISTS levels (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    xp_required INTEGER NOT NULL DEFAULT 0
);

-- Rewards granted at each level
CREATE TABLE IF NOT EXISTS unlocks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    level_id INTEGER NOT NULL REFERENCES levels(id) ON DELETE CASCADE,
    kind TEXT NOT NULL,
    item_id INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_unlocks_level ON unlocks(level_id);

-- Growable crops
CREATE TABLE IF NOT EXISTS plants (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    kind TEXT NOT NULL DEFAULT '',
    growth_secs INTEGER NOT NULL DEFAULT 0,
    value INTEGER NOT NULL DEFAULT 0
);

-- Watering methods
CREATE TABLE IF NOT EXISTS irrigation_methods (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    efficiency REAL NOT NULL DEFAULT 1.0,
    cost INTEGER NOT NULL DEFAULT 0
);

-- Per-player progression (one row per user; no FK so a stale level id
-- degrades softly instead of breaking writes)
CREATE TABLE IF NOT EXISTS player_progress (
    player_id INTEGER PRIMARY KEY,
    display_name TEXT NOT NULL,
    level_id INTEGER NOT NULL DEFAULT 1,
    xp INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (2);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_and_init() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test_game.db");
        let db = GameDb::open(&db_path).unwrap();

        let conn = db.conn();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap();
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"users".to_string()));
        assert!(tables.contains(&"levels".to_string()));
        assert!(tables.contains(&"unlocks".to_string()));
        assert!(tables.contains(&"player_progress".to_string()));
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test_game.db");
        drop(GameDb::open(&db_path).unwrap());
        let db = GameDb::open(&db_path).unwrap();

        // Seed rows are not duplicated on reopen
        let conn = db.conn();
        let levels: i64 = conn
            .query_row("SELECT COUNT(*) FROM levels", [], |r| r.get(0))
            .unwrap();
        assert!(levels > 0);
        let dupes: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM (SELECT id FROM levels GROUP BY id HAVING COUNT(*) > 1)",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(dupes, 0);
    }
}

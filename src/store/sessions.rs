//! Login session persistence
//!
//! One row per issued token. Logout deletes the row; anything else is
//! out of scope (no expiry sweep yet).

use anyhow::Result;
use chrono::Utc;
use rusqlite::OptionalExtension;

use super::GameDb;
use crate::auth;

/// Reads and writes `sessions` rows
#[derive(Clone)]
pub struct SessionStore {
    db: GameDb,
}

impl SessionStore {
    pub fn new(db: GameDb) -> Self {
        Self { db }
    }

    /// Issue a fresh session token for a user
    pub fn create(&self, user_id: i64) -> Result<String> {
        let token = auth::new_session_token();
        let now = Utc::now().timestamp_millis();
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![token, user_id, now],
        )?;
        Ok(token)
    }

    /// Resolve a token to the owning user id
    pub fn user_for_token(&self, token: &str) -> Result<Option<i64>> {
        let conn = self.db.conn();
        let user_id = conn
            .query_row(
                "SELECT user_id FROM sessions WHERE token = ?1",
                [token],
                |r| r.get(0),
            )
            .optional()?;
        Ok(user_id)
    }

    /// Invalidate a token; returns whether it existed
    pub fn delete(&self, token: &str) -> Result<bool> {
        let conn = self.db.conn();
        let deleted = conn.execute("DELETE FROM sessions WHERE token = ?1", [token])?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NewUser, UserStore};
    use tempfile::tempdir;

    #[test]
    fn test_session_lifecycle() {
        let dir = tempdir().unwrap();
        let db = GameDb::open(&dir.path().join("game.db")).unwrap();
        let users = UserStore::new(db.clone());
        let sessions = SessionStore::new(db);

        let user = users
            .create(&NewUser {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: "salt$hash".to_string(),
            })
            .unwrap();

        let token = sessions.create(user.id).unwrap();
        assert_eq!(sessions.user_for_token(&token).unwrap(), Some(user.id));

        assert!(sessions.delete(&token).unwrap());
        assert_eq!(sessions.user_for_token(&token).unwrap(), None);
        assert!(!sessions.delete(&token).unwrap());
    }
}

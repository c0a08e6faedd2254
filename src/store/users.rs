//! User account persistence

use anyhow::Result;
use chrono::Utc;
use rusqlite::OptionalExtension;
use serde::Serialize;

use super::GameDb;

/// A registered user account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub land_area_name: Option<String>,
    pub land_area_description: Option<String>,
    pub land_area_size: Option<f64>,
    /// Arbitrary JSON describing the plot's map coordinates
    pub land_area_coordinates: Option<serde_json::Value>,
}

/// Fields required to create an account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Profile fields a user may edit; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub land_area_name: Option<String>,
    pub land_area_description: Option<String>,
    pub land_area_size: Option<f64>,
    pub land_area_coordinates: Option<serde_json::Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    #[error("email already registered")]
    EmailTaken,
}

/// Reads and writes `users` rows
#[derive(Clone)]
pub struct UserStore {
    db: GameDb,
}

impl UserStore {
    pub fn new(db: GameDb) -> Self {
        Self { db }
    }

    /// Create a new account; fails if the email is already registered
    pub fn create(&self, new_user: &NewUser) -> Result<User> {
        let now = Utc::now().timestamp_millis();
        let conn = self.db.conn();
        let result = conn.execute(
            r#"INSERT INTO users (name, email, password_hash, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?4)"#,
            rusqlite::params![new_user.name, new_user.email, new_user.password_hash, now],
        );

        match result {
            Ok(_) => {
                let id = conn.last_insert_rowid();
                drop(conn);
                self.get(id)?
                    .ok_or_else(|| anyhow::anyhow!("user row missing after insert"))
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(UserStoreError::EmailTaken.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a user by id
    pub fn get(&self, id: i64) -> Result<Option<User>> {
        let conn = self.db.conn();
        let user = conn
            .query_row(
                &format!("{USER_SELECT} WHERE id = ?1"),
                [id],
                Self::map_user_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Look up a user by email
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.db.conn();
        let user = conn
            .query_row(
                &format!("{USER_SELECT} WHERE email = ?1"),
                [email],
                Self::map_user_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Apply a partial profile update and return the fresh record
    pub fn update_profile(&self, id: i64, update: &ProfileUpdate) -> Result<Option<User>> {
        let Some(current) = self.get(id)? else {
            return Ok(None);
        };

        let coords = update
            .land_area_coordinates
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?
            .or_else(|| {
                current
                    .land_area_coordinates
                    .as_ref()
                    .and_then(|v| serde_json::to_string(v).ok())
            });

        let now = Utc::now().timestamp_millis();
        let conn = self.db.conn();
        let result = conn.execute(
            r#"UPDATE users SET
                   name = ?2, email = ?3,
                   land_area_name = ?4, land_area_description = ?5,
                   land_area_size = ?6, land_area_coordinates = ?7,
                   updated_at = ?8
               WHERE id = ?1"#,
            rusqlite::params![
                id,
                update.name.as_ref().unwrap_or(&current.name),
                update.email.as_ref().unwrap_or(&current.email),
                update.land_area_name.as_ref().or(current.land_area_name.as_ref()),
                update
                    .land_area_description
                    .as_ref()
                    .or(current.land_area_description.as_ref()),
                update.land_area_size.or(current.land_area_size),
                coords,
                now
            ],
        );

        match result {
            Ok(_) => {
                drop(conn);
                self.get(id)
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(UserStoreError::EmailTaken.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the stored password hash
    pub fn update_password(&self, id: i64, password_hash: &str) -> Result<()> {
        let now = Utc::now().timestamp_millis();
        let conn = self.db.conn();
        conn.execute(
            "UPDATE users SET password_hash = ?2, updated_at = ?3 WHERE id = ?1",
            rusqlite::params![id, password_hash, now],
        )?;
        Ok(())
    }

    fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
        let coords_raw: Option<String> = row.get(7)?;
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            land_area_name: row.get(4)?,
            land_area_description: row.get(5)?,
            land_area_size: row.get(6)?,
            land_area_coordinates: coords_raw.and_then(|raw| serde_json::from_str(&raw).ok()),
        })
    }
}

const USER_SELECT: &str = "SELECT id, name, email, password_hash, land_area_name, \
     land_area_description, land_area_size, land_area_coordinates FROM users";

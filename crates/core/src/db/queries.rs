//! Typed query helpers for the saved-user table.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::Database;
use crate::errors::DatabaseError;
use crate::models::{SaveOutcome, SavedUser};

impl Database {
    /// All saved users, oldest first.
    pub fn list_saved_users(&self) -> Result<Vec<SavedUser>, DatabaseError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT login, avatar_url, html_url, saved_at
             FROM saved_users ORDER BY saved_at ASC, login ASC",
        )?;
        let users = stmt
            .query_map([], |row| {
                Ok(SavedUser {
                    login: row.get(0)?,
                    avatar_url: row.get(1)?,
                    html_url: row.get(2)?,
                    saved_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Look up one saved user by login.
    pub fn get_saved_user(&self, login: &str) -> Result<Option<SavedUser>, DatabaseError> {
        let conn = self.conn();
        let user = conn
            .query_row(
                "SELECT login, avatar_url, html_url, saved_at FROM saved_users WHERE login = ?1",
                params![login],
                |row| {
                    Ok(SavedUser {
                        login: row.get(0)?,
                        avatar_url: row.get(1)?,
                        html_url: row.get(2)?,
                        saved_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Save a user. An existing row with the same login is left untouched.
    pub fn save_user(
        &self,
        login: &str,
        avatar_url: &str,
        html_url: &str,
    ) -> Result<SaveOutcome, DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn();
        let inserted = conn.execute(
            "INSERT INTO saved_users (login, avatar_url, html_url, saved_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(login) DO NOTHING",
            params![login, avatar_url, html_url, now],
        )?;
        let already_exists = inserted == 0;
        debug!(login, already_exists, "save_user");
        Ok(SaveOutcome { already_exists })
    }

    /// Remove a saved user. Returns whether a row was deleted.
    pub fn remove_saved_user(&self, login: &str) -> Result<bool, DatabaseError> {
        let conn = self.conn();
        let deleted = conn.execute("DELETE FROM saved_users WHERE login = ?1", params![login])?;
        debug!(login, deleted, "remove_saved_user");
        Ok(deleted > 0)
    }
}

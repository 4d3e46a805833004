//! User profile operations

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{is_unique_violation, Database};
use crate::error::{Error, Result};
use crate::models::{User, UserUpdate};

impl Database {
    /// Get a user by id
    pub fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, name, email, image FROM users WHERE id = ?",
                params![id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        email: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        image: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(user)
    }

    /// Overwrite name and email
    ///
    /// Returns false if the user does not exist. An email already used by
    /// another user is `Error::Conflict`.
    pub fn update_user(&self, id: &str, update: &UserUpdate) -> Result<bool> {
        info!(user_id = id, "Updating user profile");
        let conn = self.conn()?;

        let result = conn.execute(
            "UPDATE users SET name = ?, email = ? WHERE id = ?",
            params![update.name.trim(), update.email.trim(), id],
        );

        match result {
            Ok(updated) => Ok(updated > 0),
            Err(e) if is_unique_violation(&e) => Err(Error::Conflict(format!(
                "Email {} is already in use",
                update.email.trim()
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

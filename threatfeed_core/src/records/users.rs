use crate::schema::USERS_TABLE;
use crate::{Connection, ConnectionErr};
use rusqlite::{params, OptionalExtension};
use serde::Serialize;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateUserOutcome {
    Created { id: i64 },
    AlreadyExists,
}

// Secrets are stored as given; credential hardening is out of scope here.
impl Connection {
    pub fn user_exists(&self, username: &str) -> Result<bool, ConnectionErr> {
        Ok(self.get_user(username)?.is_some())
    }

    pub fn get_user(&self, username: &str) -> Result<Option<User>, ConnectionErr> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT id, username, role FROM {} WHERE username = ?1", USERS_TABLE),
                [username],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        role: row.get(2)?,
                    })
                },
            )
            .optional()?)
    }

    pub fn create_user(
        &self,
        username: &str,
        secret: &str,
        role: &str,
    ) -> Result<CreateUserOutcome, ConnectionErr> {
        if username.trim().is_empty() {
            return Err(ConnectionErr::UserCreationErr {
                username: username.to_string(),
            });
        }
        if self.user_exists(username)? {
            return Ok(CreateUserOutcome::AlreadyExists);
        }

        self.conn.execute(
            &format!(
                "INSERT INTO {} (username, secret, role) VALUES (?1, ?2, ?3)",
                USERS_TABLE
            ),
            params![username, secret, role],
        )?;

        let id = self.conn.last_insert_rowid();
        info!(id, username, role, "created user");
        Ok(CreateUserOutcome::Created { id })
    }

    /// Returns the user when `secret` matches the stored one.
    pub fn authenticate(&self, username: &str, secret: &str) -> Result<Option<User>, ConnectionErr> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT id, username, role FROM {} WHERE username = ?1 AND secret = ?2",
                    USERS_TABLE
                ),
                [username, secret],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        role: row.get(2)?,
                    })
                },
            )
            .optional()?)
    }
}

//! User Storage
//! Mission: Securely store and manage user accounts with SQLite

use crate::auth::models::User;
use crate::db::{now_millis, Database, StoreError};
use bcrypt::{hash, verify, DEFAULT_COST};
use rusqlite::{params, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;

const USER_COLUMNS: &str =
    "user_id, user_name, user_email, password_hash, create_on, last_update";

/// User storage with SQLite backend
pub struct UserStore {
    db: Database,
    hash_cost: u32,
}

impl UserStore {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            hash_cost: DEFAULT_COST,
        }
    }

    /// bcrypt work factor used for new passwords
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Create a new user.
    ///
    /// Returns `StoreError::Duplicate` when the email is already registered
    /// (case-insensitive). The check is the UNIQUE index itself, so two
    /// concurrent signups for one email cannot both succeed.
    pub async fn create_user(
        &self,
        user_name: &str,
        user_email: &str,
        password: &str,
    ) -> Result<User, StoreError> {
        let cost = self.hash_cost;
        let password = password.to_string();
        let password_hash =
            tokio::task::spawn_blocking(move || hash(password, cost)).await??;

        let now = now_millis();
        let user = User {
            user_id: Uuid::new_v4().to_string(),
            user_name: user_name.to_string(),
            user_email: user_email.to_string(),
            password_hash,
            create_on: now,
            last_update: now,
        };

        let row = user.clone();
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO users (user_id, user_name, user_email, password_hash, create_on, last_update)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        row.user_id,
                        row.user_name,
                        row.user_email,
                        row.password_hash,
                        row.create_on,
                        row.last_update,
                    ],
                )?;
                Ok(())
            })
            .await?;

        info!("✅ Created user: {} ({})", user.user_name, user.user_id);

        Ok(user)
    }

    /// Get user by email (case-insensitive)
    pub async fn get_user_by_email(&self, user_email: &str) -> Result<Option<User>, StoreError> {
        let user_email = user_email.to_string();
        self.db
            .call(move |conn| {
                let user = conn
                    .query_row(
                        &format!("SELECT {USER_COLUMNS} FROM users WHERE user_email = ?1"),
                        params![user_email],
                        user_from_row,
                    )
                    .optional()?;
                Ok(user)
            })
            .await
    }

    /// Get user by id
    pub async fn get_user_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let user_id = user_id.to_string();
        self.db
            .call(move |conn| {
                let user = conn
                    .query_row(
                        &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
                        params![user_id],
                        user_from_row,
                    )
                    .optional()?;
                Ok(user)
            })
            .await
    }

    /// Verify email and password, returning the user on a match
    pub async fn verify_credentials(
        &self,
        user_email: &str,
        password: &str,
    ) -> Result<Option<User>, StoreError> {
        let Some(user) = self.get_user_by_email(user_email).await? else {
            return Ok(None);
        };

        let password = password.to_string();
        let stored_hash = user.password_hash.clone();
        let valid =
            tokio::task::spawn_blocking(move || verify(password, &stored_hash)).await??;

        Ok(valid.then_some(user))
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        user_id: row.get(0)?,
        user_name: row.get(1)?,
        user_email: row.get(2)?,
        password_hash: row.get(3)?,
        create_on: row.get(4)?,
        last_update: row.get(5)?,
    })
}

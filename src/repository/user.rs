use chrono::{NaiveDateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use crate::models::{UserProfile, UserSummary};

/// Identity record as stored, authentication material included. Stays inside
/// the repository and service layers; callers get [`UserProfile`] instead.
#[derive(sqlx::FromRow, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub joined_at: NaiveDateTime,
    pub last_login_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
#[must_use]
pub struct UserRepository {
    pub(super) connection: SqlitePool,
}

impl UserRepository {
    /// Insert a new user with `joined_at` and `last_login_at` both set to
    /// now. The insert itself is the uniqueness check: a concurrent create
    /// of the same username loses on the primary key and reports
    /// [`CreateUserError::UsernameTaken`].
    #[instrument(skip(self, password_hash))]
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<User, CreateUserError> {
        let now = Utc::now().naive_utc();
        let query = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash, first_name, last_name, phone, joined_at, last_login_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING username, password_hash, first_name, last_name, phone, joined_at, last_login_at",
        )
        .bind(username)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .bind(phone)
        .bind(now)
        .bind(now);

        query
            .fetch_one(&self.connection)
            .await
            .inspect(|user| tracing::debug!(username = user.username, "Created new user"))
            .map_err(|error| {
                if super::is_duplicate_key(&error) {
                    tracing::debug!("Rejecting user creation: username is taken");
                    CreateUserError::UsernameTaken
                } else {
                    tracing::error!(?error, "Database error during user creation");
                    CreateUserError::Database(error)
                }
            })
    }

    #[instrument(skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT username, password_hash, first_name, last_name, phone, joined_at, last_login_at
             FROM users
             WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.connection)
        .await
    }

    /// Record the moment a login succeeded.
    #[instrument(skip(self))]
    pub async fn update_login_timestamp(&self, username: &str) -> Result<(), ProfileError> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query("UPDATE users SET last_login_at = ? WHERE username = ?")
            .bind(now)
            .bind(username)
            .execute(&self.connection)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ProfileError::NotFound);
        }
        tracing::trace!("Updated login timestamp");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn profile(&self, username: &str) -> Result<Option<UserProfile>, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT username, first_name, last_name, phone, joined_at, last_login_at
             FROM users
             WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.connection)
        .await
    }

    /// Basic info on every user. No ordering is promised.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>("SELECT username, first_name, last_name, phone FROM users")
            .fetch_all(&self.connection)
            .await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error("A user with this username already exists")]
    UsernameTaken,

    #[error("Internal database error")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("No such user")]
    NotFound,

    #[error("Internal database error")]
    Database(#[from] sqlx::Error),
}

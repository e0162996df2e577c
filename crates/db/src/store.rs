//! Storage traits used by the auth core and HTTP handlers.
//!
//! Handlers hold an `Arc<dyn Store>` so the same code runs against Postgres
//! ([`crate::PgStore`]) in production and [`crate::MemoryStore`] in tests.
//! Each method is a single atomic operation; callers add no locking.

use async_trait::async_trait;
use chirpy_core::types::DbId;

use crate::models::chirp::{Chirp, ChirpFilter, CreateChirp};
use crate::models::refresh_token::{CreateRefreshToken, RefreshToken};
use crate::models::user::{CreateUser, UpdateCredentials, User};

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Errors returned by any [`Store`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("Duplicate value violates unique constraint: {0}")]
    Conflict(String),

    /// The write referenced a row that does not exist (e.g. a deleted user).
    #[error("Referenced row does not exist: {0}")]
    MissingReference(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    tracing::debug!(%constraint, "Unique constraint violation");
                    return StoreError::Conflict(constraint);
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    tracing::debug!(%constraint, "Foreign key violation");
                    return StoreError::MissingReference(constraint);
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with [`StoreError::Conflict`] on a duplicate email.
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError>;

    /// Credential lookup used by login.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, StoreError>;

    /// Replace email and password hash. `None` if the user does not exist.
    async fn update_user_credentials(
        &self,
        id: DbId,
        input: &UpdateCredentials,
    ) -> Result<Option<User>, StoreError>;

    /// Set the Chirpy Red flag. `false` if the user does not exist.
    async fn upgrade_to_chirpy_red(&self, id: DbId) -> Result<bool, StoreError>;

    /// Delete every user together with their chirps and refresh tokens.
    async fn delete_all_users(&self) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn create_chirp(&self, input: &CreateChirp) -> Result<Chirp, StoreError>;

    async fn find_chirp(&self, id: DbId) -> Result<Option<Chirp>, StoreError>;

    async fn list_chirps(&self, filter: &ChirpFilter) -> Result<Vec<Chirp>, StoreError>;

    /// `false` if the chirp does not exist.
    async fn delete_chirp(&self, id: DbId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a new token. Fails with [`StoreError::Conflict`] if the token
    /// string already exists.
    async fn create_refresh_token(
        &self,
        input: &CreateRefreshToken,
    ) -> Result<RefreshToken, StoreError>;

    /// Fetch a token row whatever its expiry or revocation state.
    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError>;

    /// Stamp `revoked_at = now`. `false` if the token does not exist.
    async fn revoke_refresh_token(&self, token: &str) -> Result<bool, StoreError>;
}

/// The full storage surface of the application.
#[async_trait]
pub trait Store: UserStore + ChirpStore + RefreshTokenStore {
    /// Check that the backing storage is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

//! Opaque refresh tokens: generation, issuance, validation, and revocation.
//!
//! A refresh token is 32 bytes from the OS CSPRNG, hex-encoded. Its state
//! (owner, expiry, revocation) lives in the store; the token string itself
//! carries no information. Tokens are reusable until they expire or are
//! revoked, and a user may hold any number of them at once.

use chirpy_core::types::{DbId, Timestamp};
use chirpy_db::models::refresh_token::{CreateRefreshToken, RefreshToken};
use chirpy_db::{RefreshTokenStore, StoreError};
use chrono::{Duration, Utc};
use rand::rngs::OsRng;
use rand::TryRngCore;

/// Number of random bytes in a refresh token (256 bits).
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Default refresh token lifetime in days.
pub const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 60;

/// Reasons a refresh token operation fails.
#[derive(Debug, thiserror::Error)]
pub enum RefreshTokenError {
    #[error("refresh token not found")]
    NotFound,

    #[error("refresh token expired")]
    Expired,

    #[error("refresh token revoked")]
    Revoked,

    /// `now + ttl` falls outside the representable calendar.
    #[error("refresh token expiry out of range")]
    ExpiryOverflow,

    #[error("random source failed: {0}")]
    RandomSource(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Draw a fresh refresh token: 32 random bytes as 64 lowercase hex characters.
pub fn generate_refresh_token() -> Result<String, RefreshTokenError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| RefreshTokenError::RandomSource(e.to_string()))?;
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

/// Decide whether a stored record may be used at `now`.
///
/// Expiry is checked first: `now >= expires_at` is expired. A revoked
/// record is rejected whatever its expiry.
pub fn check_refresh_token(record: &RefreshToken, now: Timestamp) -> Result<DbId, RefreshTokenError> {
    if now >= record.expires_at {
        return Err(RefreshTokenError::Expired);
    }
    if record.revoked_at.is_some() {
        return Err(RefreshTokenError::Revoked);
    }
    Ok(record.user_id)
}

/// Issues, validates, and revokes refresh tokens against a store.
#[derive(Debug, Clone)]
pub struct RefreshTokenManager {
    ttl: Duration,
}

impl RefreshTokenManager {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Generate a token for `user_id` and persist it with `expires_at = now + ttl`.
    pub async fn issue<S>(&self, store: &S, user_id: DbId) -> Result<RefreshToken, RefreshTokenError>
    where
        S: RefreshTokenStore + ?Sized,
    {
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or(RefreshTokenError::ExpiryOverflow)?;
        let input = CreateRefreshToken {
            token: generate_refresh_token()?,
            user_id,
            expires_at,
        };
        Ok(store.create_refresh_token(&input).await?)
    }

    /// Look up `token` and return its owner if it is still usable.
    ///
    /// Reading a token never changes its state.
    pub async fn validate<S>(&self, store: &S, token: &str) -> Result<DbId, RefreshTokenError>
    where
        S: RefreshTokenStore + ?Sized,
    {
        let record = store
            .find_refresh_token(token)
            .await?
            .ok_or(RefreshTokenError::NotFound)?;
        check_refresh_token(&record, Utc::now())
    }

    /// Mark `token` revoked. Revoking twice succeeds and re-stamps the time.
    pub async fn revoke<S>(&self, store: &S, token: &str) -> Result<(), RefreshTokenError>
    where
        S: RefreshTokenStore + ?Sized,
    {
        if store.revoke_refresh_token(token).await? {
            Ok(())
        } else {
            Err(RefreshTokenError::NotFound)
        }
    }
}

impl Default for RefreshTokenManager {
    fn default() -> Self {
        Self::new(Duration::days(DEFAULT_REFRESH_EXPIRY_DAYS))
    }
}

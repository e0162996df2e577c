//! Repository for the `refresh_tokens` table.
//!
//! Rows are looked up by the opaque token string itself. Validity
//! (expiry, revocation) is decided by the caller, not filtered here, so the
//! caller can tell an expired or revoked token apart from an unknown one.

use sqlx::PgPool;

use crate::models::refresh_token::{CreateRefreshToken, RefreshToken};

const COLUMNS: &str = "token, user_id, created_at, updated_at, expires_at, revoked_at";

/// Provides create/read/revoke operations for refresh tokens.
pub struct RefreshTokenRepo;

impl RefreshTokenRepo {
    /// Insert a new refresh token, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRefreshToken,
    ) -> Result<RefreshToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO refresh_tokens (token, user_id, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(&input.token)
            .bind(input.user_id)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a refresh token row regardless of its expiry or revocation state.
    pub async fn find_by_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<RefreshToken>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM refresh_tokens WHERE token = $1");
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Stamp `revoked_at = NOW()`. Returns `true` if the row exists.
    ///
    /// Revoking an already revoked token re-stamps the timestamp.
    pub async fn revoke(pool: &PgPool, token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW(), updated_at = NOW() WHERE token = $1",
        )
        .bind(token)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Refresh token model and DTOs.

use chirpy_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A refresh token row from the `refresh_tokens` table.
///
/// The token string is the primary key, so it is unique across all rows.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

/// DTO for persisting a newly issued refresh token.
#[derive(Debug)]
pub struct CreateRefreshToken {
    pub token: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
}

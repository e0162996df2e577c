//! Domain-level error type shared by every Chirpy crate.

use crate::types::DbId;

/// Errors raised by domain rules, independent of transport or storage.
///
/// The HTTP layer maps each variant to a status code; the message is
/// considered safe to show to API clients.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Client input failed a domain rule (chirp too long, bad email, ...).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The write would violate a uniqueness rule.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller has a valid identity but may not act on this record.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

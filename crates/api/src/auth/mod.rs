//! Authentication primitives and the flows composed from them.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- signed, expiring session tokens (HS256 JWT).
//! - [`refresh_token`] -- opaque refresh tokens with stored expiry/revocation.
//! - [`credentials`] -- `Authorization` header parsing (bearer and API key).
//! - [`service`] -- login, refresh, revoke, and the protected-route check.

pub mod credentials;
pub mod jwt;
pub mod password;
pub mod refresh_token;
pub mod service;

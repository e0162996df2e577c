//! Credential extraction from the `Authorization` header.
//!
//! Two schemes are recognised, each for a different trust boundary:
//!
//! | Scheme   | Carries                                  | Used by              |
//! |----------|------------------------------------------|----------------------|
//! | `Bearer` | session token or refresh token (per user) | API clients          |
//! | `ApiKey` | static operator key                      | payment webhook      |
//!
//! Scheme names are case-sensitive.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

/// Fixed HMAC key used only to turn API key comparison into a
/// constant-time tag check.
const API_KEY_COMPARISON_KEY: &[u8] = b"chirpy-api-key-comparison";

type HmacSha256 = Hmac<Sha256>;

/// Why no credential could be taken from the request.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// No `Authorization` header, or nothing after the scheme prefix.
    #[error("missing credential")]
    Missing,

    /// The header uses a different scheme than the one expected.
    #[error("wrong authorization scheme, expected {expected:?}")]
    WrongScheme { expected: &'static str },

    /// The header value is not visible ASCII.
    #[error("unreadable authorization header")]
    Unreadable,

    /// A well-formed API key that is not the configured one.
    #[error("API key does not match")]
    KeyMismatch,
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// Whitespace around the token is trimmed.
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, CredentialError> {
    extract_with_prefix(headers, BEARER_PREFIX)
}

/// Extract the key from `Authorization: ApiKey <key>`.
pub fn extract_api_key(headers: &HeaderMap) -> Result<String, CredentialError> {
    extract_with_prefix(headers, API_KEY_PREFIX)
}

fn extract_with_prefix(headers: &HeaderMap, prefix: &'static str) -> Result<String, CredentialError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(CredentialError::Missing)?
        .to_str()
        .map_err(|_| CredentialError::Unreadable)?;

    let credential = value
        .strip_prefix(prefix)
        .ok_or(CredentialError::WrongScheme {
            expected: prefix.trim_end(),
        })?
        .trim();

    if credential.is_empty() {
        return Err(CredentialError::Missing);
    }
    Ok(credential.to_string())
}

/// Extract the API key and check it against `expected`.
pub fn verify_api_key(headers: &HeaderMap, expected: &str) -> Result<(), CredentialError> {
    let key = extract_api_key(headers)?;
    if api_key_matches(&key, expected) {
        Ok(())
    } else {
        Err(CredentialError::KeyMismatch)
    }
}

/// Compare a presented API key with the configured one in constant time.
///
/// Both keys are MACed under a fixed key and the tags compared with
/// [`Mac::verify_slice`]. An empty configured key never matches.
pub fn api_key_matches(provided: &str, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    let (Ok(mut expected_mac), Ok(mut provided_mac)) = (
        HmacSha256::new_from_slice(API_KEY_COMPARISON_KEY),
        HmacSha256::new_from_slice(API_KEY_COMPARISON_KEY),
    ) else {
        return false;
    };
    expected_mac.update(expected.as_bytes());
    provided_mac.update(provided.as_bytes());
    let expected_tag = expected_mac.finalize().into_bytes();
    provided_mac.verify_slice(&expected_tag).is_ok()
}

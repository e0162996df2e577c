//! Session tokens: HS256-signed JWTs asserting a user identity.
//!
//! Tokens are stateless and cannot be revoked; a correctly signed token is
//! accepted until `exp`. Verification pins the algorithm to the HMAC family
//! before checking the signature, so a token claiming `none` or an asymmetric
//! algorithm is rejected as a bad signature.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chirpy_core::types::DbId;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Value of the `iss` claim on every token this service issues.
pub const TOKEN_ISSUER: &str = "chirpy";

/// Session token lifetime in seconds.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 3600;

/// Algorithms accepted on verification. Issuance always uses HS256.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Issuer, always [`TOKEN_ISSUER`].
    pub iss: String,
    /// Subject -- the user's id as a hyphenated UUID string.
    pub sub: String,
    /// Issued-at time (UTC Unix timestamp, seconds).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp, seconds, truncated).
    pub exp: i64,
}

/// Reasons a session token is rejected.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    /// Signature mismatch, or an algorithm outside the HMAC family.
    #[error("bad signature")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("subject is not a valid user id")]
    InvalidSubject,

    /// `now + ttl` falls outside the representable calendar.
    #[error("token expiry out of range")]
    ExpiryOverflow,

    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Signing secret and token lifetimes, loaded by [`crate::config::ServerConfig`].
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret used to sign and verify session tokens.
    pub secret: String,
    /// Session token lifetime in seconds (fixed at [`ACCESS_TOKEN_TTL_SECS`]).
    pub access_token_ttl_secs: i64,
    /// Refresh token lifetime in days.
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, refresh_token_expiry_days: i64) -> Self {
        Self {
            secret: secret.into(),
            access_token_ttl_secs: ACCESS_TOKEN_TTL_SECS,
            refresh_token_expiry_days,
        }
    }

    pub fn access_token_ttl(&self) -> Duration {
        Duration::seconds(self.access_token_ttl_secs)
    }

    /// Saturates at [`Duration::MAX`]; issuance then fails with an overflow error.
    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::try_days(self.refresh_token_expiry_days).unwrap_or(Duration::MAX)
    }
}

/// Only the `alg` field is needed to pin the algorithm family.
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Issue a session token for `user_id`, valid for `ttl` from now.
pub fn make_access_token(user_id: DbId, secret: &str, ttl: Duration) -> Result<String, TokenError> {
    let now = Utc::now();
    let expires_at = now.checked_add_signed(ttl).ok_or(TokenError::ExpiryOverflow)?;
    let claims = Claims {
        iss: TOKEN_ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Signing)
}

/// Verify a session token and return the user id it asserts.
///
/// Checks run in order: structure, algorithm family, signature, expiry,
/// subject. Expiry compares the current time at full precision against the
/// whole-second `exp`, so a token is dead as soon as `now > exp`.
pub fn validate_access_token(token: &str, secret: &str) -> Result<DbId, TokenError> {
    ensure_hmac_algorithm(token)?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = HMAC_ALGORITHMS.to_vec();
    validation.leeway = 0;
    // Expiry is checked below with sub-second precision.
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::InvalidKeyFormat => TokenError::BadSignature,
        _ => TokenError::Malformed,
    })?;
    let claims = token_data.claims;

    let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0).ok_or(TokenError::Malformed)?;
    if Utc::now() > expires_at {
        return Err(TokenError::Expired);
    }

    Uuid::parse_str(&claims.sub).map_err(|_| TokenError::InvalidSubject)
}

/// Reject tokens whose header names an algorithm outside the HMAC family.
fn ensure_hmac_algorithm(token: &str) -> Result<(), TokenError> {
    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed);
    };

    let header_json = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::Malformed)?;
    let header: RawHeader =
        serde_json::from_slice(&header_json).map_err(|_| TokenError::Malformed)?;

    match header.alg.as_str() {
        "HS256" | "HS384" | "HS512" => Ok(()),
        other => {
            tracing::warn!(alg = %other, "Rejected session token with non-HMAC algorithm");
            Err(TokenError::BadSignature)
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

    fn sign_claims(claims: &Claims, alg: Algorithm, secret: &str) -> String {
        encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    fn fresh_claims(sub: String) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            iss: TOKEN_ISSUER.to_string(),
            sub,
            iat: now,
            exp: now + 600,
        }
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let user_id = Uuid::new_v4();
        let token = make_access_token(user_id, SECRET, Duration::seconds(ACCESS_TOKEN_TTL_SECS))
            .expect("token generation should succeed");

        let parsed = validate_access_token(&token, SECRET).expect("token should validate");
        assert_eq!(parsed, user_id);
    }

    #[test]
    fn test_claims_carry_issuer_and_expiry() {
        let token = make_access_token(Uuid::new_v4(), SECRET, Duration::seconds(3600)).unwrap();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .expect("decode should succeed");

        assert_eq!(data.header.alg, Algorithm::HS256);
        assert_eq!(data.claims.iss, TOKEN_ISSUER);
        let lifetime = data.claims.exp - data.claims.iat;
        assert!((3599..=3600).contains(&lifetime), "lifetime was {lifetime}");
    }

    #[test]
    fn test_expired_token_fails() {
        let token = make_access_token(Uuid::new_v4(), SECRET, Duration::milliseconds(1))
            .expect("token generation should succeed");

        std::thread::sleep(std::time::Duration::from_millis(2));

        let result = validate_access_token(&token, SECRET);
        assert_matches!(result, Err(TokenError::Expired));
    }

    #[test]
    fn test_unrepresentable_expiry_is_an_error() {
        let result = make_access_token(Uuid::new_v4(), SECRET, Duration::MAX);
        assert_matches!(result, Err(TokenError::ExpiryOverflow));
    }

    #[test]
    fn test_huge_refresh_expiry_saturates() {
        let config = JwtConfig::new(SECRET, i64::MAX);
        assert_eq!(config.refresh_token_ttl(), Duration::MAX);
    }

    #[test]
    fn test_different_secrets_fail() {
        let token = make_access_token(Uuid::new_v4(), "correct-secret", Duration::minutes(1))
            .expect("token generation should succeed");

        let result = validate_access_token(&token, "wrong-secret");
        assert_matches!(result, Err(TokenError::BadSignature));
    }

    #[test]
    fn test_other_hmac_algorithms_are_accepted() {
        let user_id = Uuid::new_v4();
        let token = sign_claims(&fresh_claims(user_id.to_string()), Algorithm::HS512, SECRET);

        assert_eq!(validate_access_token(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_alg_none_is_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let claims = serde_json::to_vec(&fresh_claims(Uuid::new_v4().to_string())).unwrap();
        let token = format!("{header}.{}.", URL_SAFE_NO_PAD.encode(claims));

        let result = validate_access_token(&token, SECRET);
        assert_matches!(result, Err(TokenError::BadSignature));
    }

    #[test]
    fn test_asymmetric_algorithm_is_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let claims = serde_json::to_vec(&fresh_claims(Uuid::new_v4().to_string())).unwrap();
        let token = format!("{header}.{}.c2lnbmF0dXJl", URL_SAFE_NO_PAD.encode(claims));

        let result = validate_access_token(&token, SECRET);
        assert_matches!(result, Err(TokenError::BadSignature));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert_matches!(
            validate_access_token("not-a-jwt", SECRET),
            Err(TokenError::Malformed)
        );
        assert_matches!(
            validate_access_token("a.b.c.d", SECRET),
            Err(TokenError::Malformed)
        );
        assert_matches!(
            validate_access_token("!!!.e30.sig", SECRET),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_non_uuid_subject_is_invalid() {
        let token = sign_claims(&fresh_claims("user-42".to_string()), Algorithm::HS256, SECRET);

        let result = validate_access_token(&token, SECRET);
        assert_matches!(result, Err(TokenError::InvalidSubject));
    }
}

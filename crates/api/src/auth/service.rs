//! Auth flows composed from the primitives in this module.
//!
//! [`AuthService`] owns the signing secret, the token lifetimes, and the
//! store handle. Every store call it makes runs under a deadline so a stalled
//! backend fails the request instead of hanging it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderMap;
use chirpy_core::types::DbId;
use chirpy_db::models::user::User;
use chirpy_db::{Store, StoreError};

use crate::auth::credentials::{extract_bearer, CredentialError};
use crate::auth::jwt::{make_access_token, validate_access_token, JwtConfig, TokenError};
use crate::auth::password::{verify_against_dummy, verify_password, PasswordError};
use crate::auth::refresh_token::{RefreshTokenError, RefreshTokenManager};

/// Default deadline for a single store call made by an auth flow.
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 5;

/// Why an auth flow rejected a request.
///
/// `UnknownEmail` and `Password` stay separate here and in logs; the HTTP
/// layer collapses them into one response.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error("no user with that email")]
    UnknownEmail,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    SessionToken(#[from] TokenError),

    #[error(transparent)]
    RefreshToken(#[from] RefreshTokenError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("store did not answer within {0:?}")]
    StoreTimeout(Duration),
}

/// The identity proven by a valid session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: DbId,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Login, protected-route check, refresh, and revoke.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    jwt: JwtConfig,
    refresh: RefreshTokenManager,
    store_timeout: Duration,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, jwt: JwtConfig, store_timeout: Duration) -> Self {
        let refresh = RefreshTokenManager::new(jwt.refresh_token_ttl());
        Self {
            store,
            jwt,
            refresh,
            store_timeout,
        }
    }

    /// Check an email and password, then issue a session token and a refresh token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSession, AuthError> {
        let Some(user) = self.bounded(self.store.find_user_by_email(email)).await? else {
            verify_against_dummy(password);
            return Err(AuthError::UnknownEmail);
        };

        verify_password(password, &user.hashed_password)?;

        let access_token = self.issue_access_token(user.id)?;
        let refresh = self.bounded(self.refresh.issue(self.store.as_ref(), user.id)).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginSession {
            user,
            access_token,
            refresh_token: refresh.token,
        })
    }

    /// Guard for protected routes: bearer extraction, then session token verification.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        let token = extract_bearer(headers)?;
        let user_id = validate_access_token(&token, &self.jwt.secret)?;
        Ok(AuthUser { user_id })
    }

    /// Exchange a usable refresh token for a new session token.
    ///
    /// The refresh token itself is left as is and may be presented again.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let user_id = self
            .bounded(self.refresh.validate(self.store.as_ref(), refresh_token))
            .await?;
        self.issue_access_token(user_id)
    }

    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.bounded(self.refresh.revoke(self.store.as_ref(), refresh_token))
            .await?;
        tracing::info!("Refresh token revoked");
        Ok(())
    }

    fn issue_access_token(&self, user_id: DbId) -> Result<String, AuthError> {
        Ok(make_access_token(
            user_id,
            &self.jwt.secret,
            self.jwt.access_token_ttl(),
        )?)
    }

    /// Run a store operation under the configured deadline.
    async fn bounded<F, T, E>(&self, operation: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, E>>,
        AuthError: From<E>,
    {
        match tokio::time::timeout(self.store_timeout, operation).await {
            Ok(result) => result.map_err(AuthError::from),
            Err(_) => {
                tracing::error!(timeout = ?self.store_timeout, "Store call timed out");
                Err(AuthError::StoreTimeout(self.store_timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use axum::http::header::AUTHORIZATION;
    use axum::http::HeaderValue;
    use chirpy_db::models::chirp::{Chirp, ChirpFilter, CreateChirp};
    use chirpy_db::models::refresh_token::{CreateRefreshToken, RefreshToken};
    use chirpy_db::models::user::{CreateUser, UpdateCredentials};
    use chirpy_db::{ChirpStore, MemoryStore, RefreshTokenStore, UserStore};
    use chrono::Utc;

    use super::*;
    use crate::auth::password::hash_password;

    const SECRET: &str = "service-test-secret";

    async fn service_with_user(email: &str, password: &str) -> (AuthService, Arc<MemoryStore>, User) {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .create_user(&CreateUser {
                email: email.to_string(),
                hashed_password: hash_password(password).unwrap(),
            })
            .await
            .unwrap();
        let service = AuthService::new(
            store.clone(),
            JwtConfig::new(SECRET, 60),
            Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
        );
        (service, store, user)
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn test_login_issues_both_tokens() {
        let (service, store, user) = service_with_user("a@b.com", "secret123").await;

        let session = service.login("a@b.com", "secret123").await.unwrap();

        assert_eq!(session.user.id, user.id);
        assert_eq!(validate_access_token(&session.access_token, SECRET).unwrap(), user.id);
        assert_eq!(session.refresh_token.len(), 64);
        assert!(session.refresh_token.chars().all(|c| c.is_ascii_hexdigit()));

        let stored = store
            .find_refresh_token(&session.refresh_token)
            .await
            .unwrap()
            .expect("refresh token should be persisted");
        assert_eq!(stored.user_id, user.id);
        let ttl = stored.expires_at - Utc::now();
        assert!((ttl - chrono::Duration::days(60)).num_seconds().abs() <= 5);
    }

    #[tokio::test]
    async fn test_login_failures_stay_distinct() {
        let (service, _store, _user) = service_with_user("a@b.com", "secret123").await;

        assert_matches!(
            service.login("nobody@b.com", "secret123").await,
            Err(AuthError::UnknownEmail)
        );
        assert_matches!(
            service.login("a@b.com", "wrong").await,
            Err(AuthError::Password(PasswordError::Mismatch))
        );
    }

    #[tokio::test]
    async fn test_unknown_email_issues_nothing() {
        let (service, store, _user) = service_with_user("a@b.com", "secret123").await;

        for _ in 0..2 {
            assert_matches!(
                service.login("ghost@b.com", "secret123").await,
                Err(AuthError::UnknownEmail)
            );
        }
        assert!(store.find_user_by_email("ghost@b.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_accepts_login_token() {
        let (service, _store, user) = service_with_user("a@b.com", "secret123").await;
        let session = service.login("a@b.com", "secret123").await.unwrap();

        let auth_user = service.authenticate(&bearer(&session.access_token)).unwrap();
        assert_eq!(auth_user.user_id, user.id);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_missing_and_bad_tokens() {
        let (service, _store, _user) = service_with_user("a@b.com", "secret123").await;

        assert_matches!(
            service.authenticate(&HeaderMap::new()),
            Err(AuthError::Credentials(CredentialError::Missing))
        );
        assert_matches!(
            service.authenticate(&bearer("not-a-jwt")),
            Err(AuthError::SessionToken(TokenError::Malformed))
        );
    }

    #[tokio::test]
    async fn test_refresh_reuses_refresh_token() {
        let (service, _store, user) = service_with_user("a@b.com", "secret123").await;
        let session = service.login("a@b.com", "secret123").await.unwrap();

        let first = service.refresh(&session.refresh_token).await.unwrap();
        let second = service.refresh(&session.refresh_token).await.unwrap();

        assert_eq!(validate_access_token(&first, SECRET).unwrap(), user.id);
        assert_eq!(validate_access_token(&second, SECRET).unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_refresh_after_revoke_fails_as_revoked() {
        let (service, _store, _user) = service_with_user("a@b.com", "secret123").await;
        let session = service.login("a@b.com", "secret123").await.unwrap();

        service.revoke(&session.refresh_token).await.unwrap();

        assert_matches!(
            service.refresh(&session.refresh_token).await,
            Err(AuthError::RefreshToken(RefreshTokenError::Revoked))
        );
    }

    #[tokio::test]
    async fn test_unknown_refresh_token_fails() {
        let (service, _store, _user) = service_with_user("a@b.com", "secret123").await;

        assert_matches!(
            service.refresh("deadbeef").await,
            Err(AuthError::RefreshToken(RefreshTokenError::NotFound))
        );
        assert_matches!(
            service.revoke("deadbeef").await,
            Err(AuthError::RefreshToken(RefreshTokenError::NotFound))
        );
    }

    // -----------------------------------------------------------------------
    // Stalled store
    // -----------------------------------------------------------------------

    /// A store whose every call never completes.
    struct StalledStore;

    async fn stall<T>() -> Result<T, StoreError> {
        std::future::pending().await
    }

    #[async_trait]
    impl UserStore for StalledStore {
        async fn create_user(&self, _input: &CreateUser) -> Result<User, StoreError> {
            stall().await
        }
        async fn find_user_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
            stall().await
        }
        async fn find_user_by_id(&self, _id: DbId) -> Result<Option<User>, StoreError> {
            stall().await
        }
        async fn update_user_credentials(
            &self,
            _id: DbId,
            _input: &UpdateCredentials,
        ) -> Result<Option<User>, StoreError> {
            stall().await
        }
        async fn upgrade_to_chirpy_red(&self, _id: DbId) -> Result<bool, StoreError> {
            stall().await
        }
        async fn delete_all_users(&self) -> Result<u64, StoreError> {
            stall().await
        }
    }

    #[async_trait]
    impl ChirpStore for StalledStore {
        async fn create_chirp(&self, _input: &CreateChirp) -> Result<Chirp, StoreError> {
            stall().await
        }
        async fn find_chirp(&self, _id: DbId) -> Result<Option<Chirp>, StoreError> {
            stall().await
        }
        async fn list_chirps(&self, _filter: &ChirpFilter) -> Result<Vec<Chirp>, StoreError> {
            stall().await
        }
        async fn delete_chirp(&self, _id: DbId) -> Result<bool, StoreError> {
            stall().await
        }
    }

    #[async_trait]
    impl RefreshTokenStore for StalledStore {
        async fn create_refresh_token(
            &self,
            _input: &CreateRefreshToken,
        ) -> Result<RefreshToken, StoreError> {
            stall().await
        }
        async fn find_refresh_token(&self, _token: &str) -> Result<Option<RefreshToken>, StoreError> {
            stall().await
        }
        async fn revoke_refresh_token(&self, _token: &str) -> Result<bool, StoreError> {
            stall().await
        }
    }

    #[async_trait]
    impl Store for StalledStore {
        async fn ping(&self) -> Result<(), StoreError> {
            stall().await
        }
    }

    #[tokio::test]
    async fn test_stalled_store_times_out() {
        let service = AuthService::new(
            Arc::new(StalledStore),
            JwtConfig::new(SECRET, 60),
            Duration::from_millis(20),
        );

        assert_matches!(
            service.login("a@b.com", "secret123").await,
            Err(AuthError::StoreTimeout(_))
        );
        assert_matches!(service.refresh("deadbeef").await, Err(AuthError::StoreTimeout(_)));
    }
}

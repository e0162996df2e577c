//! [`Store`] implementation backed by PostgreSQL via the `*Repo` query types.

use async_trait::async_trait;
use chirpy_core::types::DbId;

use crate::models::chirp::{Chirp, ChirpFilter, CreateChirp};
use crate::models::refresh_token::{CreateRefreshToken, RefreshToken};
use crate::models::user::{CreateUser, UpdateCredentials, User};
use crate::repositories::{ChirpRepo, RefreshTokenRepo, UserRepo};
use crate::store::{ChirpStore, RefreshTokenStore, Store, StoreError, UserStore};
use crate::DbPool;

/// Postgres-backed store. Cheap to clone; the pool is reference counted.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn update_user_credentials(
        &self,
        id: DbId,
        input: &UpdateCredentials,
    ) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::update_credentials(&self.pool, id, input).await?)
    }

    async fn upgrade_to_chirpy_red(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(UserRepo::upgrade_to_chirpy_red(&self.pool, id).await?)
    }

    async fn delete_all_users(&self) -> Result<u64, StoreError> {
        Ok(UserRepo::delete_all(&self.pool).await?)
    }
}

#[async_trait]
impl ChirpStore for PgStore {
    async fn create_chirp(&self, input: &CreateChirp) -> Result<Chirp, StoreError> {
        Ok(ChirpRepo::create(&self.pool, input).await?)
    }

    async fn find_chirp(&self, id: DbId) -> Result<Option<Chirp>, StoreError> {
        Ok(ChirpRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_chirps(&self, filter: &ChirpFilter) -> Result<Vec<Chirp>, StoreError> {
        Ok(ChirpRepo::list(&self.pool, filter).await?)
    }

    async fn delete_chirp(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(ChirpRepo::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl RefreshTokenStore for PgStore {
    async fn create_refresh_token(
        &self,
        input: &CreateRefreshToken,
    ) -> Result<RefreshToken, StoreError> {
        Ok(RefreshTokenRepo::create(&self.pool, input).await?)
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        Ok(RefreshTokenRepo::find_by_token(&self.pool, token).await?)
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<bool, StoreError> {
        Ok(RefreshTokenRepo::revoke(&self.pool, token).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

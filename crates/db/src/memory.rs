//! In-process [`Store`] used by tests and local experiments.
//!
//! Mirrors the Postgres schema rules that callers can observe: unique
//! emails, unique token strings, foreign keys to `users`, and cascading
//! deletes.

use std::collections::HashMap;

use async_trait::async_trait;
use chirpy_core::types::DbId;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::chirp::{Chirp, ChirpFilter, CreateChirp, SortDirection};
use crate::models::refresh_token::{CreateRefreshToken, RefreshToken};
use crate::models::user::{CreateUser, UpdateCredentials, User};
use crate::store::{ChirpStore, RefreshTokenStore, Store, StoreError, UserStore};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<DbId, User>,
    /// Kept in insertion order so equal timestamps still list stably.
    chirps: Vec<Chirp>,
    refresh_tokens: HashMap<String, RefreshToken>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::Conflict("uq_users_email".into()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: input.email.clone(),
            hashed_password: input.hashed_password.clone(),
            is_chirpy_red: false,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn update_user_credentials(
        &self,
        id: DbId,
        input: &UpdateCredentials,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.id != id && u.email == input.email)
        {
            return Err(StoreError::Conflict("uq_users_email".into()));
        }
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        user.email = input.email.clone();
        user.hashed_password = input.hashed_password.clone();
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn upgrade_to_chirpy_red(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) => {
                user.is_chirpy_red = true;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all_users(&self) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let deleted = tables.users.len() as u64;
        tables.users.clear();
        tables.chirps.clear();
        tables.refresh_tokens.clear();
        Ok(deleted)
    }
}

#[async_trait]
impl ChirpStore for MemoryStore {
    async fn create_chirp(&self, input: &CreateChirp) -> Result<Chirp, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&input.user_id) {
            return Err(StoreError::MissingReference("chirps_user_id_fkey".into()));
        }
        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: input.body.clone(),
            user_id: input.user_id,
        };
        tables.chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn find_chirp(&self, id: DbId) -> Result<Option<Chirp>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn list_chirps(&self, filter: &ChirpFilter) -> Result<Vec<Chirp>, StoreError> {
        let tables = self.tables.read().await;
        let mut chirps: Vec<Chirp> = tables
            .chirps
            .iter()
            .filter(|c| filter.author_id.map_or(true, |author| c.user_id == author))
            .cloned()
            .collect();
        match filter.sort {
            SortDirection::Asc => chirps.sort_by_key(|c| c.created_at),
            SortDirection::Desc => {
                chirps.reverse();
                chirps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
        }
        Ok(chirps)
    }

    async fn delete_chirp(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.chirps.len();
        tables.chirps.retain(|c| c.id != id);
        Ok(tables.chirps.len() < before)
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn create_refresh_token(
        &self,
        input: &CreateRefreshToken,
    ) -> Result<RefreshToken, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&input.user_id) {
            return Err(StoreError::MissingReference(
                "refresh_tokens_user_id_fkey".into(),
            ));
        }
        if tables.refresh_tokens.contains_key(&input.token) {
            return Err(StoreError::Conflict("refresh_tokens_pkey".into()));
        }
        let now = Utc::now();
        let record = RefreshToken {
            token: input.token.clone(),
            user_id: input.user_id,
            created_at: now,
            updated_at: now,
            expires_at: input.expires_at,
            revoked_at: None,
        };
        tables
            .refresh_tokens
            .insert(record.token.clone(), record.clone());
        Ok(record)
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        Ok(self.tables.read().await.refresh_tokens.get(token).cloned())
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.refresh_tokens.get_mut(token) {
            Some(record) => {
                let now = Utc::now();
                record.revoked_at = Some(now);
                record.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

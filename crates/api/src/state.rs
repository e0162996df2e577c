use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chirpy_db::Store;

use crate::auth::service::AuthService;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Persistence for users, chirps, and refresh tokens.
    pub store: Arc<dyn Store>,
    /// Server configuration (platform, webhook key, fileserver root).
    pub config: Arc<ServerConfig>,
    /// Login, refresh, revoke, and the protected-route check.
    pub auth: Arc<AuthService>,
    /// Requests served under `/app` since start or the last reset.
    pub fileserver_hits: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: ServerConfig) -> Self {
        let auth = AuthService::new(
            Arc::clone(&store),
            config.jwt.clone(),
            Duration::from_secs(config.store_timeout_secs),
        );
        Self {
            store,
            config: Arc::new(config),
            auth: Arc::new(auth),
            fileserver_hits: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn record_fileserver_hit(&self) {
        self.fileserver_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fileserver_hits(&self) -> u64 {
        self.fileserver_hits.load(Ordering::Relaxed)
    }

    pub fn reset_fileserver_hits(&self) {
        self.fileserver_hits.store(0, Ordering::Relaxed);
    }
}

use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;
use crate::auth::refresh_token::DEFAULT_REFRESH_EXPIRY_DAYS;
use crate::auth::service::DEFAULT_STORE_TIMEOUT_SECS;

/// A required variable is absent or a variable failed to parse.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Deployment flavour. Only `dev` unlocks destructive admin endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Dev,
    Production,
}

impl Platform {
    fn parse(value: &str) -> Self {
        if value == "dev" {
            Platform::Dev
        } else {
            Platform::Production
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Postgres connection URL.
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Deadline for each store call made by the auth flows (default: `5`).
    pub store_timeout_secs: u64,
    /// Session token signing secret and token lifetimes.
    pub jwt: JwtConfig,
    /// Key the payment provider presents on webhooks. Empty rejects every call.
    pub polka_key: String,
    pub platform: Platform,
    /// Directory served under `/app`.
    pub fileserver_root: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                  |
    /// |-----------------------------|--------------------------|
    /// | `DATABASE_URL`              | **required**             |
    /// | `JWT_SECRET`                | **required**, non-empty  |
    /// | `HOST`                      | `0.0.0.0`                |
    /// | `PORT`                      | `8080`                   |
    /// | `CORS_ORIGINS`              | `http://localhost:8080`  |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                     |
    /// | `STORE_TIMEOUT_SECS`        | `5`                      |
    /// | `REFRESH_TOKEN_EXPIRY_DAYS` | `60`                     |
    /// | `POLKA_KEY`                 | empty                    |
    /// | `PLATFORM`                  | `production`             |
    /// | `FILESERVER_ROOT`           | `.`                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`ServerConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };
        let or_default = |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.into());

        let database_url = required("DATABASE_URL")?;
        let secret = required("JWT_SECRET")?;

        let port = parse_var("PORT", or_default("PORT", "8080"))?;
        let request_timeout_secs =
            parse_var("REQUEST_TIMEOUT_SECS", or_default("REQUEST_TIMEOUT_SECS", "30"))?;
        let store_timeout_secs = parse_var(
            "STORE_TIMEOUT_SECS",
            or_default("STORE_TIMEOUT_SECS", &DEFAULT_STORE_TIMEOUT_SECS.to_string()),
        )?;
        let refresh_token_expiry_days: i64 = parse_var(
            "REFRESH_TOKEN_EXPIRY_DAYS",
            or_default(
                "REFRESH_TOKEN_EXPIRY_DAYS",
                &DEFAULT_REFRESH_EXPIRY_DAYS.to_string(),
            ),
        )?;
        let expiry_fits = chrono::Duration::try_days(refresh_token_expiry_days)
            .and_then(|ttl| chrono::Utc::now().checked_add_signed(ttl))
            .is_some();
        if refresh_token_expiry_days <= 0 || !expiry_fits {
            return Err(ConfigError::Invalid {
                var: "REFRESH_TOKEN_EXPIRY_DAYS",
                value: refresh_token_expiry_days.to_string(),
            });
        }

        let cors_origins: Vec<String> = or_default("CORS_ORIGINS", "http://localhost:8080")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host: or_default("HOST", "0.0.0.0"),
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            store_timeout_secs,
            jwt: JwtConfig::new(secret, refresh_token_expiry_days),
            polka_key: lookup("POLKA_KEY").unwrap_or_default(),
            platform: Platform::parse(&or_default("PLATFORM", "production")),
            fileserver_root: PathBuf::from(or_default("FILESERVER_ROOT", ".")),
        })
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value })
}

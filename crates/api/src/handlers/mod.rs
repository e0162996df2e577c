//! Request handlers grouped by resource.
//!
//! Handlers talk to storage through `AppState::store` and to the auth flows
//! through `AppState::auth`, and map every failure via [`crate::error::AppError`].

pub mod admin;
pub mod auth;
pub mod chirps;
pub mod users;
pub mod webhooks;

//! Domain types and rules shared by the Chirpy store and HTTP layers.
//!
//! This crate has no internal dependencies so both `chirpy-db` and
//! `chirpy-api` can depend on it.

pub mod chirp;
pub mod error;
pub mod types;
pub mod user;

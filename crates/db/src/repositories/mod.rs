//! Query types, one per table. Each is a zero-sized namespace over `&PgPool`.

mod chirp_repo;
mod refresh_token_repo;
mod user_repo;

pub use chirp_repo::ChirpRepo;
pub use refresh_token_repo::RefreshTokenRepo;
pub use user_repo::UserRepo;

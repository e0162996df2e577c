//! Chirp entity model, DTOs, and listing options.

use chirpy_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A chirp row from the `chirps` table. Safe to serialize as-is.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Chirp {
    pub id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub body: String,
    pub user_id: DbId,
}

/// DTO for creating a chirp. `body` is stored exactly as given.
#[derive(Debug)]
pub struct CreateChirp {
    pub user_id: DbId,
    pub body: String,
}

/// Ordering of chirp listings by `created_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse the `sort` query parameter. Anything but `desc` sorts ascending.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Filter for listing chirps.
#[derive(Debug, Clone, Default)]
pub struct ChirpFilter {
    /// Restrict to chirps written by this user.
    pub author_id: Option<DbId>,
    pub sort: SortDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_direction_defaults_to_ascending() {
        assert_eq!(SortDirection::from_query(None), SortDirection::Asc);
        assert_eq!(SortDirection::from_query(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::from_query(Some("sideways")), SortDirection::Asc);
    }

    #[test]
    fn sort_direction_parses_desc() {
        assert_eq!(SortDirection::from_query(Some("desc")), SortDirection::Desc);
        assert_eq!(SortDirection::from_query(Some("DESC")), SortDirection::Desc);
    }
}

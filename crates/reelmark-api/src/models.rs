use serde::{Deserialize, Serialize};

// ── Movies ──────────────────────────────────────────────────────

/// A movie record as returned in the favorites list.
///
/// Only the fields the detail screen uses are kept; the rest of the server's
/// record is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl Movie {
    pub fn new(id: u64, title: impl Into<String>, poster_path: Option<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path,
        }
    }
}

/// Envelope of `GET /account/{user_id}/favorite/movies`.
///
/// `results` is optional here so that an absent key can be reported as a
/// missing field instead of a generic decode failure.
#[derive(Debug, Deserialize)]
pub(crate) struct FavoritesEnvelope {
    pub results: Option<Vec<Movie>>,
}

// ── Favorite toggle ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
}

/// Body of `POST /account/{id}/favorite`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRequest {
    pub media_type: MediaType,
    pub media_id: u64,
    pub favorite: bool,
}

impl FavoriteRequest {
    pub fn movie(media_id: u64, favorite: bool) -> Self {
        Self {
            media_type: MediaType::Movie,
            media_id,
            favorite,
        }
    }
}

/// Status envelope the API returns for write requests and most errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status_code: Option<i64>,
    #[serde(default)]
    pub status_message: Option<String>,
}

/// Status codes reported by the API for favorite writes.
pub mod status_code {
    /// New favorite created.
    pub const SUCCESS: i64 = 1;
    /// Existing record updated (already a favorite).
    pub const UPDATED: i64 = 12;
    /// Record deleted.
    pub const DELETED: i64 = 13;
}

/// How the server classified a favorite write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteOutcome {
    /// The movie is now a favorite.
    Added,
    /// The movie is no longer a favorite.
    Removed,
    /// Any other status code; the favorite state is not known to have changed.
    Unrecognized(i64),
}

impl FavoriteOutcome {
    pub fn from_status_code(code: i64) -> Self {
        match code {
            status_code::SUCCESS | status_code::UPDATED => Self::Added,
            status_code::DELETED => Self::Removed,
            other => Self::Unrecognized(other),
        }
    }
}

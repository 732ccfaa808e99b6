//! The service seam the detail screen talks to.
//!
//! `TmdbClient` is the production implementation; tests substitute fakes.

use std::future::Future;

use bytes::Bytes;

use crate::models::{FavoriteOutcome, Movie};

/// Favorite-related operations against a movie database account.
pub trait FavoriteService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// List the account's favorite movies (first page only).
    fn favorite_movies(&self) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send;

    /// Download the raw bytes of a poster image.
    fn poster(&self, poster_path: &str) -> impl Future<Output = Result<Bytes, Self::Error>> + Send;

    /// Mark or unmark a movie as a favorite.
    fn set_favorite(
        &self,
        movie_id: u64,
        favorite: bool,
    ) -> impl Future<Output = Result<FavoriteOutcome, Self::Error>> + Send;
}

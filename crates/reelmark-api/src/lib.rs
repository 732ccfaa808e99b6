//! Client for the movie database favorites API.
//!
//! Covers the three exchanges a movie detail screen needs: listing the
//! account's favorite movies, downloading a poster from the image host, and
//! marking or unmarking a movie as a favorite.

pub mod client;
pub mod error;
pub mod models;
pub mod session;
pub mod traits;
pub mod url_builder;

pub use client::{
    Endpoints, TmdbClient, DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL, DEFAULT_POSTER_SIZE,
};
pub use error::TmdbError;
pub use models::{FavoriteOutcome, FavoriteRequest, MediaType, Movie, StatusResponse};
pub use session::SessionContext;
pub use traits::FavoriteService;
pub use url_builder::UrlBuilder;

use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::TmdbError;
use crate::models::{FavoriteOutcome, FavoriteRequest, FavoritesEnvelope, Movie, StatusResponse};
use crate::session::SessionContext;
use crate::traits::FavoriteService;
use crate::url_builder::UrlBuilder;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";
pub const DEFAULT_POSTER_SIZE: &str = "w342";

const JSON: &str = "application/json";

/// Where the API and the image host live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base: Url,
    pub image_base: Url,
    pub poster_size: String,
}

impl Endpoints {
    pub fn parse(api_base: &str, image_base: &str, poster_size: &str) -> Result<Self, TmdbError> {
        Ok(Self {
            api_base: Url::parse(api_base)?,
            image_base: Url::parse(image_base)?,
            poster_size: poster_size.to_string(),
        })
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::parse(DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL, DEFAULT_POSTER_SIZE)
            .expect("built-in endpoint URLs are valid")
    }
}

/// Movie database v3 client scoped to one account session.
pub struct TmdbClient {
    http: Client,
    endpoints: Endpoints,
    session: SessionContext,
}

impl TmdbClient {
    pub fn new(http: Client, endpoints: Endpoints, session: SessionContext) -> Self {
        Self {
            http,
            endpoints,
            session,
        }
    }

    /// Authenticated API URL: base + segments + `api_key` + `session_id`.
    fn api_url(&self, segments: &[&str]) -> Result<Url, TmdbError> {
        let builder = segments
            .iter()
            .fold(UrlBuilder::new(&self.endpoints.api_base), |b, s| b.segment(s))
            .query("api_key", self.session.api_key())
            .query("session_id", self.session.session_id());
        Ok(builder.build()?)
    }

    /// `GET /account/{user_id}/favorite/movies`
    pub fn favorite_movies_url(&self) -> Result<Url, TmdbError> {
        self.api_url(&["account", self.session.user_id(), "favorite", "movies"])
    }

    /// `POST /account/{movie_id}/favorite`
    pub fn favorite_url(&self, movie_id: u64) -> Result<Url, TmdbError> {
        self.api_url(&["account", &movie_id.to_string(), "favorite"])
    }

    /// `{image_base}/{poster_size}/{poster_path}`, unauthenticated.
    pub fn poster_url(&self, poster_path: &str) -> Result<Url, TmdbError> {
        Ok(UrlBuilder::new(&self.endpoints.image_base)
            .segment(&self.endpoints.poster_size)
            .path(poster_path)
            .build()?)
    }

    /// Check the HTTP response for errors and return the body text on failure.
    async fn check_response(
        operation: &'static str,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, TmdbError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation, status, "TMDB API error");
            Err(TmdbError::Api {
                status,
                message: body,
            })
        }
    }

    async fn read_body(resp: reqwest::Response) -> Result<Bytes, TmdbError> {
        let body = resp.bytes().await?;
        if body.is_empty() {
            return Err(TmdbError::EmptyBody);
        }
        Ok(body)
    }
}

/// Decode a JSON body, reporting the path of the first offending value.
pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, TmdbError> {
    let mut de = serde_json::Deserializer::from_slice(body);
    let value = serde_path_to_error::deserialize(&mut de).map_err(|e| TmdbError::Json {
        path: e.path().to_string(),
        source: e.into_inner(),
    })?;
    de.end().map_err(|e| TmdbError::Json {
        path: ".".into(),
        source: e,
    })?;
    Ok(value)
}

impl FavoriteService for TmdbClient {
    type Error = TmdbError;

    async fn favorite_movies(&self) -> Result<Vec<Movie>, TmdbError> {
        let url = self.favorite_movies_url()?;
        tracing::debug!(operation = "favorite_movies", "TMDB request");

        let resp = self.http.get(url).header(ACCEPT, JSON).send().await?;
        let resp = Self::check_response("favorite_movies", resp).await?;
        let body = Self::read_body(resp).await?;

        let envelope: FavoritesEnvelope = decode_json(&body)?;
        let movies = envelope.results.ok_or(TmdbError::MissingField("results"))?;
        tracing::debug!(
            operation = "favorite_movies",
            count = movies.len(),
            "TMDB response received"
        );
        Ok(movies)
    }

    async fn poster(&self, poster_path: &str) -> Result<Bytes, TmdbError> {
        let url = self.poster_url(poster_path)?;
        tracing::debug!(operation = "poster", %url, "Image request");

        let resp = self.http.get(url).send().await?;
        let resp = Self::check_response("poster", resp).await?;
        Self::read_body(resp).await
    }

    async fn set_favorite(
        &self,
        movie_id: u64,
        favorite: bool,
    ) -> Result<FavoriteOutcome, TmdbError> {
        let url = self.favorite_url(movie_id)?;
        tracing::debug!(operation = "set_favorite", movie_id, favorite, "TMDB request");

        let resp = self
            .http
            .post(url)
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON)
            .json(&FavoriteRequest::movie(movie_id, favorite))
            .send()
            .await?;
        let resp = Self::check_response("set_favorite", resp).await?;
        let body = Self::read_body(resp).await?;

        let status: StatusResponse = decode_json(&body)?;
        let code = status.status_code.ok_or(TmdbError::MissingField("status_code"))?;
        let outcome = FavoriteOutcome::from_status_code(code);
        tracing::debug!(
            operation = "set_favorite",
            movie_id,
            status_code = code,
            message = status.status_message.as_deref().unwrap_or(""),
            ?outcome,
            "TMDB response received"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TmdbClient {
        TmdbClient::new(
            Client::new(),
            Endpoints::default(),
            SessionContext::new("key", "sess", "4242"),
        )
    }

    #[test]
    fn test_favorite_movies_url() {
        let url = client().favorite_movies_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/account/4242/favorite/movies?api_key=key&session_id=sess"
        );
    }

    #[test]
    fn test_favorite_url_uses_movie_id() {
        let url = client().favorite_url(550).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/account/550/favorite?api_key=key&session_id=sess"
        );
    }

    #[test]
    fn test_poster_url_is_unauthenticated() {
        let url = client().poster_url("/abc.jpg").unwrap();
        assert_eq!(url.as_str(), "https://image.tmdb.org/t/p/w342/abc.jpg");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_custom_poster_size() {
        let endpoints = Endpoints::parse(DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL, "w500").unwrap();
        let client = TmdbClient::new(Client::new(), endpoints, SessionContext::new("k", "s", "u"));
        let url = client.poster_url("abc.jpg").unwrap();
        assert_eq!(url.path(), "/t/p/w500/abc.jpg");
    }

    #[test]
    fn test_endpoints_reject_garbage() {
        let err = Endpoints::parse("not a url", DEFAULT_IMAGE_BASE_URL, "w342").unwrap_err();
        assert!(matches!(err, TmdbError::Url(_)));
    }

    #[test]
    fn test_decode_json_reports_path() {
        let err = decode_json::<FavoritesEnvelope>(br#"{"results":[{"id":"x","title":"t"}]}"#)
            .unwrap_err();
        match err {
            TmdbError::Json { path, .. } => assert_eq!(path, "results[0].id"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_json_rejects_trailing_garbage() {
        let err = decode_json::<StatusResponse>(br#"{"status_code":1} trailing"#).unwrap_err();
        assert!(matches!(err, TmdbError::Json { .. }));
    }

    #[test]
    fn test_decode_json_rejects_non_object() {
        let err = decode_json::<FavoritesEnvelope>(b"[1,2,3]").unwrap_err();
        assert!(matches!(err, TmdbError::Json { .. }));
    }
}

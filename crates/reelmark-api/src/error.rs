use thiserror::Error;

/// Errors from the movie database API client.
#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("response body was empty")]
    EmptyBody,

    #[error("JSON error at `{path}`: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl TmdbError {
    /// HTTP status for [`TmdbError::Api`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

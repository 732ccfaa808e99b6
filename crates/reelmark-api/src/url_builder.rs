use std::collections::BTreeMap;

use url::{ParseError, Url};

/// Builds request URLs from a base, path segments and query parameters.
///
/// Segments are percent-encoded individually, so a poster path or an account
/// id can never break out of its position in the path. Query parameters are
/// kept sorted, which keeps generated URLs stable for logging and tests.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: Url,
    segments: Vec<String>,
    query: BTreeMap<String, String>,
}

impl UrlBuilder {
    pub fn new(base: &Url) -> Self {
        Self {
            base: base.clone(),
            segments: Vec::new(),
            query: BTreeMap::new(),
        }
    }

    /// Append a single path segment. Slashes inside it are encoded.
    pub fn segment(mut self, segment: impl ToString) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    /// Append a relative path, splitting it on `/` and dropping empty pieces.
    ///
    /// `"/abc.jpg"` and `"abc.jpg"` produce the same URL.
    pub fn path(mut self, path: &str) -> Self {
        self.segments.extend(
            path.split('/')
                .filter(|piece| !piece.is_empty())
                .map(str::to_string),
        );
        self
    }

    /// Set a query parameter, replacing any earlier value for the same key.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn build(&self) -> Result<Url, ParseError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ParseError::RelativeUrlWithCannotBeABaseBase)?;
            path.pop_if_empty();
            for segment in &self.segments {
                path.push(segment);
            }
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_segments_follow_base_path() {
        let url = UrlBuilder::new(&base("https://api.themoviedb.org/3/"))
            .segment("account")
            .segment(42)
            .segment("favorite")
            .segment("movies")
            .build()
            .unwrap();
        assert_eq!(url.as_str(), "https://api.themoviedb.org/3/account/42/favorite/movies");
    }

    #[test]
    fn test_base_without_trailing_slash() {
        let url = UrlBuilder::new(&base("http://127.0.0.1:8080"))
            .segment("account")
            .build()
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/account");
    }

    #[test]
    fn test_path_strips_leading_slash() {
        let root = base("https://image.tmdb.org/t/p/");
        let a = UrlBuilder::new(&root).segment("w342").path("/abc.jpg").build().unwrap();
        let b = UrlBuilder::new(&root).segment("w342").path("abc.jpg").build().unwrap();
        assert_eq!(a.as_str(), "https://image.tmdb.org/t/p/w342/abc.jpg");
        assert_eq!(a, b);
    }

    #[test]
    fn test_segment_is_encoded() {
        let url = UrlBuilder::new(&base("http://localhost/"))
            .segment("a/b c")
            .build()
            .unwrap();
        assert_eq!(url.path(), "/a%2Fb%20c");
    }

    #[test]
    fn test_query_is_sorted_and_encoded() {
        let url = UrlBuilder::new(&base("http://localhost/"))
            .query("session_id", "s&1")
            .query("api_key", "key")
            .build()
            .unwrap();
        assert_eq!(url.query(), Some("api_key=key&session_id=s%261"));
    }

    #[test]
    fn test_cannot_be_a_base() {
        let err = UrlBuilder::new(&base("mailto:someone@example.com"))
            .segment("x")
            .build()
            .unwrap_err();
        assert_eq!(err, ParseError::RelativeUrlWithCannotBeABaseBase);
    }
}

//! In-process mock of the movie database endpoints used by the detail screen.
//!
//! Serves the favorites list, the favorite toggle and the image host from one
//! axum router, keeps favorites in memory, counts requests per endpoint and
//! can be switched into failure modes to exercise client error paths.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock, task::JoinHandle};

pub const API_KEY: &str = "mock-api-key";
pub const SESSION_ID: &str = "mock-session-id";
pub const USER_ID: &str = "4242";

/// Ways the mock can misbehave. Applies to every endpoint it makes sense for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// 200 with a truncated JSON document (or non-image bytes for posters).
    MalformedJson,
    /// 500 with the API's error envelope.
    ServerError,
    /// 200 with no body at all.
    EmptyBody,
    /// 200 with valid JSON lacking `results` / `status_code`.
    MissingField,
    /// Favorite writes answer with this `status_code` instead of the real one.
    StatusCode(i64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockMovie {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub vote_average: f64,
}

impl MockMovie {
    pub fn new(id: u64, title: &str, poster_path: Option<&str>) -> Self {
        Self {
            id,
            title: title.to_string(),
            poster_path: poster_path.map(str::to_string),
            vote_average: 7.5,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FavoriteBody {
    media_type: String,
    media_id: u64,
    favorite: bool,
}

#[derive(Default)]
struct Inner {
    catalog: BTreeMap<u64, MockMovie>,
    favorites: BTreeSet<u64>,
    posters: HashMap<String, Vec<u8>>,
    failure: Option<FailureMode>,
    last_favorite_body: Option<Value>,
    last_favorite_account: Option<String>,
}

#[derive(Default)]
struct Hits {
    favorites: AtomicUsize,
    posters: AtomicUsize,
    toggles: AtomicUsize,
}

/// Shared handle to the mock's state. Cheap to clone.
#[derive(Clone, Default)]
pub struct MockTmdb {
    inner: Arc<RwLock<Inner>>,
    hits: Arc<Hits>,
}

impl MockTmdb {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_movie(&self, movie: MockMovie) {
        self.inner.write().await.catalog.insert(movie.id, movie);
    }

    pub async fn add_favorite(&self, movie_id: u64) {
        self.inner.write().await.favorites.insert(movie_id);
    }

    pub async fn is_favorite(&self, movie_id: u64) -> bool {
        self.inner.read().await.favorites.contains(&movie_id)
    }

    /// Serve `bytes` for any `/t/p/{size}/{file}` request.
    pub async fn add_poster(&self, file: &str, bytes: Vec<u8>) {
        self.inner
            .write()
            .await
            .posters
            .insert(file.trim_start_matches('/').to_string(), bytes);
    }

    pub async fn set_failure(&self, mode: Option<FailureMode>) {
        self.inner.write().await.failure = mode;
    }

    /// JSON body of the most recent favorite write, as received.
    pub async fn last_favorite_body(&self) -> Option<Value> {
        self.inner.read().await.last_favorite_body.clone()
    }

    /// Path id of the most recent favorite write.
    pub async fn last_favorite_account(&self) -> Option<String> {
        self.inner.read().await.last_favorite_account.clone()
    }

    pub fn favorites_requests(&self) -> usize {
        self.hits.favorites.load(Ordering::SeqCst)
    }

    pub fn poster_requests(&self) -> usize {
        self.hits.posters.load(Ordering::SeqCst)
    }

    pub fn toggle_requests(&self) -> usize {
        self.hits.toggles.load(Ordering::SeqCst)
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/3/account/{account}/favorite/movies", get(favorite_movies))
            .route("/3/account/{account}/favorite", post(set_favorite))
            .route("/t/p/{size}/{file}", get(poster))
            .with_state(self.clone())
    }

    /// Bind to an ephemeral port on localhost and serve in the background.
    pub async fn spawn(self) -> std::io::Result<MockServer> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Self::serve(self, listener).await
    }

    pub async fn serve(self, listener: TcpListener) -> std::io::Result<MockServer> {
        let addr = listener.local_addr()?;
        let app = self.router();
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "mock server stopped");
            }
        });
        Ok(MockServer {
            addr,
            mock: self,
            task,
        })
    }
}

/// A running mock server. Stops when dropped.
pub struct MockServer {
    pub addr: SocketAddr,
    pub mock: MockTmdb,
    task: JoinHandle<()>,
}

impl MockServer {
    pub fn api_base(&self) -> String {
        format!("http://{}/3/", self.addr)
    }

    pub fn image_base(&self) -> String {
        format!("http://{}/t/p/", self.addr)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A solid-color PNG, for serving as a poster.
pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encoding an in-memory PNG cannot fail");
    out.into_inner()
}

// ── Handlers ────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Endpoint {
    Favorites,
    Toggle,
    Poster,
}

fn status_json(status: StatusCode, code: i64, message: &str) -> Response {
    json_response(
        status,
        json!({ "status_code": code, "status_message": message, "success": status.is_success() })
            .to_string(),
    )
}

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json;charset=utf-8")], body).into_response()
}

fn authorize(query: &HashMap<String, String>) -> Result<(), Response> {
    if query.get("api_key").map(String::as_str) != Some(API_KEY) {
        return Err(status_json(
            StatusCode::UNAUTHORIZED,
            7,
            "Invalid API key: You must be granted a valid key.",
        ));
    }
    if query.get("session_id").map(String::as_str) != Some(SESSION_ID) {
        return Err(status_json(
            StatusCode::UNAUTHORIZED,
            3,
            "Authentication failed: You do not have permissions to access the service.",
        ));
    }
    Ok(())
}

fn failure_response(mode: Option<FailureMode>, endpoint: Endpoint) -> Option<Response> {
    match (mode?, endpoint) {
        (FailureMode::MalformedJson, Endpoint::Poster) => Some(
            (StatusCode::OK, [(header::CONTENT_TYPE, "image/png")], "not an image").into_response(),
        ),
        (FailureMode::MalformedJson, _) => Some(json_response(
            StatusCode::OK,
            r#"{"page":1,"results":[{"id":550,"ti"#.to_string(),
        )),
        (FailureMode::ServerError, _) => Some(status_json(
            StatusCode::INTERNAL_SERVER_ERROR,
            11,
            "Internal error: Something went wrong, contact TMDb.",
        )),
        (FailureMode::EmptyBody, _) => Some(StatusCode::OK.into_response()),
        (FailureMode::MissingField, Endpoint::Favorites) => Some(json_response(
            StatusCode::OK,
            json!({ "page": 1, "total_pages": 1, "total_results": 0 }).to_string(),
        )),
        (FailureMode::MissingField, Endpoint::Toggle) => Some(json_response(
            StatusCode::OK,
            json!({ "status_message": "Success." }).to_string(),
        )),
        (FailureMode::StatusCode(code), Endpoint::Toggle) => {
            Some(status_json(StatusCode::OK, code, "Mocked status."))
        }
        _ => None,
    }
}

async fn favorite_movies(
    State(mock): State<MockTmdb>,
    Path(account): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    mock.hits.favorites.fetch_add(1, Ordering::SeqCst);
    if let Err(resp) = authorize(&query) {
        return resp;
    }
    if account != USER_ID {
        return status_json(
            StatusCode::NOT_FOUND,
            34,
            "The resource you requested could not be found.",
        );
    }

    let inner = mock.inner.read().await;
    if let Some(resp) = failure_response(inner.failure, Endpoint::Favorites) {
        return resp;
    }

    let results: Vec<MockMovie> = inner
        .favorites
        .iter()
        .map(|id| {
            inner
                .catalog
                .get(id)
                .cloned()
                .unwrap_or_else(|| MockMovie::new(*id, &format!("Movie {id}"), None))
        })
        .collect();
    let total = results.len();
    json_response(
        StatusCode::OK,
        json!({
            "page": 1,
            "results": results,
            "total_pages": 1,
            "total_results": total,
        })
        .to_string(),
    )
}

async fn set_favorite(
    State(mock): State<MockTmdb>,
    Path(account): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    mock.hits.toggles.fetch_add(1, Ordering::SeqCst);
    if let Err(resp) = authorize(&query) {
        return resp;
    }
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if !is_json {
        return status_json(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            5,
            "Invalid parameters: Your request parameters are incorrect.",
        );
    }

    let mut inner = mock.inner.write().await;
    inner.last_favorite_account = Some(account);
    inner.last_favorite_body = serde_json::from_str(&body).ok();

    if let Some(resp) = failure_response(inner.failure, Endpoint::Toggle) {
        return resp;
    }

    let req: FavoriteBody = match serde_json::from_str(&body) {
        Ok(req) => req,
        Err(_) => {
            return status_json(
                StatusCode::BAD_REQUEST,
                5,
                "Invalid parameters: Your request parameters are incorrect.",
            )
        }
    };
    if req.media_type != "movie" {
        return status_json(
            StatusCode::BAD_REQUEST,
            5,
            "Invalid parameters: Your request parameters are incorrect.",
        );
    }

    if req.favorite {
        if inner.favorites.insert(req.media_id) {
            status_json(StatusCode::CREATED, 1, "Success.")
        } else {
            status_json(
                StatusCode::OK,
                12,
                "The item/record was updated successfully.",
            )
        }
    } else {
        inner.favorites.remove(&req.media_id);
        status_json(
            StatusCode::OK,
            13,
            "The item/record was deleted successfully.",
        )
    }
}

async fn poster(
    State(mock): State<MockTmdb>,
    Path((_size, file)): Path<(String, String)>,
) -> Response {
    mock.hits.posters.fetch_add(1, Ordering::SeqCst);

    let inner = mock.inner.read().await;
    if let Some(resp) = failure_response(inner.failure, Endpoint::Poster) {
        return resp;
    }
    match inner.posters.get(&file) {
        Some(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "image/png")],
            bytes.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

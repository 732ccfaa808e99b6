//! Client behaviour over real HTTP against the in-process mock.

use reelmark_api::{
    Endpoints, FavoriteOutcome, FavoriteService, Movie, SessionContext, TmdbClient, TmdbError,
};
use reelmark_mock::{
    sample_png, FailureMode, MockMovie, MockServer, MockTmdb, API_KEY, SESSION_ID, USER_ID,
};

async fn start() -> (MockServer, TmdbClient) {
    let server = MockTmdb::new().spawn().await.unwrap();
    let client = client_for(&server, SessionContext::new(API_KEY, SESSION_ID, USER_ID));
    (server, client)
}

fn client_for(server: &MockServer, session: SessionContext) -> TmdbClient {
    let endpoints = Endpoints::parse(&server.api_base(), &server.image_base(), "w342").unwrap();
    TmdbClient::new(reqwest::Client::new(), endpoints, session)
}

#[tokio::test]
async fn favorite_movies_lists_the_account_favorites() {
    let (server, client) = start().await;
    server
        .mock
        .add_movie(MockMovie::new(550, "Fight Club", Some("/abc.jpg")))
        .await;
    server.mock.add_favorite(550).await;
    server.mock.add_favorite(603).await;

    let movies = client.favorite_movies().await.unwrap();
    assert_eq!(
        movies,
        vec![
            Movie::new(550, "Fight Club", Some("/abc.jpg".into())),
            Movie::new(603, "Movie 603", None),
        ]
    );
    assert_eq!(server.mock.favorites_requests(), 1);
}

#[tokio::test]
async fn favorite_movies_empty_list() {
    let (_server, client) = start().await;
    assert!(client.favorite_movies().await.unwrap().is_empty());
}

#[tokio::test]
async fn favorite_movies_rejects_bad_credentials() {
    let server = MockTmdb::new().spawn().await.unwrap();
    let client = client_for(&server, SessionContext::new("wrong", SESSION_ID, USER_ID));

    let err = client.favorite_movies().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn favorite_movies_failure_modes() {
    let (server, client) = start().await;

    server.mock.set_failure(Some(FailureMode::MalformedJson)).await;
    assert!(matches!(
        client.favorite_movies().await,
        Err(TmdbError::Json { .. })
    ));

    server.mock.set_failure(Some(FailureMode::ServerError)).await;
    assert!(matches!(
        client.favorite_movies().await,
        Err(TmdbError::Api { status: 500, .. })
    ));

    server.mock.set_failure(Some(FailureMode::EmptyBody)).await;
    assert!(matches!(
        client.favorite_movies().await,
        Err(TmdbError::EmptyBody)
    ));

    server.mock.set_failure(Some(FailureMode::MissingField)).await;
    assert!(matches!(
        client.favorite_movies().await,
        Err(TmdbError::MissingField("results"))
    ));
}

#[tokio::test]
async fn transport_error_when_server_is_gone() {
    let (server, client) = start().await;
    drop(server);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let err = client.favorite_movies().await.unwrap_err();
    assert!(matches!(err, TmdbError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn set_favorite_sends_movie_body() {
    let (server, client) = start().await;

    let outcome = client.set_favorite(550, true).await.unwrap();
    assert_eq!(outcome, FavoriteOutcome::Added);
    assert!(server.mock.is_favorite(550).await);

    let body = server.mock.last_favorite_body().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({"media_type": "movie", "media_id": 550, "favorite": true})
    );
    assert_eq!(server.mock.last_favorite_account().await.as_deref(), Some("550"));
}

#[tokio::test]
async fn set_favorite_add_twice_then_remove() {
    let (server, client) = start().await;

    assert_eq!(client.set_favorite(550, true).await.unwrap(), FavoriteOutcome::Added);
    // Second add reports "updated" (12), still an add.
    assert_eq!(client.set_favorite(550, true).await.unwrap(), FavoriteOutcome::Added);
    assert_eq!(client.set_favorite(550, false).await.unwrap(), FavoriteOutcome::Removed);
    assert!(!server.mock.is_favorite(550).await);
    assert_eq!(server.mock.toggle_requests(), 3);
}

#[tokio::test]
async fn set_favorite_unrecognized_status() {
    let (server, client) = start().await;
    server.mock.set_failure(Some(FailureMode::StatusCode(34))).await;

    let outcome = client.set_favorite(550, true).await.unwrap();
    assert_eq!(outcome, FavoriteOutcome::Unrecognized(34));
}

#[tokio::test]
async fn set_favorite_missing_status_code() {
    let (server, client) = start().await;
    server.mock.set_failure(Some(FailureMode::MissingField)).await;

    let err = client.set_favorite(550, false).await.unwrap_err();
    assert!(matches!(err, TmdbError::MissingField("status_code")));
}

#[tokio::test]
async fn poster_downloads_bytes() {
    let (server, client) = start().await;
    let png = sample_png(4, 6);
    server.mock.add_poster("abc.jpg", png.clone()).await;

    let bytes = client.poster("/abc.jpg").await.unwrap();
    assert_eq!(bytes.as_ref(), png.as_slice());
    assert_eq!(server.mock.poster_requests(), 1);
}

#[tokio::test]
async fn poster_not_found() {
    let (_server, client) = start().await;
    let err = client.poster("/missing.jpg").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn poster_does_not_send_credentials() {
    let (server, client) = start().await;
    let url = client.poster_url("/abc.jpg").unwrap();
    assert!(url.query().is_none());
    assert!(url.as_str().starts_with(&server.image_base()));
}

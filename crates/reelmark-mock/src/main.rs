use reelmark_mock::{sample_png, MockMovie, MockTmdb, API_KEY, SESSION_ID, USER_ID};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("reelmark_mock=debug")
        .init();

    let addr = std::env::var("REELMARK_MOCK_ADDR").unwrap_or_else(|_| "127.0.0.1:8787".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let mock = MockTmdb::new();
    mock.add_movie(MockMovie::new(550, "Fight Club", Some("/abc.jpg")))
        .await;
    mock.add_movie(MockMovie::new(603, "The Matrix", Some("/matrix.jpg")))
        .await;
    mock.add_favorite(550).await;
    mock.add_poster("abc.jpg", sample_png(342, 513)).await;
    mock.add_poster("matrix.jpg", sample_png(342, 513)).await;

    let server = mock.serve(listener).await?;
    println!("api base:   {}", server.api_base());
    println!("image base: {}", server.image_base());
    println!("api_key={API_KEY} session_id={SESSION_ID} user_id={USER_ID}");

    tokio::signal::ctrl_c().await?;
    Ok(())
}

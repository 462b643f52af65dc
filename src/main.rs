// mflix API Server - movie catalog and comments over a document store

use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use mflix_api::{app_state::AppState, config::Config, movie_interface::create_movie_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize application state (connects to the document store)
    let app_state = AppState::new(config).await?;

    // Build main application router
    let movie_router = create_movie_router(app_state.movie_interface.clone());
    let app = Router::new().merge(movie_router).layer(CorsLayer::permissive());

    // Start server
    let addr: SocketAddr = app_state.config.server_address().parse()?;
    println!("🎬 mflix API Server starting on http://{}", addr);
    println!("📋 API Documentation:");
    println!("  GET  /getMoviesByTitle?title=<string>  - Search movies by title substring");
    println!("  GET  /details?movieId=<id>             - Get movie details");
    println!("  GET  /comments?movieId=<id>            - List comments for a movie");
    println!("  POST /addComment                       - Add a comment");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

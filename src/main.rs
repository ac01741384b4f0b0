use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use guessbot::{
    roster::{JikanSource, Roster, RosterConfig},
    server::{self, ServerConfig},
    state::AppState,
    types::GameConfig,
};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guessbot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting guessbot...");

    let game_config = GameConfig::from_env();
    let roster_config = RosterConfig::from_env();
    let server_config = ServerConfig::from_env();

    tracing::info!("Round time limit: {:?}", game_config.time_limit);

    let roster = Roster::new();
    let state = Arc::new(AppState::new(game_config, roster.clone()));

    // Load characters in the background; start requests get
    // START_UNAVAILABLE until something is loaded
    match JikanSource::from_config(&roster_config) {
        Ok(source) => {
            tokio::spawn(async move {
                if let Err(e) = roster.load_from(&source).await {
                    tracing::error!("Roster load failed: {}", e);
                }
            });
        }
        Err(e) => {
            tracing::error!(
                "Failed to build roster client: {}. No characters will be available.",
                e
            );
        }
    }

    let app = server::router(state);

    tracing::info!("Listening on http://{}", server_config.bind_addr);

    let listener = tokio::net::TcpListener::bind(server_config.bind_addr)
        .await
        .unwrap();
    axum::serve(listener, app).await.unwrap();
}

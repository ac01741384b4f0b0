use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{api, state::AppState, ws};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl ServerConfig {
    /// Load server config from environment variables
    /// BIND_ADDR must be a socket address like 127.0.0.1:8080
    pub fn from_env() -> Self {
        match std::env::var("BIND_ADDR") {
            Ok(raw) => match raw.trim().parse() {
                Ok(bind_addr) => Self { bind_addr },
                Err(e) => {
                    tracing::warn!(
                        "Invalid BIND_ADDR '{}' ({}), using {}",
                        raw,
                        e,
                        DEFAULT_BIND_ADDR
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

/// All routes of the game server
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/api/scores", get(api::list_scores))
        .route("/api/scores/{responder_id}", get(api::get_score))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

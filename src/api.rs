//! HTTP API endpoints for reading the score ledger.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::state::{AppState, LeaderboardEntry};
use crate::types::ResponderId;

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    pub responder_id: ResponderId,
    pub score: u32,
}

/// All responders with at least one win, best first.
///
/// GET /api/scores
pub async fn list_scores(State(state): State<Arc<AppState>>) -> Json<Vec<LeaderboardEntry>> {
    Json(state.get_leaderboard().await)
}

/// One responder's score (0 if they never won).
///
/// GET /api/scores/{responder_id}
pub async fn get_score(
    State(state): State<Arc<AppState>>,
    Path(responder_id): Path<ResponderId>,
) -> Json<ScoreResponse> {
    let score = state.get_score(&responder_id).await;
    Json(ScoreResponse {
        responder_id,
        score,
    })
}

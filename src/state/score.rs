use super::AppState;
use crate::types::ResponderId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cumulative correct answers per responder, kept for the process lifetime
#[derive(Debug, Clone, Default)]
pub struct ScoreLedger {
    wins: HashMap<ResponderId, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub responder_id: ResponderId,
    pub score: u32,
}

impl ScoreLedger {
    /// Record one win and return the responder's new total
    pub fn add_win(&mut self, responder_id: &str) -> u32 {
        let total = self.wins.entry(responder_id.to_string()).or_insert(0);
        *total += 1;
        *total
    }

    /// Wins so far (0 for someone who never won)
    pub fn get_score(&self, responder_id: &str) -> u32 {
        self.wins.get(responder_id).copied().unwrap_or(0)
    }

    /// Sum of all recorded wins
    pub fn total_wins(&self) -> u32 {
        self.wins.values().sum()
    }

    /// All responders sorted by score descending, ties by id
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .wins
            .iter()
            .map(|(responder_id, score)| LeaderboardEntry {
                responder_id: responder_id.clone(),
                score: *score,
            })
            .collect();

        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.responder_id.cmp(&b.responder_id))
        });
        entries
    }
}

impl AppState {
    pub async fn get_score(&self, responder_id: &str) -> u32 {
        self.scores.read().await.get_score(responder_id)
    }

    pub async fn get_leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.scores.read().await.leaderboard()
    }
}

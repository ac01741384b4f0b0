mod score;
mod session;

pub use score::{LeaderboardEntry, ScoreLedger};
pub use session::{GuessOutcome, StartOutcome};

use crate::protocol::ServerMessage;
use crate::roster::Roster;
use crate::types::*;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Shared application state
///
/// Every session transition checks and mutates `session` under a single
/// write guard, so a win and a timeout can never both close the same round.
#[derive(Clone)]
pub struct AppState {
    pub config: GameConfig,
    pub roster: Roster,
    /// The single round slot; `None` means no game is running
    pub session: Arc<RwLock<Option<GameSession>>>,
    pub scores: Arc<RwLock<ScoreLedger>>,
    /// Broadcast channel for events every connected client should see
    pub broadcast: broadcast::Sender<ServerMessage>,
}

impl AppState {
    pub fn new(config: GameConfig, roster: Roster) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self {
            config,
            roster,
            session: Arc::new(RwLock::new(None)),
            scores: Arc::new(RwLock::new(ScoreLedger::default())),
            broadcast: tx,
        }
    }

    /// Send an event to all connected clients
    pub fn broadcast_to_all(&self, msg: ServerMessage) {
        // Ignore send errors (no receivers connected is fine)
        let _ = self.broadcast.send(msg);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(GameConfig::default(), Roster::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_state_is_idle() {
        let state = AppState::default();

        assert!(state.session.read().await.is_none());
        assert!(state.current_round().await.is_none());
        assert_eq!(state.get_score("anyone").await, 0);
        assert_eq!(state.config.time_limit, DEFAULT_TIME_LIMIT);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_subscribers() {
        let state = AppState::default();
        let mut rx = state.broadcast.subscribe();

        state.broadcast_to_all(ServerMessage::StartUnavailable);
        assert_eq!(rx.recv().await.unwrap(), ServerMessage::StartUnavailable);
    }

    #[test]
    fn test_broadcast_without_subscribers_is_fine() {
        let state = AppState::default();
        state.broadcast_to_all(ServerMessage::StartUnavailable);
    }
}

//! Round lifecycle: start, guess, timeout
//!
//! `NoGame -> Open` on a start request, then `Open -> Closed -> NoGame` through
//! whichever of a correct guess or the deadline timer gets the slot first.
//! The loser of that race finds the slot empty (or holding a newer round)
//! and does nothing.

use super::AppState;
use crate::matcher::is_correct;
use crate::protocol::ServerMessage;
use crate::types::*;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    /// A new round is open
    Started(RoundInfo),
    /// A round is already running; nothing changed
    AlreadyOpen,
    /// The roster has no entries to pick from
    Unavailable,
}

#[derive(Debug, Clone)]
pub enum GuessOutcome {
    /// The guess won the round (the session returned is already closed)
    Correct { session: GameSession, score: u32 },
    Wrong,
    /// No open round to guess at
    NoRound,
}

impl AppState {
    /// Public info about the open round, if any
    pub async fn current_round(&self) -> Option<RoundInfo> {
        self.session
            .read()
            .await
            .as_ref()
            .filter(|s| s.is_open())
            .map(RoundInfo::from)
    }

    /// Open a new round with a random roster entry and arm its timer
    pub async fn start_session(self: &Arc<Self>) -> StartOutcome {
        let mut slot = self.session.write().await;

        if slot.as_ref().is_some_and(|s| s.is_open()) {
            tracing::debug!("Start requested while a round is open, ignoring");
            return StartOutcome::AlreadyOpen;
        }

        let Some(entry) = self.roster.pick_random().await else {
            tracing::info!("Start requested but the roster is empty");
            return StartOutcome::Unavailable;
        };

        let started_at = Utc::now();
        let deadline_at = TimeDelta::from_std(self.config.time_limit)
            .ok()
            .and_then(|limit| started_at.checked_add_signed(limit))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let session = GameSession {
            id: ulid::Ulid::new().to_string(),
            entry,
            started_at,
            deadline_at,
            status: SessionStatus::Open,
        };
        let round = RoundInfo::from(&session);

        tracing::info!(
            "Round {} started: {} ({})",
            session.id,
            session.entry.display_name,
            session.entry.localized_name
        );

        self.broadcast_to_all(ServerMessage::RoundStarted {
            session_id: round.session_id.clone(),
            image: round.image.clone(),
            time_limit_secs: self.config.time_limit.as_secs(),
            deadline: round.deadline.clone(),
        });

        self.arm_timeout(session.id.clone());
        *slot = Some(session);

        StartOutcome::Started(round)
    }

    /// Spawn the fire-once deadline timer for a round
    fn arm_timeout(self: &Arc<Self>, session_id: SessionId) {
        let state = Arc::clone(self);
        let limit = self.config.time_limit;

        tokio::spawn(async move {
            tokio::time::sleep(limit).await;
            state.expire_session(&session_id).await;
        });
    }

    /// Check a chat message against the open round
    pub async fn submit_guess(&self, responder_id: &str, text: &str) -> GuessOutcome {
        let mut slot = self.session.write().await;

        let matched = match slot.as_ref() {
            Some(session) if session.is_open() => {
                is_correct(text, &session.entry.accepted_strings)
            }
            _ => return GuessOutcome::NoRound,
        };

        if !matched {
            return GuessOutcome::Wrong;
        }

        let Some(mut session) = slot.take() else {
            return GuessOutcome::NoRound;
        };
        session.status = SessionStatus::Closed;

        let score = self.scores.write().await.add_win(responder_id);

        tracing::info!(
            "Round {} won by {} (score {})",
            session.id,
            responder_id,
            score
        );

        self.broadcast_to_all(ServerMessage::CorrectGuess {
            session_id: session.id.clone(),
            responder_id: responder_id.to_string(),
            name: session.entry.localized_name.clone(),
            image: session.entry.image().map(str::to_string),
            score,
        });

        GuessOutcome::Correct { session, score }
    }

    /// Close a round whose deadline passed.
    ///
    /// Only acts if `session_id` is still the open round; returns the closed
    /// session in that case and `None` for stale timers.
    pub async fn expire_session(&self, session_id: &str) -> Option<GameSession> {
        let mut slot = self.session.write().await;

        if !slot
            .as_ref()
            .is_some_and(|s| s.id == session_id && s.is_open())
        {
            tracing::debug!("Timer for round {} fired after it closed", session_id);
            return None;
        }

        let mut session = slot.take()?;
        session.status = SessionStatus::Closed;

        tracing::info!("Round {} timed out", session.id);

        self.broadcast_to_all(ServerMessage::TimeUp {
            session_id: session.id.clone(),
            name: session.entry.localized_name.clone(),
            image: session.entry.image().map(str::to_string),
        });

        Some(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Roster;
    use std::time::Duration;
    use tokio::sync::broadcast::error::TryRecvError;

    fn edward() -> CharacterEntry {
        CharacterEntry::new(
            "Edward Elric",
            "ايدوارد ايلريك",
            Some("https://cdn.example/edward.jpg".to_string()),
        )
        .unwrap()
    }

    fn state_with(entries: Vec<CharacterEntry>) -> Arc<AppState> {
        Arc::new(AppState::new(
            GameConfig::default(),
            Roster::from_entries(entries),
        ))
    }

    fn started(outcome: StartOutcome) -> RoundInfo {
        match outcome {
            StartOutcome::Started(round) => round,
            other => panic!("Expected Started, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_start_with_empty_roster_is_unavailable() {
        let state = state_with(vec![]);

        assert_eq!(state.start_session().await, StartOutcome::Unavailable);
        assert!(state.session.read().await.is_none());
    }

    #[tokio::test]
    async fn test_start_opens_round_and_withholds_name() {
        let state = state_with(vec![edward()]);
        let mut rx = state.broadcast.subscribe();

        let round = started(state.start_session().await);

        match rx.recv().await.unwrap() {
            ServerMessage::RoundStarted {
                session_id,
                image,
                time_limit_secs,
                ..
            } => {
                assert_eq!(session_id, round.session_id);
                assert_eq!(image.as_deref(), Some("https://cdn.example/edward.jpg"));
                assert_eq!(time_limit_secs, 20);
            }
            other => panic!("Expected RoundStarted, got {:?}", other),
        }

        let session = state.session.read().await.clone().unwrap();
        assert!(session.is_open());
        assert_eq!(
            session.deadline_at - session.started_at,
            TimeDelta::milliseconds(20_000)
        );
    }

    #[tokio::test]
    async fn test_duplicate_start_keeps_existing_round() {
        let state = state_with(vec![edward()]);
        started(state.start_session().await);
        let before = state.session.read().await.clone().unwrap();

        assert_eq!(state.start_session().await, StartOutcome::AlreadyOpen);

        let after = state.session.read().await.clone().unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.deadline_at, before.deadline_at);
        assert!(Arc::ptr_eq(&after.entry, &before.entry));
    }

    #[tokio::test]
    async fn test_correct_guess_wins_and_clears_slot() {
        let state = state_with(vec![edward()]);
        let round = started(state.start_session().await);
        let mut rx = state.broadcast.subscribe();

        match state.submit_guess("u1", "elric").await {
            GuessOutcome::Correct { session, score } => {
                assert_eq!(session.id, round.session_id);
                assert_eq!(session.status, SessionStatus::Closed);
                assert_eq!(score, 1);
            }
            other => panic!("Expected Correct, got {:?}", other),
        }

        assert_eq!(
            rx.recv().await.unwrap(),
            ServerMessage::CorrectGuess {
                session_id: round.session_id,
                responder_id: "u1".to_string(),
                name: "ايدوارد ايلريك".to_string(),
                image: Some("https://cdn.example/edward.jpg".to_string()),
                score: 1,
            }
        );
        assert!(state.session.read().await.is_none());
        assert_eq!(state.get_score("u1").await, 1);
    }

    #[tokio::test]
    async fn test_partial_and_arabic_guesses_win() {
        let state = state_with(vec![edward()]);

        started(state.start_session().await);
        assert!(matches!(
            state.submit_guess("u1", "I think it's Edward!").await,
            GuessOutcome::Correct { .. }
        ));

        started(state.start_session().await);
        assert!(matches!(
            state.submit_guess("u2", "ايلريك").await,
            GuessOutcome::Correct { .. }
        ));
    }

    #[tokio::test]
    async fn test_wrong_guess_changes_nothing() {
        let state = state_with(vec![edward()]);
        let round = started(state.start_session().await);
        let mut rx = state.broadcast.subscribe();

        assert!(matches!(
            state.submit_guess("u1", "sasuke").await,
            GuessOutcome::Wrong
        ));

        let session = state.session.read().await.clone().unwrap();
        assert_eq!(session.id, round.session_id);
        assert!(session.is_open());
        assert_eq!(state.get_score("u1").await, 0);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_guess_without_round() {
        let state = state_with(vec![edward()]);
        assert!(matches!(
            state.submit_guess("u1", "elric").await,
            GuessOutcome::NoRound
        ));
        assert_eq!(state.get_score("u1").await, 0);
    }

    #[tokio::test]
    async fn test_expire_reveals_name() {
        let state = state_with(vec![edward()]);
        let round = started(state.start_session().await);
        let mut rx = state.broadcast.subscribe();

        let closed = state.expire_session(&round.session_id).await.unwrap();
        assert_eq!(closed.status, SessionStatus::Closed);

        assert_eq!(
            rx.recv().await.unwrap(),
            ServerMessage::TimeUp {
                session_id: round.session_id,
                name: "ايدوارد ايلريك".to_string(),
                image: Some("https://cdn.example/edward.jpg".to_string()),
            }
        );
        assert!(state.session.read().await.is_none());
        assert_eq!(state.scores.read().await.total_wins(), 0);
    }

    #[tokio::test]
    async fn test_late_timeout_after_win_is_ignored() {
        let state = state_with(vec![edward()]);
        let round = started(state.start_session().await);
        state.submit_guess("u1", "edward").await;
        let mut rx = state.broadcast.subscribe();

        assert!(state.expire_session(&round.session_id).await.is_none());
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(state.get_score("u1").await, 1);
    }

    #[tokio::test]
    async fn test_late_guess_after_timeout_is_ignored() {
        let state = state_with(vec![edward()]);
        let round = started(state.start_session().await);
        state.expire_session(&round.session_id).await.unwrap();
        let mut rx = state.broadcast.subscribe();

        assert!(matches!(
            state.submit_guess("u1", "edward").await,
            GuessOutcome::NoRound
        ));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(state.get_score("u1").await, 0);
    }

    #[tokio::test]
    async fn test_stale_timer_does_not_close_newer_round() {
        let state = state_with(vec![edward()]);
        let first = started(state.start_session().await);
        state.submit_guess("u1", "elric").await;
        let second = started(state.start_session().await);

        assert!(state.expire_session(&first.session_id).await.is_none());

        let current = state.current_round().await.unwrap();
        assert_eq!(current.session_id, second.session_id);
    }

    #[tokio::test]
    async fn test_simultaneous_correct_guesses_record_one_win() {
        let state = state_with(vec![edward()]);
        started(state.start_session().await);

        let (a, b) = tokio::join!(
            state.submit_guess("alice", "edward"),
            state.submit_guess("bob", "elric")
        );

        let wins = [a, b]
            .iter()
            .filter(|o| matches!(o, GuessOutcome::Correct { .. }))
            .count();
        assert_eq!(wins, 1);
        assert_eq!(state.scores.read().await.total_wins(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_time_up() {
        let state = state_with(vec![edward()]);
        let mut rx = state.broadcast.subscribe();
        let round = started(state.start_session().await);

        assert!(matches!(
            rx.recv().await.unwrap(),
            ServerMessage::RoundStarted { .. }
        ));

        // Paused clock auto-advances to the round deadline
        match rx.recv().await.unwrap() {
            ServerMessage::TimeUp { session_id, .. } => {
                assert_eq!(session_id, round.session_id);
            }
            other => panic!("Expected TimeUp, got {:?}", other),
        }
        assert!(state.current_round().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_after_win_sends_nothing() {
        let state = state_with(vec![edward()]);
        started(state.start_session().await);
        let mut rx = state.broadcast.subscribe();

        state.submit_guess("u1", "edward").await;
        assert!(matches!(
            rx.recv().await.unwrap(),
            ServerMessage::CorrectGuess { .. }
        ));

        tokio::time::sleep(DEFAULT_TIME_LIMIT + Duration::from_millis(10)).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(state.get_score("u1").await, 1);
    }
}

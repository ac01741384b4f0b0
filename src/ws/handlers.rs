//! Chat message dispatch
//!
//! Turns incoming chat lines into session triggers. Round events are
//! broadcast by the state itself; only per-sender acknowledgements are
//! returned from here.

use crate::protocol::{ClientMessage, ServerMessage, START_COMMAND};
use crate::state::{AppState, GuessOutcome, StartOutcome};
use std::sync::Arc;

/// Handle client messages and return optional response for the sender
pub async fn handle_message(msg: ClientMessage, state: &Arc<AppState>) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Chat {
            author_id,
            text,
            bot,
        } => {
            if bot {
                return None;
            }

            if text == START_COMMAND {
                handle_start_request(state).await
            } else {
                handle_guess(state, author_id, text).await
            }
        }
    }
}

pub async fn handle_start_request(state: &Arc<AppState>) -> Option<ServerMessage> {
    match state.start_session().await {
        StartOutcome::Started(_) | StartOutcome::AlreadyOpen => None,
        StartOutcome::Unavailable => Some(ServerMessage::StartUnavailable),
    }
}

pub async fn handle_guess(
    state: &Arc<AppState>,
    author_id: String,
    text: String,
) -> Option<ServerMessage> {
    match state.submit_guess(&author_id, &text).await {
        GuessOutcome::Wrong => Some(ServerMessage::WrongGuessAck {
            responder_id: author_id,
        }),
        GuessOutcome::Correct { .. } | GuessOutcome::NoRound => None,
    }
}

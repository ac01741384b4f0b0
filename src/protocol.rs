use crate::types::*;
use serde::{Deserialize, Serialize};

/// Text that asks for a new round
pub const START_COMMAND: &str = "!guess";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// A chat line from a channel participant
    Chat {
        author_id: ResponderId,
        text: String,
        /// Messages from other bots are ignored
        #[serde(default)]
        bot: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        server_now: String,
        /// Round in progress, if any (answer withheld)
        round: Option<RoundInfo>,
    },
    RoundStarted {
        session_id: SessionId,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<String>,
        time_limit_secs: u64,
        deadline: String,
    },
    CorrectGuess {
        session_id: SessionId,
        responder_id: ResponderId,
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<String>,
        score: u32,
    },
    TimeUp {
        session_id: SessionId,
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<String>,
    },
    /// Sent only to the author of a wrong guess
    WrongGuessAck {
        responder_id: ResponderId,
    },
    /// Sent only to the requester when there is nothing to play with
    StartUnavailable,
    Error {
        code: String,
        msg: String,
    },
}

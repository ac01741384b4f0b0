use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use crate::normalize::normalize;

/// Opaque ID types for type safety
pub type SessionId = String;
pub type ResponderId = String;

/// Default time players get to guess a character
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_millis(20_000);

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub time_limit: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            time_limit: DEFAULT_TIME_LIMIT,
        }
    }
}

impl GameConfig {
    /// Load game config from environment variables
    /// TIME_LIMIT_MS overrides the guessing window
    pub fn from_env() -> Self {
        let time_limit = match std::env::var("TIME_LIMIT_MS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    tracing::warn!("Invalid TIME_LIMIT_MS '{}', using default", raw);
                    DEFAULT_TIME_LIMIT
                }
            },
            Err(_) => DEFAULT_TIME_LIMIT,
        };

        Self { time_limit }
    }
}

/// A character players can be asked to guess
///
/// Accepted strings are derived once at construction: both name forms and
/// every whitespace-delimited token of each, normalized, empties removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterEntry {
    pub display_name: String,
    pub localized_name: String,
    pub image_url: Option<String>,
    pub accepted_strings: BTreeSet<String>,
}

impl CharacterEntry {
    /// Build an entry, or `None` if the localized name can never be matched
    /// (it normalizes to an empty string).
    pub fn new(
        display_name: impl Into<String>,
        localized_name: impl Into<String>,
        image_url: Option<String>,
    ) -> Option<Self> {
        let display_name = display_name.into();
        let localized_name = localized_name.into();

        if normalize(&localized_name).is_empty() {
            return None;
        }

        let mut accepted_strings = BTreeSet::new();
        for name in [&display_name, &localized_name] {
            let normalized = normalize(name);
            accepted_strings.extend(normalized.split(' ').map(str::to_string));
            accepted_strings.insert(normalized);
        }
        accepted_strings.retain(|s| !s.is_empty());

        Some(Self {
            display_name,
            localized_name,
            image_url,
            accepted_strings,
        })
    }

    /// Image URL if it looks usable (absent or non-http URLs are omitted)
    pub fn image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .filter(|url| url.starts_with("http"))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Open,
    Closed,
}

/// The single in-flight round
#[derive(Debug, Clone)]
pub struct GameSession {
    pub id: SessionId,
    pub entry: Arc<CharacterEntry>,
    pub started_at: DateTime<Utc>,
    pub deadline_at: DateTime<Utc>,
    pub status: SessionStatus,
}

impl GameSession {
    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Open
    }
}

/// Public view of a round; never carries the answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundInfo {
    pub session_id: SessionId,
    pub image: Option<String>,
    pub deadline: String,
}

impl From<&GameSession> for RoundInfo {
    fn from(session: &GameSession) -> Self {
        Self {
            session_id: session.id.clone(),
            image: session.entry.image().map(str::to_string),
            deadline: session.deadline_at.to_rfc3339(),
        }
    }
}

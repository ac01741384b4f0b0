//! Character roster: where guessable entries come from
//!
//! A [`RosterSource`] produces entries (usually over the network), and the
//! in-memory [`Roster`] hands out random picks to the game.

mod jikan;
mod transliterate;

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::types::CharacterEntry;

pub use jikan::{entries_from_response, JikanCharactersResponse, JikanSource};
pub use transliterate::{fix_name, to_arabic};

/// Result type for roster operations
pub type RosterResult<T> = Result<T, RosterError>;

/// Errors that can occur while acquiring roster entries
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Response parsing failed: {0}")]
    Parse(String),
}

/// Anything that can produce a batch of character entries
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Fetch all entries this source knows about
    async fn fetch(&self) -> RosterResult<Vec<CharacterEntry>>;

    /// Get the name of this source
    fn name(&self) -> &str;
}

/// Anime whose characters are loaded when nothing else is configured
pub const DEFAULT_ANIME_IDS: &[u32] = &[20, 1735, 269, 813, 16498, 40748, 38000];
pub const DEFAULT_JIKAN_BASE_URL: &str = "https://api.jikan.moe/v4";
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(800);

/// Configuration for roster acquisition
#[derive(Debug, Clone)]
pub struct RosterConfig {
    pub anime_ids: Vec<u32>,
    pub jikan_base_url: String,
    /// Pause between API requests (Jikan is rate limited)
    pub request_delay: Duration,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            anime_ids: DEFAULT_ANIME_IDS.to_vec(),
            jikan_base_url: DEFAULT_JIKAN_BASE_URL.to_string(),
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

impl RosterConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let anime_ids = std::env::var("ROSTER_ANIME_IDS")
            .ok()
            .and_then(|raw| {
                let parsed: Result<Vec<u32>, _> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::parse)
                    .collect();
                match parsed {
                    Ok(ids) if !ids.is_empty() => Some(ids),
                    _ => {
                        tracing::warn!("Invalid ROSTER_ANIME_IDS '{}', using defaults", raw);
                        None
                    }
                }
            })
            .unwrap_or_else(|| DEFAULT_ANIME_IDS.to_vec());

        let jikan_base_url = std::env::var("JIKAN_BASE_URL")
            .ok()
            .and_then(|url| {
                let trimmed = url.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| DEFAULT_JIKAN_BASE_URL.to_string());

        let request_delay = std::env::var("ROSTER_REQUEST_DELAY_MS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REQUEST_DELAY);

        Self {
            anime_ids,
            jikan_base_url,
            request_delay,
        }
    }
}

/// In-memory roster shared by the game
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Arc<RwLock<Vec<Arc<CharacterEntry>>>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = CharacterEntry>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries.into_iter().map(Arc::new).collect())),
        }
    }

    /// Append entries; returns the new roster size
    pub async fn extend(&self, entries: impl IntoIterator<Item = CharacterEntry>) -> usize {
        let mut current = self.entries.write().await;
        current.extend(entries.into_iter().map(Arc::new));
        current.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Pick one entry uniformly at random, or `None` if the roster is empty
    pub async fn pick_random(&self) -> Option<Arc<CharacterEntry>> {
        let entries = self.entries.read().await;
        let mut rng = rand::rng();
        entries.choose(&mut rng).cloned()
    }

    /// Fetch everything from `source` and add it to the roster.
    /// Returns the roster size after loading.
    pub async fn load_from(&self, source: &dyn RosterSource) -> RosterResult<usize> {
        tracing::info!("Loading roster from {}", source.name());
        let entries = source.fetch().await?;
        let fetched = entries.len();
        let total = self.extend(entries).await;
        tracing::info!("Loaded {} characters ({} total)", fetched, total);
        Ok(total)
    }
}

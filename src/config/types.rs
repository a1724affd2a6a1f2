use scrubview_common::{MediaSourceId, UserId};
use scrubview_media::VariantSelection;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Base URL of the media server, e.g. `http://localhost:8096`
    #[serde(default = "default_url")]
    pub url: String,

    /// Access token sent with every request
    #[serde(default)]
    pub api_key: String,

    /// User whose view of the library is queried
    #[serde(default)]
    pub user_id: Option<UserId>,

    /// Per-request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    "http://localhost:8096".to_string()
}
fn default_timeout() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: String::new(),
            user_id: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// What to do with positions past the last advertised thumbnail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfRangePolicy {
    /// Return no preview without contacting the server.
    #[default]
    Reject,
    /// Fetch the computed sheet anyway and let the server decide.
    Attempt,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PreviewConfig {
    /// Maximum number of cropped thumbnails kept per loader (default: 20)
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Entries dropped at once when the cache is full (default: 5)
    #[serde(default = "default_eviction_batch")]
    pub eviction_batch: usize,

    /// Interval reported before trickplay metadata is known (default: 10000)
    #[serde(default = "default_fallback_interval")]
    pub fallback_interval_ms: u64,

    /// Decoded tile sheets kept per loader; 0 disables sheet caching
    #[serde(default)]
    pub sheet_cache_capacity: usize,

    #[serde(default)]
    pub out_of_range: OutOfRangePolicy,

    /// Use this media source's trickplay instead of the first one listed
    #[serde(default)]
    pub media_source_id: Option<MediaSourceId>,
}

fn default_cache_capacity() -> usize {
    20
}
fn default_eviction_batch() -> usize {
    5
}
fn default_fallback_interval() -> u64 {
    10_000
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            eviction_batch: default_eviction_batch(),
            fallback_interval_ms: default_fallback_interval(),
            sheet_cache_capacity: 0,
            out_of_range: OutOfRangePolicy::default(),
            media_source_id: None,
        }
    }
}

impl PreviewConfig {
    pub fn fallback_interval(&self) -> Duration {
        Duration::from_millis(self.fallback_interval_ms)
    }

    pub fn variant_selection(&self) -> VariantSelection {
        match &self.media_source_id {
            Some(id) => VariantSelection::MediaSource(id.clone()),
            None => VariantSelection::FirstEncountered,
        }
    }
}

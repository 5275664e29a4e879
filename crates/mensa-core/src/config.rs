use serde::{Deserialize, Serialize};

/// Configuration for the check-in ingest path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Maximum accepted comment length in characters
    /// Default: 500
    #[serde(default = "default_max_comment_chars")]
    pub max_comment_chars: usize,

    /// Run recomputation inline instead of spawning a background task.
    /// The production default is background (a slow aggregation must
    /// never delay the check-in confirmation); tests flip this on for
    /// deterministic ordering.
    /// Default: false
    #[serde(default)]
    pub recompute_inline: bool,
}

fn default_max_comment_chars() -> usize {
    500
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_comment_chars: default_max_comment_chars(),
            recompute_inline: false,
        }
    }
}

impl IngestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_comment_chars(mut self, max: usize) -> Self {
        self.max_comment_chars = max;
        self
    }

    pub fn with_recompute_inline(mut self, inline: bool) -> Self {
        self.recompute_inline = inline;
        self
    }
}

/// Configuration for status subscriptions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Broadcast buffer per feed. A subscriber falling further behind
    /// than this fails with a lag error rather than blocking commits.
    /// Default: 64
    #[serde(default = "default_feed_capacity")]
    pub feed_capacity: usize,
}

fn default_feed_capacity() -> usize {
    64
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            feed_capacity: default_feed_capacity(),
        }
    }
}

impl StreamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed_capacity(mut self, capacity: usize) -> Self {
        self.feed_capacity = capacity;
        self
    }
}

//! Dashboard fan-out configuration.

use serde::{Deserialize, Serialize};

/// Settings for the in-process dashboard broadcast hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Buffer size of each per-machine broadcast channel.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer: default_channel_buffer(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

//! ViewerConfig and defaults.

use serde::{Deserialize, Serialize};

use crate::ingest::DEFAULT_BATCH_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Tail watcher poll interval in milliseconds.
    pub poll_interval_ms: u64,
    /// Records per delivered batch during a full load.
    pub batch_size: usize,
    /// Capacity of the bounded consumer event channel. Small on purpose:
    /// the channel send is the ingestion backpressure point.
    pub event_channel_capacity: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            batch_size: DEFAULT_BATCH_SIZE,
            event_channel_capacity: 16,
        }
    }
}

impl ViewerConfig {
    /// Validate configuration values are sane.
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be > 0".to_string());
        }
        if self.batch_size == 0 {
            return Err("batch_size must be > 0".to_string());
        }
        if self.event_channel_capacity == 0 {
            return Err("event_channel_capacity must be > 0".to_string());
        }
        Ok(())
    }
}

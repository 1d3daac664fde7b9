//! Config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::model::ViewerConfig;

impl ViewerConfig {
    /// Load configuration from file or environment variables.
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var("VIEWER_CONFIG_FILE")
            .unwrap_or_else(|_| "/etc/clefview/viewer.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::debug!(
                "Config file not found at {}, using environment variables",
                config_path
            );
            Self::from_env()
        };

        if let Some(interval) = env_parse("VIEWER_POLL_INTERVAL_MS") {
            config.poll_interval_ms = interval;
        }
        if let Some(size) = env_parse("VIEWER_BATCH_SIZE") {
            config.batch_size = size;
        }
        if let Some(capacity) = env_parse("VIEWER_EVENT_CHANNEL_CAPACITY") {
            config.event_channel_capacity = capacity;
        }

        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: ViewerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            poll_interval_ms: env_parse("VIEWER_POLL_INTERVAL_MS")
                .unwrap_or(defaults.poll_interval_ms),
            batch_size: env_parse("VIEWER_BATCH_SIZE").unwrap_or(defaults.batch_size),
            event_channel_capacity: env_parse("VIEWER_EVENT_CHANNEL_CAPACITY")
                .unwrap_or(defaults.event_channel_capacity),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

//! Client configuration loaded from environment variables.
//!
//! All settings have defaults so the client can start with zero
//! configuration.

use std::path::PathBuf;

use twocat_shared::constants::{DEFAULT_CLASSIFIER_URL, DEFAULT_EVENT_CAPACITY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Database file.
    /// Env: `TWOCAT_DB_PATH`
    /// Default: platform data directory (see `Database::new`).
    pub db_path: Option<PathBuf>,

    /// Base URL of the link classifier; `/api/check-link` is appended.
    /// Env: `TWOCAT_CLASSIFIER_URL`
    /// Default: `http://127.0.0.1:8080`
    pub classifier_url: String,

    /// Buffered view events per subscriber before the slowest one lags.
    /// Env: `TWOCAT_EVENT_CAPACITY`
    /// Default: `64`
    pub event_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            classifier_url: DEFAULT_CLASSIFIER_URL.to_string(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("TWOCAT_DB_PATH").filter(|p| !p.is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(url) = lookup("TWOCAT_CLASSIFIER_URL").filter(|u| !u.is_empty()) {
            config.classifier_url = url;
        }

        if let Some(val) = lookup("TWOCAT_EVENT_CAPACITY") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.event_capacity = n,
                _ => {
                    tracing::warn!(
                        value = %val,
                        "Invalid TWOCAT_EVENT_CAPACITY, using default"
                    );
                }
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter.

        config
    }
}

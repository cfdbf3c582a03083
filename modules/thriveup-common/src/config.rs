use std::env;
use std::path::PathBuf;

/// Storage key the bookmarked set has always lived under.
pub const DEFAULT_BOOKMARK_KEY: &str = "bookmarkedEvents1";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Local storage
    pub data_dir: PathBuf,
    pub bookmark_key: String,

    // Remote event store
    pub events_file: Option<PathBuf>,
    pub events_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".thriveup"),
            bookmark_key: DEFAULT_BOOKMARK_KEY.to_string(),
            events_file: None,
            events_url: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    /// Every variable is optional.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            data_dir: non_empty_env("THRIVEUP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            bookmark_key: non_empty_env("THRIVEUP_BOOKMARK_KEY").unwrap_or(defaults.bookmark_key),
            events_file: non_empty_env("THRIVEUP_EVENTS_FILE").map(PathBuf::from),
            events_url: non_empty_env("THRIVEUP_EVENTS_URL"),
        }
    }

    pub fn log_redacted(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  THRIVEUP_DATA_DIR: {}", self.data_dir.display());
        tracing::info!("  THRIVEUP_BOOKMARK_KEY: {}", self.bookmark_key);
        tracing::info!(
            "  THRIVEUP_EVENTS_FILE: {}",
            self.events_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<not set>".to_string())
        );
        tracing::info!(
            "  THRIVEUP_EVENTS_URL: {}",
            self.events_url.as_deref().map(redact_url).unwrap_or_else(|| "<not set>".to_string())
        );
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Drop any query string so tokens passed as parameters never hit the logs.
fn redact_url(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{base}?..."),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_legacy_bookmark_key() {
        let config = Config::default();
        assert_eq!(config.bookmark_key, "bookmarkedEvents1");
        assert!(config.events_file.is_none());
        assert!(config.events_url.is_none());
    }

    #[test]
    fn redact_url_strips_query() {
        assert_eq!(
            redact_url("https://events.example/feed?token=abc"),
            "https://events.example/feed?..."
        );
        assert_eq!(redact_url("https://events.example/feed"), "https://events.example/feed");
    }
}

/// Session core configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | NACRE_DATA_DIR | /var/lib/nacre/pos | Data directory (store + session files) |
/// | NACRE_REMOTE_URL | (unset) | Remote identity service URL; unset means offline-only |
/// | NACRE_REMOTE_TIMEOUT_MS | 30000 | Remote request timeout (milliseconds) |
#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory for the identity store and persisted session state
    pub data_dir: String,
    /// Remote identity service URL; `None` disables the remote source
    pub remote_url: Option<String>,
    /// Remote request timeout in milliseconds
    pub remote_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("NACRE_DATA_DIR")
                .unwrap_or_else(|_| "/var/lib/nacre/pos".into()),
            remote_url: std::env::var("NACRE_REMOTE_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            remote_timeout_ms: std::env::var("NACRE_REMOTE_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30_000),
        }
    }

    /// Offline-only configuration rooted at a custom data directory.
    /// Mostly used in tests.
    pub fn offline(data_dir: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            remote_url: None,
            remote_timeout_ms: 30_000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

use std::env;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_LIVE_URL: &str = "ws://127.0.0.1:3001/live";

/// Base addresses of the two backend endpoints. The only environment
/// configuration the client reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// REST endpoint serving the document list
    pub api_base_url: String,

    /// WebSocket endpoint pushing creation events
    pub live_url: String,
}

impl Config {
    /// Read `DOCBOARD_API_URL` and `DOCBOARD_LIVE_URL`, falling back to
    /// the loopback defaults.
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("DOCBOARD_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            live_url: env::var("DOCBOARD_LIVE_URL")
                .unwrap_or_else(|_| DEFAULT_LIVE_URL.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            live_url: DEFAULT_LIVE_URL.to_string(),
        }
    }
}

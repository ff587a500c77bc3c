use std::env;

const DEFAULT_PORT: u16 = 9000;
const DEFAULT_PAYLOAD_LIMIT: usize = 2 * 1024 * 1024; // 2 MB

/// Service settings, read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    /// Body size cap for both JSON and text payloads
    pub payload_limit: usize,
    /// When set, POST routes require `X-API-Key` to equal `api_key`
    pub protect: bool,
    pub api_key: Option<String>,
    pub sentry_dsn: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            payload_limit: DEFAULT_PAYLOAD_LIMIT,
            protect: false,
            api_key: None,
            sentry_dsn: None,
        }
    }
}

impl Settings {
    /// Read `PORT`, `JSON_PAYLOAD_LIMIT`, `PROTECT`, `API_KEY` and `SENTRY_DSN`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            port: lookup("PORT")
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
            payload_limit: lookup("JSON_PAYLOAD_LIMIT")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(DEFAULT_PAYLOAD_LIMIT),
            protect: lookup("PROTECT")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false),
            api_key: non_empty("API_KEY"),
            sentry_dsn: non_empty("SENTRY_DSN"),
        }
    }
}

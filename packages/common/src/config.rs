use serde::Deserialize;

/// Retry policy for calls to the external catalog API.
#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    /// Total attempts per call, including the first. Default: 3.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay after the first failed attempt, doubled on every further one. Default: 500.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound for a single backoff delay. Default: 8000.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}
fn default_base_delay_ms() -> u64 {
    500
}
fn default_max_delay_ms() -> u64 {
    8000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Connection settings for the external catalog (Spotify Web API).
#[derive(Debug, Deserialize, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Redirect URI registered with the identity provider.
    #[serde(default = "default_callback_url")]
    pub callback_url: String,
    /// Base URL of the Web API. Default: "https://api.spotify.com/v1".
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Base URL of the accounts service. Default: "https://accounts.spotify.com".
    #[serde(default = "default_accounts_base_url")]
    pub accounts_base_url: String,
    /// Market passed to search requests. Default: "US".
    #[serde(default = "default_market")]
    pub market: String,
    /// Per-request timeout. Default: 10.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_callback_url() -> String {
    "http://localhost:5173/callback".into()
}
fn default_api_base_url() -> String {
    "https://api.spotify.com/v1".into()
}
fn default_accounts_base_url() -> String {
    "https://accounts.spotify.com".into()
}
fn default_market() -> String {
    "US".into()
}
fn default_request_timeout_secs() -> u64 {
    10
}

impl SpotifyConfig {
    /// Config with the given credentials and every other field defaulted.
    pub fn with_credentials(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            callback_url: default_callback_url(),
            api_base_url: default_api_base_url(),
            accounts_base_url: default_accounts_base_url(),
            market: default_market(),
            request_timeout_secs: default_request_timeout_secs(),
            retry: RetryConfig::default(),
        }
    }
}

/// Database connection settings shared by the server and the crawler.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

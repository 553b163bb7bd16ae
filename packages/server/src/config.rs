use common::{DatabaseConfig, SpotifyConfig};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Environment variable naming an alternative config file (without extension).
pub const CONFIG_PATH_ENV: &str = "SPOTIFY_MATCH_CONFIG";

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Registered users allowed in the current round. Default: 500.
    #[serde(default = "default_max_users_per_round")]
    pub max_users_per_round: u64,
    /// Local hit count below which search also asks the external catalog. Default: 5.
    #[serde(default = "default_search_fallback_threshold")]
    pub search_fallback_threshold: usize,
    /// Page size when the request gives none. Default: 10.
    #[serde(default = "default_search_limit")]
    pub default_search_limit: u64,
    /// Largest page size a request may ask for. Default: 50.
    #[serde(default = "default_max_search_limit")]
    pub max_search_limit: u64,
}

fn default_max_users_per_round() -> u64 {
    500
}
fn default_search_fallback_threshold() -> usize {
    5
}
fn default_search_limit() -> u64 {
    10
}
fn default_max_search_limit() -> u64 {
    50
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_users_per_round: default_max_users_per_round(),
            search_fallback_threshold: default_search_fallback_threshold(),
            default_search_limit: default_search_limit(),
            max_search_limit: default_max_search_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub spotify: SpotifyConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config/config".into());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            // Load from config/config.toml
            .add_source(File::with_name(&path).required(false))
            // Override from environment (e.g., SPOTIFY_MATCH__SPOTIFY__CLIENT_SECRET)
            .add_source(
                Environment::with_prefix("SPOTIFY_MATCH")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}

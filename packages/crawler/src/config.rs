use common::{DatabaseConfig, SpotifyConfig};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use server::config::CONFIG_PATH_ENV;

#[derive(Debug, Deserialize, Clone)]
pub struct CrawlConfig {
    /// Artists the catalog should end up with. Default: 25000.
    #[serde(default = "default_target_artist_count")]
    pub target_artist_count: u64,
    /// Results per search request. The catalog caps this at 50. Default: 50.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Pause between consecutive search requests. Default: 300.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Log progress every this many inserted artists. Default: 100.
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

fn default_target_artist_count() -> u64 {
    25_000
}
fn default_page_size() -> u32 {
    50
}
fn default_request_delay_ms() -> u64 {
    300
}
fn default_progress_every() -> usize {
    100
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            target_artist_count: default_target_artist_count(),
            page_size: default_page_size(),
            request_delay_ms: default_request_delay_ms(),
            progress_every: default_progress_every(),
        }
    }
}

/// Settings for the `populate-artists` binary. Shares its file and
/// environment layout with the server, ignoring the server-only sections.
#[derive(Debug, Deserialize, Clone)]
pub struct CrawlerAppConfig {
    pub database: DatabaseConfig,
    pub spotify: SpotifyConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
}

impl CrawlerAppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config/config".into());

        Config::builder()
            .add_source(File::with_name(&path).required(false))
            // e.g. SPOTIFY_MATCH__CRAWL__TARGET_ARTIST_COUNT=1000
            .add_source(
                Environment::with_prefix("SPOTIFY_MATCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

pub mod artist;
pub mod config;
pub mod retry;

pub use artist::{Artist, ArtistImage};
pub use config::{DatabaseConfig, RetryConfig, SpotifyConfig};

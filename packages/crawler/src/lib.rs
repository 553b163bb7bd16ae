pub mod config;
pub mod crawler;
pub mod persist;
pub mod plan;

pub use crawler::{CrawlReport, SeedCrawler};
pub use persist::{PersistReport, persist_new_artists};
pub use plan::{CrawlPlan, SearchBucket};

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crawler::config::CrawlerAppConfig;
use crawler::{CrawlPlan, SeedCrawler, persist_new_artists};
use server::database::{ensure_indexes, init_db};
use spotify::SpotifyClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = CrawlerAppConfig::load().context("Failed to load configuration")?;
    let crawl = &config.crawl;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    ensure_indexes(&db).await?;

    let market = Some(config.spotify.market.clone()).filter(|m| !m.is_empty());
    let client = SpotifyClient::new(config.spotify.clone()).context("Failed to build HTTP client")?;
    let crawler = SeedCrawler::new(
        Arc::new(client),
        market,
        Duration::from_millis(crawl.request_delay_ms),
    );
    crawler
        .authenticate()
        .await
        .context("Failed to obtain client credentials token")?;

    let plan = CrawlPlan::new(crawl.target_artist_count, crawl.page_size);
    info!(
        target = crawl.target_artist_count,
        buckets = plan.buckets.len(),
        requests = plan.total_requests(),
        "Starting crawl"
    );

    let report = crawler.crawl(&plan).await;
    let persisted = persist_new_artists(&db, &report.artists, crawl.progress_every).await;

    info!(
        candidates = report.artists.len(),
        added = persisted.added,
        failed = persisted.failed,
        "Catalog population complete"
    );
    Ok(())
}

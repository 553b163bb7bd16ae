use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use common::Artist;
use spotify::{CatalogApi, SpotifyError, TokenCache};
use tracing::{info, instrument, warn};

use crate::plan::CrawlPlan;

/// What a crawl produced.
#[derive(Debug, Default)]
pub struct CrawlReport {
    /// Unique candidates, most popular first.
    pub artists: Vec<Artist>,
    pub requests: u64,
    pub failed_pages: u64,
}

/// Walks a [`CrawlPlan`] one page at a time with a client-credentials token.
pub struct SeedCrawler {
    api: Arc<dyn CatalogApi>,
    tokens: TokenCache,
    market: Option<String>,
    request_delay: Duration,
}

impl SeedCrawler {
    pub fn new(api: Arc<dyn CatalogApi>, market: Option<String>, request_delay: Duration) -> Self {
        Self {
            tokens: TokenCache::new(api.clone()),
            api,
            market,
            request_delay,
        }
    }

    /// Fetch a token up front so bad credentials fail before the crawl starts.
    pub async fn authenticate(&self) -> Result<(), SpotifyError> {
        self.tokens.access_token().await.map(|_| ())
    }

    /// Run every request in `plan` sequentially.
    ///
    /// A failed page is logged and skipped. The first sighting of an artist ID
    /// wins; later sightings are ignored. The result is ordered by popularity,
    /// descending, with ties kept in discovery order.
    #[instrument(skip_all, fields(buckets = plan.buckets.len()))]
    pub async fn crawl(&self, plan: &CrawlPlan) -> CrawlReport {
        let mut seen = HashSet::new();
        let mut report = CrawlReport::default();

        for bucket in &plan.buckets {
            for page in 0..bucket.pages {
                if report.requests > 0 && !self.request_delay.is_zero() {
                    tokio::time::sleep(self.request_delay).await;
                }
                report.requests += 1;

                let offset = page.saturating_mul(plan.page_size);
                let found = match self.fetch_page(&bucket.term, plan.page_size, offset).await {
                    Ok(found) => found,
                    Err(e) => {
                        warn!(term = %bucket.term, offset, error = %e, "Search page failed, skipping");
                        report.failed_pages += 1;
                        continue;
                    }
                };

                if page == 0 {
                    info!(term = %bucket.term, found = found.len(), "First page fetched");
                }

                for artist in found {
                    if artist.id.is_empty() || !seen.insert(artist.id.clone()) {
                        continue;
                    }
                    report.artists.push(artist);
                }
            }

            info!(term = %bucket.term, unique = report.artists.len(), "Term finished");
        }

        report
            .artists
            .sort_by(|a, b| b.popularity.cmp(&a.popularity));

        info!(
            requests = report.requests,
            failed_pages = report.failed_pages,
            unique = report.artists.len(),
            "Crawl finished"
        );
        report
    }

    async fn fetch_page(
        &self,
        term: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Artist>, SpotifyError> {
        let token = self.tokens.access_token().await?;
        let result = self
            .api
            .search_artists(term, limit, offset, &token, self.market.as_deref())
            .await;

        if matches!(&result, Err(e) if e.status() == Some(401)) {
            self.tokens.invalidate().await;
        }
        result
    }
}

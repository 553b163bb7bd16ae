use std::collections::HashSet;
use std::sync::Arc;

use common::Artist;
use sea_orm::DatabaseConnection;
use spotify::{CatalogApi, SpotifyError, TokenCache};
use tracing::{debug, instrument, warn};

use super::CatalogError;
use super::store::CatalogStore;
use crate::entity::artist;

#[derive(Debug, Clone)]
pub struct SearchPage {
    pub artists: Vec<Artist>,
    pub total: u64,
}

/// Catalog search that falls back to the external catalog when the local
/// store has too few matches.
///
/// External results that are new to the catalog are written back in a
/// background task; the response never waits for them.
pub struct ArtistSearchService {
    db: DatabaseConnection,
    api: Arc<dyn CatalogApi>,
    tokens: Arc<TokenCache>,
    market: Option<String>,
    fallback_threshold: usize,
}

impl ArtistSearchService {
    pub fn new(
        db: DatabaseConnection,
        api: Arc<dyn CatalogApi>,
        tokens: Arc<TokenCache>,
        market: Option<String>,
        fallback_threshold: usize,
    ) -> Self {
        Self {
            db,
            api,
            tokens,
            market,
            fallback_threshold,
        }
    }

    /// One page of artists matching `query`, with the total match count.
    ///
    /// When the store holds fewer than `fallback_threshold` matches, every
    /// local match is merged with the external first page and the page is cut
    /// from the merged set.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        limit: u64,
        offset: u64,
    ) -> Result<SearchPage, CatalogError> {
        let store = CatalogStore::new(&self.db);
        let (rows, local_total) = store.search_by_name(query, limit, offset).await?;

        if local_total >= self.fallback_threshold as u64 {
            return Ok(SearchPage {
                artists: decode_rows(rows)?,
                total: local_total,
            });
        }

        let external = match self.search_external(query, limit).await {
            Ok(artists) => artists,
            Err(e) => {
                warn!(query, error = %e, "External search failed, serving local results only");
                return Ok(SearchPage {
                    artists: decode_rows(rows)?,
                    total: local_total,
                });
            }
        };

        // Fewer than `fallback_threshold` rows, so loading them all is cheap.
        let all_local = if offset == 0 && rows.len() as u64 == local_total {
            rows
        } else {
            store.search_by_name(query, local_total, 0).await?.0
        };

        let (merged, unseen) = merge_results(decode_rows(all_local)?, external);
        let total = merged.len() as u64;
        debug!(total, unseen = unseen.len(), "Merged local and external results");

        if !unseen.is_empty() {
            self.write_back(unseen);
        }

        Ok(SearchPage {
            artists: merged
                .into_iter()
                .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .collect(),
            total,
        })
    }

    async fn search_external(&self, query: &str, limit: u64) -> Result<Vec<Artist>, SpotifyError> {
        let token = self.tokens.access_token().await?;
        let limit = u32::try_from(limit).unwrap_or(u32::MAX);
        let result = self
            .api
            .search_artists(query, limit, 0, &token, self.market.as_deref())
            .await;

        if let Err(e) = &result
            && e.status() == Some(401)
        {
            self.tokens.invalidate().await;
        }
        result
    }

    fn write_back(&self, artists: Vec<Artist>) {
        let db = self.db.clone();
        tokio::spawn(async move {
            let store = CatalogStore::new(&db);
            let mut added = 0u32;
            for artist in &artists {
                match store.insert_artist_if_absent(artist).await {
                    Ok(true) => added += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!(artist = %artist.id, error = %e, "Failed to write back searched artist")
                    }
                }
            }
            debug!(added, "Search write-back finished");
        });
    }
}

fn decode_rows(rows: Vec<artist::Model>) -> Result<Vec<Artist>, CatalogError> {
    rows.into_iter()
        .map(|row| {
            let artist = row.spotify_artist_id.clone();
            Artist::try_from(row).map_err(|source| CatalogError::Decode { artist, source })
        })
        .collect()
}

/// Merge external results into the local ones, deduplicated by external ID.
///
/// Local entries come first and win on conflict. Also returns the external
/// artists that were not among the local results.
fn merge_results(local: Vec<Artist>, external: Vec<Artist>) -> (Vec<Artist>, Vec<Artist>) {
    let mut seen: HashSet<String> = local.iter().map(|a| a.id.clone()).collect();
    let mut merged = local;
    let mut unseen = Vec::new();

    for artist in external {
        if artist.id.is_empty() || !seen.insert(artist.id.clone()) {
            continue;
        }
        merged.push(artist.clone());
        unseen.push(artist);
    }

    (merged, unseen)
}

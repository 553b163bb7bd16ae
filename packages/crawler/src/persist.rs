use std::collections::HashSet;

use common::Artist;
use sea_orm::ConnectionTrait;
use server::catalog::CatalogStore;
use tracing::{info, warn};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub added: u64,
    pub already_present: u64,
    pub failed: u64,
}

/// Insert every artist the catalog does not hold yet.
///
/// Artists already stored are left untouched, so running this twice with the
/// same input adds nothing the second time. Individual insert failures are
/// logged and counted; they do not stop the run.
pub async fn persist_new_artists<C: ConnectionTrait>(
    conn: &C,
    artists: &[Artist],
    progress_every: usize,
) -> PersistReport {
    let store = CatalogStore::new(conn);
    let mut report = PersistReport::default();

    let existing = match store.existing_artist_ids().await {
        Ok(ids) => ids,
        Err(e) => {
            warn!(error = %e, "Could not load existing artist IDs, relying on conflict checks");
            HashSet::new()
        }
    };
    info!(existing = existing.len(), candidates = artists.len(), "Persisting artists");

    for artist in artists {
        if existing.contains(&artist.id) {
            report.already_present += 1;
            continue;
        }

        match store.insert_artist_if_absent(artist).await {
            Ok(true) => {
                report.added += 1;
                if progress_every > 0 && report.added % progress_every as u64 == 0 {
                    info!(added = report.added, "Insert progress");
                }
            }
            Ok(false) => report.already_present += 1,
            Err(e) => {
                warn!(artist = %artist.id, error = %e, "Failed to insert artist");
                report.failed += 1;
            }
        }
    }

    info!(
        added = report.added,
        already_present = report.already_present,
        failed = report.failed,
        "Persist finished"
    );
    report
}

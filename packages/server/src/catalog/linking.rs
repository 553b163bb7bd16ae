use common::Artist;
use sea_orm::{ConnectionTrait, TransactionSession, TransactionTrait};
use tracing::{info, instrument};

use super::store::{CatalogStore, UpsertOutcome};
use super::{CatalogError, UserInfo};

/// An artist together with its 1-based position in the user's list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedArtist {
    pub rank: i32,
    pub artist: Artist,
}

/// Result of a committed save.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub user_id: i32,
    /// Every linked artist, in rank order.
    pub linked: Vec<RankedArtist>,
    /// Artists that were not in the catalog before this save.
    pub new_artists: Vec<Artist>,
}

/// Reconciles a user's artist list against the shared catalog.
///
/// Each save runs in a single transaction. Any error rolls back the whole
/// save, including the user row.
pub struct LinkingService<'a, C: ConnectionTrait + TransactionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait + TransactionTrait> LinkingService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Save a user's harvested top artists.
    ///
    /// The user is keyed by `spotify_user_id`, so resubmitting updates the
    /// same row and replaces its links. Artists are inserted when new and
    /// overwritten with the submitted fields otherwise.
    #[instrument(skip(self, user, artists), fields(artists = artists.len()))]
    pub async fn save_user_top_artists(
        &self,
        user: &UserInfo,
        spotify_user_id: &str,
        artists: &[Artist],
    ) -> Result<SaveOutcome, CatalogError> {
        let txn = self.conn.begin().await.map_err(CatalogError::Begin)?;
        let store = CatalogStore::new(&txn);

        let saved_user = store
            .upsert_user_by_spotify_id(user, spotify_user_id)
            .await
            .map_err(CatalogError::UserWrite)?;
        store
            .clear_links(saved_user.id)
            .await
            .map_err(CatalogError::LinkClear)?;

        let mut linked = Vec::with_capacity(artists.len());
        let mut new_artists = Vec::new();

        for (rank, artist) in (1..).zip(artists) {
            let (row, outcome) =
                store
                    .upsert_artist(artist)
                    .await
                    .map_err(|source| CatalogError::ArtistWrite {
                        artist: artist.id.clone(),
                        source,
                    })?;

            store
                .insert_link(saved_user.id, row.id, rank)
                .await
                .map_err(|source| CatalogError::LinkWrite {
                    artist: artist.id.clone(),
                    source,
                })?;

            if outcome == UpsertOutcome::Inserted {
                new_artists.push(artist.clone());
            }
            linked.push(RankedArtist {
                rank,
                artist: artist.clone(),
            });
        }

        txn.commit().await.map_err(CatalogError::Commit)?;

        info!(
            user_id = saved_user.id,
            linked = linked.len(),
            new_artists = new_artists.len(),
            "Saved top artists"
        );

        Ok(SaveOutcome {
            user_id: saved_user.id,
            linked,
            new_artists,
        })
    }

    /// Save a hand-picked list of artists for a brand-new user.
    ///
    /// Every ID must already be in the catalog; the first unknown ID aborts
    /// the save with [`CatalogError::ArtistNotFound`].
    #[instrument(skip(self, user, artist_ids), fields(artists = artist_ids.len()))]
    pub async fn save_user_selected_artists(
        &self,
        user: &UserInfo,
        artist_ids: &[String],
    ) -> Result<SaveOutcome, CatalogError> {
        let txn = self.conn.begin().await.map_err(CatalogError::Begin)?;
        let store = CatalogStore::new(&txn);

        let saved_user = store
            .insert_user(user)
            .await
            .map_err(CatalogError::UserWrite)?;

        let mut linked = Vec::with_capacity(artist_ids.len());

        for (rank, spotify_id) in (1..).zip(artist_ids) {
            let row = store
                .find_artist_by_spotify_id(spotify_id)
                .await?
                .ok_or_else(|| CatalogError::ArtistNotFound(spotify_id.clone()))?;

            store
                .insert_link(saved_user.id, row.id, rank)
                .await
                .map_err(|source| CatalogError::LinkWrite {
                    artist: spotify_id.clone(),
                    source,
                })?;

            let artist = Artist::try_from(row).map_err(|source| CatalogError::Decode {
                artist: spotify_id.clone(),
                source,
            })?;
            linked.push(RankedArtist { rank, artist });
        }

        txn.commit().await.map_err(CatalogError::Commit)?;

        info!(
            user_id = saved_user.id,
            linked = linked.len(),
            "Saved selected artists"
        );

        Ok(SaveOutcome {
            user_id: saved_user.id,
            linked,
            new_artists: Vec::new(),
        })
    }
}

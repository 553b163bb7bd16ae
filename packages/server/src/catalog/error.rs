use sea_orm::DbErr;
use thiserror::Error;

/// Failures of the catalog store and the linking engine.
///
/// Every variant raised inside a save transaction means the transaction was
/// rolled back.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to begin transaction: {0}")]
    Begin(#[source] DbErr),

    #[error("failed to save user: {0}")]
    UserWrite(#[source] DbErr),

    #[error("failed to clear existing artist links: {0}")]
    LinkClear(#[source] DbErr),

    #[error("failed to save artist {artist}: {source}")]
    ArtistWrite { artist: String, source: DbErr },

    #[error("failed to link artist {artist}: {source}")]
    LinkWrite { artist: String, source: DbErr },

    #[error("artist not found: {0}")]
    ArtistNotFound(String),

    #[error("failed to commit transaction: {0}")]
    Commit(#[source] DbErr),

    #[error("stored artist {artist} has malformed JSON: {source}")]
    Decode {
        artist: String,
        source: serde_json::Error,
    },

    #[error("catalog query failed: {0}")]
    Query(#[from] DbErr),
}

use std::time::Duration;

use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::entity::user_artist;

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    connect(opt).await
}

/// Connect with caller-supplied options and sync the entity schema.
pub async fn connect(opt: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(opt).await?;
    db.get_schema_registry("server::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Create secondary indexes the schema sync does not know about.
///
/// Failures are logged and ignored; the service works without them, only
/// slower.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Case-insensitive name search:
    // SELECT ... FROM artists WHERE LOWER(artist_name) LIKE ?
    let result = db
        .execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_artists_name_lower ON artists (LOWER(artist_name))",
        )
        .await;
    match result {
        Ok(_) => info!("Ensured index idx_artists_name_lower exists"),
        Err(e) => warn!("Failed to create index idx_artists_name_lower: {}", e),
    }

    // Reverse lookup from an artist to the users who picked it
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_user_artists_artist")
        .table(user_artist::Entity)
        .col(user_artist::Column::ArtistId)
        .to_owned();
    let result = db.execute_raw(db.get_database_backend().build(&stmt)).await;
    match result {
        Ok(_) => info!("Ensured index idx_user_artists_artist exists"),
        Err(e) => warn!("Failed to create index idx_user_artists_artist: {}", e),
    }

    Ok(())
}

use std::collections::HashSet;

use chrono::Utc;
use common::Artist;
use sea_orm::sea_query::{Expr, Func, LikeExpr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ExprTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::UserInfo;
use crate::entity::{artist, user, user_artist};

/// Whether an upsert created the row or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Row-level operations on artists, users and their links.
///
/// Works on a plain connection or inside a transaction; the caller decides.
pub struct CatalogStore<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> CatalogStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Look up an artist by external ID.
    ///
    /// `Ok(None)` means no such row; a query failure is always `Err`.
    pub async fn find_artist_by_spotify_id(
        &self,
        spotify_id: &str,
    ) -> Result<Option<artist::Model>, DbErr> {
        artist::Entity::find()
            .filter(artist::Column::SpotifyArtistId.eq(spotify_id))
            .one(self.conn)
            .await
    }

    /// Insert the artist, or overwrite the mutable fields of the existing row.
    pub async fn upsert_artist(
        &self,
        artist: &Artist,
    ) -> Result<(artist::Model, UpsertOutcome), DbErr> {
        let now = Utc::now();

        match self.find_artist_by_spotify_id(&artist.id).await? {
            None => {
                let model = artist::ActiveModel {
                    spotify_artist_id: Set(artist.id.clone()),
                    artist_name: Set(artist.name.clone()),
                    genres: Set(serde_json::json!(artist.genres)),
                    images: Set(serde_json::json!(artist.images)),
                    popularity: Set(artist.popularity),
                    spotify_url: Set(artist.spotify_url.clone()),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(self.conn)
                .await?;
                Ok((model, UpsertOutcome::Inserted))
            }
            Some(existing) => {
                let mut active: artist::ActiveModel = existing.into();
                active.artist_name = Set(artist.name.clone());
                active.genres = Set(serde_json::json!(artist.genres));
                active.images = Set(serde_json::json!(artist.images));
                active.popularity = Set(artist.popularity);
                active.spotify_url = Set(artist.spotify_url.clone());
                active.updated_at = Set(now);
                let model = active.update(self.conn).await?;
                Ok((model, UpsertOutcome::Updated))
            }
        }
    }

    /// Insert the artist unless a row with its external ID already exists.
    ///
    /// Existing rows are left untouched. Returns whether a row was inserted.
    pub async fn insert_artist_if_absent(&self, artist: &Artist) -> Result<bool, DbErr> {
        let now = Utc::now();
        let model = artist::ActiveModel {
            spotify_artist_id: Set(artist.id.clone()),
            artist_name: Set(artist.name.clone()),
            genres: Set(serde_json::json!(artist.genres)),
            images: Set(serde_json::json!(artist.images)),
            popularity: Set(artist.popularity),
            spotify_url: Set(artist.spotify_url.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = artist::Entity::insert(model)
            .on_conflict(
                OnConflict::column(artist::Column::SpotifyArtistId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;
        match result {
            Ok(rows) => Ok(rows > 0),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// External IDs of every artist in the catalog.
    pub async fn existing_artist_ids(&self) -> Result<HashSet<String>, DbErr> {
        let ids = artist::Entity::find()
            .select_only()
            .column(artist::Column::SpotifyArtistId)
            .into_tuple::<String>()
            .all(self.conn)
            .await?;
        Ok(ids.into_iter().collect())
    }

    /// Case-insensitive substring match on artist name, ordered by name.
    ///
    /// Returns one page of rows and the total number of matches.
    pub async fn search_by_name(
        &self,
        query: &str,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<artist::Model>, u64), DbErr> {
        let term = escape_like(query.trim());
        let select = artist::Entity::find().filter(
            Expr::expr(Func::lower(Expr::col(artist::Column::ArtistName)))
                .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
        );

        let total = select.clone().count(self.conn).await?;
        let rows = select
            .order_by_asc(artist::Column::ArtistName)
            .order_by_asc(artist::Column::Id)
            .offset(Some(offset))
            .limit(Some(limit))
            .all(self.conn)
            .await?;

        Ok((rows, total))
    }

    pub async fn count_users(&self) -> Result<u64, DbErr> {
        user::Entity::find().count(self.conn).await
    }

    /// Create the user, or update contact details of the row that already has
    /// this external user ID.
    pub async fn upsert_user_by_spotify_id(
        &self,
        info: &UserInfo,
        spotify_user_id: &str,
    ) -> Result<user::Model, DbErr> {
        let now = Utc::now();
        let model = user::ActiveModel {
            first_name: Set(info.first_name.clone()),
            last_name: Set(info.last_name.clone()),
            email: Set(info.email.clone()),
            phone_number: Set(info.phone_number.clone()),
            spotify_user_id: Set(Some(spotify_user_id.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        user::Entity::insert(model)
            .on_conflict(
                OnConflict::column(user::Column::SpotifyUserId)
                    .update_columns([
                        user::Column::FirstName,
                        user::Column::LastName,
                        user::Column::Email,
                        user::Column::PhoneNumber,
                        user::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await?;

        user::Entity::find()
            .filter(user::Column::SpotifyUserId.eq(spotify_user_id))
            .one(self.conn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("user {spotify_user_id} after upsert")))
    }

    /// Always creates a new user without an external ID.
    pub async fn insert_user(&self, info: &UserInfo) -> Result<user::Model, DbErr> {
        let now = Utc::now();
        user::ActiveModel {
            first_name: Set(info.first_name.clone()),
            last_name: Set(info.last_name.clone()),
            email: Set(info.email.clone()),
            phone_number: Set(info.phone_number.clone()),
            spotify_user_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.conn)
        .await
    }

    /// Remove every artist link of the user. Returns the number removed.
    pub async fn clear_links(&self, user_id: i32) -> Result<u64, DbErr> {
        let result = user_artist::Entity::delete_many()
            .filter(user_artist::Column::UserId.eq(user_id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn insert_link(&self, user_id: i32, artist_id: i32, rank: i32) -> Result<(), DbErr> {
        let link = user_artist::ActiveModel {
            user_id: Set(user_id),
            artist_id: Set(artist_id),
            rank: Set(rank),
        };
        user_artist::Entity::insert(link)
            .exec_without_returning(self.conn)
            .await?;
        Ok(())
    }
}

use common::{Artist, ArtistImage};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// External catalog ID. One row per external artist.
    #[sea_orm(unique)]
    pub spotify_artist_id: String,

    pub artist_name: String,

    /// Ordered genre tags as a JSON array of strings.
    #[sea_orm(column_type = "JsonBinary")]
    pub genres: serde_json::Value,

    /// Ordered images as a JSON array of `{url, height, width}`.
    #[sea_orm(column_type = "JsonBinary")]
    pub images: serde_json::Value,

    pub popularity: i32,
    pub spotify_url: String,

    #[sea_orm(has_many, via = "user_artist")]
    pub users: HasMany<super::user::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Artist {
    type Error = serde_json::Error;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let genres: Vec<String> = serde_json::from_value(model.genres)?;
        let images: Vec<ArtistImage> = serde_json::from_value(model.images)?;
        Ok(Artist {
            id: model.spotify_artist_id,
            name: model.artist_name,
            genres,
            images,
            popularity: model.popularity,
            spotify_url: model.spotify_url,
        })
    }
}

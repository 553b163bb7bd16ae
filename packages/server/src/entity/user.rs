use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,

    /// Natural key for users who authorized with the external catalog.
    /// NULL for users who picked their artists by hand.
    #[sea_orm(unique)]
    pub spotify_user_id: Option<String>,

    #[sea_orm(has_many, via = "user_artist")]
    pub artists: HasMany<super::artist::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

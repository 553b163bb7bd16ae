use common::Artist;
use serde::{Deserialize, Serialize};

use crate::catalog::{RankedArtist, UserInfo};
use crate::error::AppError;
use crate::models::shared::require_non_empty;

/// Request body for saving the caller's top artists.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SaveTopArtistsRequest {
    /// User access token obtained from the token exchange.
    pub access_token: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Phone number.
    #[schema(example = "+1 555 0100")]
    pub number: String,
}

pub fn validate_save_top_artists(payload: &SaveTopArtistsRequest) -> Result<(), AppError> {
    require_non_empty(&payload.access_token, "access_token")?;
    validate_contact(
        &payload.first_name,
        &payload.last_name,
        &payload.email,
        &payload.number,
    )
}

impl SaveTopArtistsRequest {
    pub fn user_info(&self) -> UserInfo {
        UserInfo {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.number.trim().to_string(),
        }
    }
}

/// Response for a saved top-artist list.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SaveTopArtistsResponse {
    #[schema(example = 42)]
    pub user_id: i32,
    /// Artists that were added to the catalog by this save.
    pub new_artists: Vec<Artist>,
}

/// Request body for saving a hand-picked artist list.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SaveSelectedArtistsRequest {
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "+1 555 0100")]
    pub number: String,
    /// External artist IDs in preference order. Each must already be in the catalog.
    #[schema(example = json!(["4Z8W4fKeB5YxbusRsdQVPb", "0oSGxfWSnnOXhD2fKuz2Gy"]))]
    pub artist_ids: Vec<String>,
}

pub fn validate_save_selected_artists(
    payload: &SaveSelectedArtistsRequest,
) -> Result<(), AppError> {
    validate_contact(
        &payload.first_name,
        &payload.last_name,
        &payload.email,
        &payload.number,
    )?;
    if payload.artist_ids.is_empty() {
        return Err(AppError::Validation("artist_ids must not be empty".into()));
    }
    for id in &payload.artist_ids {
        require_non_empty(id, "artist_ids entry")?;
    }
    Ok(())
}

impl SaveSelectedArtistsRequest {
    pub fn user_info(&self) -> UserInfo {
        UserInfo {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.number.trim().to_string(),
        }
    }
}

fn validate_contact(first: &str, last: &str, email: &str, number: &str) -> Result<(), AppError> {
    require_non_empty(first, "first_name")?;
    require_non_empty(last, "last_name")?;
    require_non_empty(email, "email")?;
    require_non_empty(number, "number")?;
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RankedArtistResponse {
    /// 1-based position in the submitted list.
    #[schema(example = 1)]
    pub rank: i32,
    pub artist: Artist,
}

impl From<RankedArtist> for RankedArtistResponse {
    fn from(ranked: RankedArtist) -> Self {
        Self {
            rank: ranked.rank,
            artist: ranked.artist,
        }
    }
}

/// Response for a saved hand-picked list.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SaveSelectedArtistsResponse {
    #[schema(example = 42)]
    pub user_id: i32,
    /// Full records of the linked artists, in rank order.
    pub artists: Vec<RankedArtistResponse>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ArtistSearchQuery {
    /// Case-insensitive substring of the artist name.
    pub query: String,
    /// Page size. Defaults to 10, capped at 50.
    pub limit: Option<u64>,
    /// Number of local matches to skip. Defaults to 0.
    pub offset: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ArtistSearchResponse {
    pub artists: Vec<Artist>,
    /// Number of matches. When the external catalog was consulted this is the
    /// size of the merged, deduplicated result set.
    #[schema(example = 7)]
    pub total: u64,
}

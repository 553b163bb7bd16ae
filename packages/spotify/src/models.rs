use common::{Artist, ArtistImage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: String,
}

/// Artist object as returned by the Web API.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
    #[serde(default)]
    pub popularity: i32,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl From<SpotifyArtist> for Artist {
    fn from(a: SpotifyArtist) -> Self {
        Artist {
            id: a.id,
            name: a.name,
            genres: a.genres,
            images: a
                .images
                .into_iter()
                .map(|img| ArtistImage {
                    url: img.url,
                    height: img.height,
                    width: img.width,
                })
                .collect(),
            popularity: a.popularity,
            spotify_url: a.external_urls.spotify,
        }
    }
}

/// A page of results. The API occasionally returns `null` entries.
#[derive(Debug, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<Option<T>>,
}

impl<T> Paging<T> {
    pub fn into_items(self) -> impl Iterator<Item = T> {
        self.items.into_iter().flatten()
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchArtistsResponse {
    pub artists: Paging<SpotifyArtist>,
}

/// Current user's profile (`GET /me`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Token endpoint response for either grant type.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub token_type: String,
    /// Only present for the authorization-code grant.
    pub refresh_token: Option<String>,
    /// Lifetime in seconds.
    pub expires_in: i64,
    pub scope: Option<String>,
}

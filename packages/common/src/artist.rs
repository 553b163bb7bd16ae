use serde::{Deserialize, Serialize};

/// Artist image as published by the external catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ArtistImage {
    #[schema(example = "https://i.scdn.co/image/ab6761610000e5eb")]
    pub url: String,
    /// Pixel height. The catalog omits it for some images.
    pub height: Option<u32>,
    /// Pixel width. The catalog omits it for some images.
    pub width: Option<u32>,
}

/// An artist keyed by its external catalog ID.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Artist {
    /// External catalog artist ID.
    #[schema(example = "4Z8W4fKeB5YxbusRsdQVPb")]
    pub id: String,
    #[schema(example = "Radiohead")]
    pub name: String,
    /// Genre tags in catalog order.
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub images: Vec<ArtistImage>,
    /// Popularity score, 0-100.
    #[schema(example = 79)]
    pub popularity: i32,
    /// Public profile URL on the external catalog.
    #[serde(default)]
    pub spotify_url: String,
}

impl Artist {
    /// Minimal artist with only an ID and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            genres: Vec::new(),
            images: Vec::new(),
            popularity: 0,
            spotify_url: String::new(),
        }
    }

    pub fn with_popularity(mut self, popularity: i32) -> Self {
        self.popularity = popularity;
        self
    }
}

use async_trait::async_trait;
use common::Artist;

use crate::error::SpotifyError;
use crate::models::{TokenGrant, UserProfile};

/// Operations the service needs from the external catalog.
///
/// [`SpotifyClient`](crate::SpotifyClient) is the production implementation.
/// Every call that touches the network retries transient failures before
/// returning.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// URL the end user is redirected to in order to grant access.
    fn authorize_url(&self, state: &str) -> Result<String, SpotifyError>;

    /// Trade an authorization code for user tokens.
    async fn exchange_code(&self, code: &str, state: &str) -> Result<TokenGrant, SpotifyError>;

    /// Application-level token for endpoints that need no user context.
    async fn client_credentials_token(&self) -> Result<TokenGrant, SpotifyError>;

    /// Profile of the user owning `access_token`.
    async fn current_user(&self, access_token: &str) -> Result<UserProfile, SpotifyError>;

    /// The user's top artists, most listened first.
    async fn top_artists(&self, access_token: &str) -> Result<Vec<Artist>, SpotifyError>;

    /// One page of artist search results.
    async fn search_artists(
        &self,
        term: &str,
        limit: u32,
        offset: u32,
        access_token: &str,
        market: Option<&str>,
    ) -> Result<Vec<Artist>, SpotifyError>;
}

use serde::{Deserialize, Serialize};
use spotify::TokenGrant;

use crate::error::AppError;
use crate::models::shared::require_non_empty;

/// Where to send the user to grant access, and the CSRF state to expect back.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AuthUrlResponse {
    #[schema(example = "https://accounts.spotify.com/authorize?client_id=...&state=...")]
    pub url: String,
    /// Random value the callback must echo back (64 hex characters).
    pub state: String,
}

/// Request body for exchanging an authorization code.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ExchangeTokenRequest {
    /// Authorization code from the callback.
    pub code: String,
    /// State value from the callback.
    pub state: String,
}

pub fn validate_exchange_token(payload: &ExchangeTokenRequest) -> Result<(), AppError> {
    require_non_empty(&payload.code, "code")?;
    require_non_empty(&payload.state, "state")?;
    Ok(())
}

/// User tokens issued by the identity provider.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ExchangeTokenResponse {
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    #[schema(example = 3600)]
    pub expires_in: i64,
}

impl From<TokenGrant> for ExchangeTokenResponse {
    fn from(grant: TokenGrant) -> Self {
        Self {
            access_token: grant.access_token,
            token_type: grant.token_type,
            refresh_token: grant.refresh_token,
            expires_in: grant.expires_in,
        }
    }
}

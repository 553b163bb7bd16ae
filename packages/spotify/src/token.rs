use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::api::CatalogApi;
use crate::error::SpotifyError;
use crate::models::TokenGrant;

/// Tokens this close to expiry are treated as expired.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// A client-credentials access token with its expiry.
#[derive(Debug, Clone)]
pub struct ClientToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl ClientToken {
    pub fn from_grant(grant: TokenGrant, now: DateTime<Utc>) -> Self {
        Self {
            access_token: grant.access_token,
            expires_at: now + Duration::seconds(grant.expires_in),
        }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// Caller-owned holder for a refreshable client-credentials token.
///
/// The token is fetched lazily on first use and again whenever it is within
/// a minute of expiring. Concurrent callers share one refresh.
pub struct TokenCache {
    api: Arc<dyn CatalogApi>,
    current: Mutex<Option<ClientToken>>,
}

impl TokenCache {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            current: Mutex::new(None),
        }
    }

    /// A valid access token, refreshing it first if needed.
    pub async fn access_token(&self) -> Result<String, SpotifyError> {
        let mut current = self.current.lock().await;
        let now = Utc::now();

        if let Some(token) = current.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.access_token.clone());
        }

        debug!("Refreshing client credentials token");
        let grant = self.api.client_credentials_token().await?;
        let token = ClientToken::from_grant(grant, Utc::now());
        let access_token = token.access_token.clone();
        *current = Some(token);
        Ok(access_token)
    }

    /// Drop the cached token so the next call fetches a new one.
    pub async fn invalidate(&self) {
        self.current.lock().await.take();
    }
}

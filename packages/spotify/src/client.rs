use std::time::Duration;

use async_trait::async_trait;
use common::retry::retry_with_backoff;
use common::{Artist, SpotifyConfig};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::api::CatalogApi;
use crate::error::SpotifyError;
use crate::models::{Paging, SearchArtistsResponse, SpotifyArtist, TokenGrant, UserProfile};

const AUTHORIZE_SCOPES: &str = "user-top-read user-read-email";
const TOP_ARTISTS_LIMIT: u32 = 50;

/// HTTP implementation of [`CatalogApi`] against the Spotify Web API.
#[derive(Clone)]
pub struct SpotifyClient {
    http: reqwest::Client,
    config: SpotifyConfig,
}

impl SpotifyClient {
    pub fn new(config: SpotifyConfig) -> Result<Self, SpotifyError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    fn accounts_url(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.config.accounts_base_url.trim_end_matches('/'),
            path
        )
    }

    /// Send the request built by `build`, retrying per the configured policy.
    ///
    /// `build` is called once per attempt since a `RequestBuilder` is consumed
    /// on send.
    async fn send_json<T, B>(&self, label: &str, build: B) -> Result<T, SpotifyError>
    where
        T: DeserializeOwned,
        B: Fn() -> RequestBuilder,
    {
        retry_with_backoff(&self.config.retry, label, |_| execute::<T>(build()))
            .await
            .map_err(SpotifyError::from)
    }

    async fn request_token(
        &self,
        label: &str,
        form: &[(&str, &str)],
    ) -> Result<TokenGrant, SpotifyError> {
        let url = self.accounts_url("/api/token");
        self.send_json(label, || {
            self.http
                .post(&url)
                .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
                .form(form)
        })
        .await
    }
}

async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, SpotifyError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if status.is_server_error() {
        return Err(SpotifyError::Server {
            status: status.as_u16(),
            body,
        });
    }
    if !status.is_success() {
        return Err(SpotifyError::Client {
            status: status.as_u16(),
            body,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl CatalogApi for SpotifyClient {
    fn authorize_url(&self, state: &str) -> Result<String, SpotifyError> {
        let url = Url::parse_with_params(
            &self.accounts_url("/authorize"),
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("scope", AUTHORIZE_SCOPES),
                ("state", state),
            ],
        )
        .map_err(|e| SpotifyError::Url(e.to_string()))?;
        Ok(url.into())
    }

    #[instrument(skip(self, code, state))]
    async fn exchange_code(&self, code: &str, state: &str) -> Result<TokenGrant, SpotifyError> {
        self.request_token(
            "exchange_code",
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("state", state),
            ],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn client_credentials_token(&self) -> Result<TokenGrant, SpotifyError> {
        self.request_token("client_credentials", &[("grant_type", "client_credentials")])
            .await
    }

    #[instrument(skip_all)]
    async fn current_user(&self, access_token: &str) -> Result<UserProfile, SpotifyError> {
        let url = self.api_url("/me");
        self.send_json("current_user", || self.http.get(&url).bearer_auth(access_token))
            .await
    }

    #[instrument(skip_all)]
    async fn top_artists(&self, access_token: &str) -> Result<Vec<Artist>, SpotifyError> {
        let url = self.api_url("/me/top/artists");
        let page: Paging<SpotifyArtist> = self
            .send_json("top_artists", || {
                self.http
                    .get(&url)
                    .query(&[("limit", TOP_ARTISTS_LIMIT)])
                    .bearer_auth(access_token)
            })
            .await?;
        Ok(page.into_items().map(Artist::from).collect())
    }

    #[instrument(skip(self, access_token))]
    async fn search_artists(
        &self,
        term: &str,
        limit: u32,
        offset: u32,
        access_token: &str,
        market: Option<&str>,
    ) -> Result<Vec<Artist>, SpotifyError> {
        let url = self.api_url("/search");
        let limit = limit.to_string();
        let offset = offset.to_string();
        let response: SearchArtistsResponse = self
            .send_json("search_artists", || {
                let mut query = vec![
                    ("q", term),
                    ("type", "artist"),
                    ("limit", limit.as_str()),
                    ("offset", offset.as_str()),
                ];
                if let Some(market) = market {
                    query.push(("market", market));
                }
                self.http.get(&url).query(&query).bearer_auth(access_token)
            })
            .await?;
        Ok(response.artists.into_items().map(Artist::from).collect())
    }
}

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::{Artist, ArtistImage, DatabaseConfig, SpotifyConfig};
use reqwest::Client;
use sea_orm::{
    ColumnTrait, ConnectOptions, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde_json::Value;
use spotify::{CatalogApi, SpotifyError, TokenGrant, UserProfile};

use server::catalog::CatalogStore;
use server::config::{AppConfig, CatalogConfig, CorsConfig, ServerConfig};
use server::entity::user_artist;
use server::state::AppState;

pub mod routes {
    pub const AUTH_URL: &str = "/api/v1/auth/url";
    pub const AUTH_TOKEN: &str = "/api/v1/auth/token";
    pub const TOP_ARTISTS: &str = "/api/v1/artists/top";
    pub const SELECTED_ARTISTS: &str = "/api/v1/artists/selected";
    pub const USER_COUNT: &str = "/api/v1/users/count";

    pub fn search(query: &str) -> String {
        format!("/api/v1/artists/search?query={query}")
    }
}

/// Scripted stand-in for the external catalog.
#[derive(Default)]
pub struct FakeCatalogApi {
    pub profile_id: Mutex<String>,
    pub top_artists: Mutex<Vec<Artist>>,
    pub search_results: Mutex<Vec<Artist>>,
    pub fail_search: AtomicBool,
    pub reject_user_token: AtomicBool,
    pub search_calls: AtomicU32,
    pub top_artist_calls: AtomicU32,
    pub tokens_issued: AtomicU32,
}

impl FakeCatalogApi {
    pub fn set_profile(&self, id: &str) {
        *self.profile_id.lock().unwrap() = id.to_string();
    }

    pub fn set_top_artists(&self, artists: Vec<Artist>) {
        *self.top_artists.lock().unwrap() = artists;
    }

    pub fn set_search_results(&self, artists: Vec<Artist>) {
        *self.search_results.lock().unwrap() = artists;
    }

    pub fn search_calls(&self) -> u32 {
        self.search_calls.load(Ordering::SeqCst)
    }
}

fn unauthorized() -> SpotifyError {
    SpotifyError::Client {
        status: 401,
        body: "The access token expired".into(),
    }
}

#[async_trait]
impl CatalogApi for FakeCatalogApi {
    fn authorize_url(&self, state: &str) -> Result<String, SpotifyError> {
        Ok(format!(
            "https://accounts.example.test/authorize?client_id=test&state={state}"
        ))
    }

    async fn exchange_code(&self, code: &str, _state: &str) -> Result<TokenGrant, SpotifyError> {
        if code == "expired-code" {
            return Err(SpotifyError::Client {
                status: 400,
                body: "invalid_grant".into(),
            });
        }
        Ok(TokenGrant {
            access_token: format!("user-token-for-{code}"),
            token_type: "Bearer".into(),
            refresh_token: Some("refresh".into()),
            expires_in: 3600,
            scope: Some("user-top-read user-read-email".into()),
        })
    }

    async fn client_credentials_token(&self) -> Result<TokenGrant, SpotifyError> {
        self.tokens_issued.fetch_add(1, Ordering::SeqCst);
        Ok(TokenGrant {
            access_token: "app-token".into(),
            token_type: "Bearer".into(),
            refresh_token: None,
            expires_in: 3600,
            scope: None,
        })
    }

    async fn current_user(&self, _access_token: &str) -> Result<UserProfile, SpotifyError> {
        if self.reject_user_token.load(Ordering::SeqCst) {
            return Err(unauthorized());
        }
        Ok(UserProfile {
            id: self.profile_id.lock().unwrap().clone(),
            email: Some("fan@example.com".into()),
            display_name: None,
        })
    }

    async fn top_artists(&self, _access_token: &str) -> Result<Vec<Artist>, SpotifyError> {
        self.top_artist_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_user_token.load(Ordering::SeqCst) {
            return Err(unauthorized());
        }
        Ok(self.top_artists.lock().unwrap().clone())
    }

    async fn search_artists(
        &self,
        _term: &str,
        limit: u32,
        _offset: u32,
        _access_token: &str,
        _market: Option<&str>,
    ) -> Result<Vec<Artist>, SpotifyError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(SpotifyError::Exhausted {
                attempts: 3,
                last: Box::new(SpotifyError::Server {
                    status: 503,
                    body: String::new(),
                }),
            });
        }
        let results = self.search_results.lock().unwrap();
        Ok(results.iter().take(limit as usize).cloned().collect())
    }
}

/// A running test server over a private in-memory database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub catalog: Arc<FakeCatalogApi>,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(CatalogConfig::default()).await
    }

    pub async fn spawn_with(catalog_config: CatalogConfig) -> Self {
        // A single connection keeps every query on the same in-memory database.
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = server::database::connect(opts)
            .await
            .expect("Failed to initialize test database");
        server::database::ensure_indexes(&db)
            .await
            .expect("Failed to create indexes");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
            },
            spotify: SpotifyConfig::with_credentials("test-client", "test-secret"),
            catalog: catalog_config,
        };

        let catalog = Arc::new(FakeCatalogApi::default());
        catalog.set_profile("spotify-user-1");

        let state = AppState::new(db.clone(), app_config, catalog.clone());
        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            catalog,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub fn store(&self) -> CatalogStore<'_, DatabaseConnection> {
        CatalogStore::new(&self.db)
    }

    /// The user's links in rank order.
    pub async fn links_for_user(&self, user_id: i32) -> Vec<user_artist::Model> {
        user_artist::Entity::find()
            .filter(user_artist::Column::UserId.eq(user_id))
            .order_by_asc(user_artist::Column::Rank)
            .all(&self.db)
            .await
            .expect("Failed to load links")
    }

    /// Put artists straight into the catalog.
    pub async fn seed_artists(&self, artists: &[Artist]) {
        for artist in artists {
            self.store()
                .insert_artist_if_absent(artist)
                .await
                .expect("Failed to seed artist");
        }
    }

    pub async fn user_count(&self) -> u64 {
        self.store()
            .count_users()
            .await
            .expect("Failed to count users")
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}

/// A fully populated artist.
pub fn artist(id: &str, name: &str, popularity: i32) -> Artist {
    Artist {
        id: id.to_string(),
        name: name.to_string(),
        genres: vec!["indie rock".to_string()],
        images: vec![ArtistImage {
            url: format!("https://i.example.test/{id}.jpg"),
            height: Some(640),
            width: Some(640),
        }],
        popularity,
        spotify_url: format!("https://open.spotify.com/artist/{id}"),
    }
}

/// Contact fields shared by both save requests.
pub fn contact() -> Value {
    serde_json::json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "number": "+1 555 0100",
    })
}

/// `contact()` merged with `extra`.
pub fn with_contact(extra: Value) -> Value {
    let mut body = contact();
    if let (Some(base), Value::Object(extra)) = (body.as_object_mut(), extra) {
        base.extend(extra);
    }
    body
}

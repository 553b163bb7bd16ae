//! Client for the external music catalog (Spotify Web API).
//!
//! Every call goes through the retry policy in [`common::retry`]: network
//! errors, undecodable bodies and 5xx responses are retried with exponential
//! backoff, 4xx responses are returned immediately.

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod token;

pub use api::CatalogApi;
pub use client::SpotifyClient;
pub use error::SpotifyError;
pub use models::{TokenGrant, UserProfile};
pub use token::{ClientToken, TokenCache};

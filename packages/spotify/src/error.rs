use common::retry::{RetryFailure, Transient};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("could not make request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("could not decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("catalog API returned server error: {status}, body: {body}")]
    Server { status: u16, body: String },

    #[error("catalog API returned client error: {status}, body: {body}")]
    Client { status: u16, body: String },

    #[error("all {attempts} attempts failed, last error: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<SpotifyError>,
    },

    #[error("invalid URL: {0}")]
    Url(String),
}

impl SpotifyError {
    /// HTTP status of the response that caused this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SpotifyError::Server { status, .. } | SpotifyError::Client { status, .. } => {
                Some(*status)
            }
            SpotifyError::Request(e) => e.status().map(|s| s.as_u16()),
            SpotifyError::Exhausted { last, .. } => last.status(),
            SpotifyError::Decode(_) | SpotifyError::Url(_) => None,
        }
    }
}

impl Transient for SpotifyError {
    fn is_transient(&self) -> bool {
        match self {
            SpotifyError::Request(e) => !e.is_builder(),
            SpotifyError::Decode(_) | SpotifyError::Server { .. } => true,
            SpotifyError::Client { .. } | SpotifyError::Exhausted { .. } | SpotifyError::Url(_) => {
                false
            }
        }
    }
}

impl From<RetryFailure<SpotifyError>> for SpotifyError {
    fn from(failure: RetryFailure<SpotifyError>) -> Self {
        match failure {
            RetryFailure::Permanent(e) => e,
            RetryFailure::Exhausted { attempts, last } => SpotifyError::Exhausted {
                attempts,
                last: Box::new(last),
            },
        }
    }
}

//! Catalog store, upsert & linking engine, admission gate and hybrid search.

pub mod admission;
pub mod error;
pub mod linking;
pub mod search;
pub mod store;

pub use admission::{AdmissionError, AdmissionGate};
pub use error::CatalogError;
pub use linking::{LinkingService, RankedArtist, SaveOutcome};
pub use search::{ArtistSearchService, SearchPage};
pub use store::{CatalogStore, UpsertOutcome};

/// Contact details submitted with either save path.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

use sea_orm::{ConnectionTrait, DbErr};
use thiserror::Error;
use tracing::warn;

use super::store::CatalogStore;

#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("maximum number of users reached for this round ({count}/{cap})")]
    Exhausted { count: u64, cap: u64 },

    #[error("failed to count users: {0}")]
    Count(#[from] DbErr),
}

/// Per-round cap on registered users.
///
/// The count is read outside the save transaction, so concurrent saves can
/// overshoot the cap by the number of requests in flight.
#[derive(Debug, Clone, Copy)]
pub struct AdmissionGate {
    cap: u64,
}

impl AdmissionGate {
    pub fn new(cap: u64) -> Self {
        Self { cap }
    }

    pub fn cap(&self) -> u64 {
        self.cap
    }

    /// Reject when `count >= cap`. Returns the current count otherwise.
    pub async fn check<C: ConnectionTrait>(&self, conn: &C) -> Result<u64, AdmissionError> {
        let count = CatalogStore::new(conn).count_users().await?;
        if count >= self.cap {
            warn!(count, cap = self.cap, "User cap reached, rejecting save");
            return Err(AdmissionError::Exhausted {
                count,
                cap: self.cap,
            });
        }
        Ok(count)
    }
}

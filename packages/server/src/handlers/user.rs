use axum::{Json, extract::State};
use tracing::instrument;

use crate::catalog::CatalogStore;
use crate::error::{AppError, ErrorBody};
use crate::models::user::UserCountResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/count",
    tag = "Users",
    operation_id = "getUserCount",
    summary = "Registered users in the current round",
    responses(
        (status = 200, description = "Current count and cap", body = UserCountResponse),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn user_count(State(state): State<AppState>) -> Result<Json<UserCountResponse>, AppError> {
    let count = CatalogStore::new(&state.db).count_users().await?;

    Ok(Json(UserCountResponse {
        count,
        max_users: state.admission.cap(),
    }))
}

use axum::{Json, extract::State};
use rand::RngCore;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::auth::{
    AuthUrlResponse, ExchangeTokenRequest, ExchangeTokenResponse, validate_exchange_token,
};
use crate::state::AppState;

/// Random CSRF state for the authorize redirect: 32 bytes, hex encoded.
fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[utoipa::path(
    get,
    path = "/url",
    tag = "Auth",
    operation_id = "getAuthUrl",
    summary = "Build the external authorization URL",
    description = "Returns the URL the user must visit to grant read access to their top artists and e-mail, plus the random `state` the callback will carry.",
    responses(
        (status = 200, description = "Authorization URL", body = AuthUrlResponse),
        (status = 502, description = "Could not build the URL (UPSTREAM_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn auth_url(State(state): State<AppState>) -> Result<Json<AuthUrlResponse>, AppError> {
    let csrf_state = generate_state();
    let url = state.catalog_api.authorize_url(&csrf_state)?;

    Ok(Json(AuthUrlResponse {
        url,
        state: csrf_state,
    }))
}

#[utoipa::path(
    post,
    path = "/token",
    tag = "Auth",
    operation_id = "exchangeToken",
    summary = "Exchange an authorization code for user tokens",
    request_body = ExchangeTokenRequest,
    responses(
        (status = 200, description = "User tokens", body = ExchangeTokenResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 502, description = "Identity provider failure (UPSTREAM_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn exchange_token(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ExchangeTokenRequest>,
) -> Result<Json<ExchangeTokenResponse>, AppError> {
    validate_exchange_token(&payload)?;

    let grant = state
        .catalog_api
        .exchange_code(&payload.code, &payload.state)
        .await?;

    Ok(Json(grant.into()))
}

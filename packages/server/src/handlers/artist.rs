use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use crate::catalog::LinkingService;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::artist::{
    ArtistSearchQuery, ArtistSearchResponse, SaveSelectedArtistsRequest,
    SaveSelectedArtistsResponse, SaveTopArtistsRequest, SaveTopArtistsResponse,
    validate_save_selected_artists, validate_save_top_artists,
};
use crate::models::shared::require_non_empty;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/top",
    tag = "Artists",
    operation_id = "saveTopArtists",
    summary = "Harvest and save the caller's top artists",
    description = "Fetches the profile and top artists of the user owning `access_token`, then saves the user and replaces their ranked artist links in one transaction. Resubmitting replaces the previous list. Rejected when the round's user cap is reached.",
    request_body = SaveTopArtistsRequest,
    responses(
        (status = 200, description = "Saved; lists artists new to the catalog", body = SaveTopArtistsResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Access token rejected (TOKEN_INVALID)", body = ErrorBody),
        (status = 429, description = "User cap reached (RESOURCE_EXHAUSTED)", body = ErrorBody),
        (status = 502, description = "External catalog failure (UPSTREAM_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(spotify_user_id))]
pub async fn save_top_artists(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SaveTopArtistsRequest>,
) -> Result<Json<SaveTopArtistsResponse>, AppError> {
    validate_save_top_artists(&payload)?;
    state.admission.check(&state.db).await?;

    let profile = state.catalog_api.current_user(&payload.access_token).await?;
    let artists = state.catalog_api.top_artists(&payload.access_token).await?;
    tracing::Span::current().record("spotify_user_id", profile.id.as_str());

    let outcome = LinkingService::new(&state.db)
        .save_user_top_artists(&payload.user_info(), &profile.id, &artists)
        .await?;

    Ok(Json(SaveTopArtistsResponse {
        user_id: outcome.user_id,
        new_artists: outcome.new_artists,
    }))
}

#[utoipa::path(
    post,
    path = "/selected",
    tag = "Artists",
    operation_id = "saveSelectedArtists",
    summary = "Save a hand-picked artist list for a new user",
    description = "Creates a new user and links the given catalog artists in the given order. Every ID must already be in the catalog. Rejected when the round's user cap is reached.",
    request_body = SaveSelectedArtistsRequest,
    responses(
        (status = 200, description = "Saved; returns the linked artists", body = SaveSelectedArtistsResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Unknown artist ID (NOT_FOUND)", body = ErrorBody),
        (status = 429, description = "User cap reached (RESOURCE_EXHAUSTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(artists = payload.artist_ids.len()))]
pub async fn save_selected_artists(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SaveSelectedArtistsRequest>,
) -> Result<Json<SaveSelectedArtistsResponse>, AppError> {
    validate_save_selected_artists(&payload)?;
    state.admission.check(&state.db).await?;

    let outcome = LinkingService::new(&state.db)
        .save_user_selected_artists(&payload.user_info(), &payload.artist_ids)
        .await?;

    Ok(Json(SaveSelectedArtistsResponse {
        user_id: outcome.user_id,
        artists: outcome.linked.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/search",
    tag = "Artists",
    operation_id = "searchArtists",
    summary = "Search the artist catalog by name",
    description = "Case-insensitive substring search over the local catalog, ordered by name. When fewer than five local artists match, the first page of external results is merged in (local entries win) and new artists are added to the catalog in the background. External failures fall back to local results.",
    params(ArtistSearchQuery),
    responses(
        (status = 200, description = "Matching artists", body = ArtistSearchResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(query = %query.query))]
pub async fn search_artists(
    State(state): State<AppState>,
    Query(query): Query<ArtistSearchQuery>,
) -> Result<Json<ArtistSearchResponse>, AppError> {
    require_non_empty(&query.query, "query")?;

    let catalog = &state.config.catalog;
    let limit = match query.limit {
        None | Some(0) => catalog.default_search_limit,
        Some(limit) => limit.min(catalog.max_search_limit),
    };
    let offset = query.offset.unwrap_or(0);

    let page = state
        .search
        .search(query.query.trim(), limit, offset)
        .await?;

    Ok(Json(ArtistSearchResponse {
        artists: page.artists,
        total: page.total,
    }))
}

use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/artists", artist_routes())
        .nest("/users", user_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::auth_url))
        .routes(routes!(handlers::auth::exchange_token))
}

fn artist_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::artist::save_top_artists))
        .routes(routes!(handlers::artist::save_selected_artists))
        .routes(routes!(handlers::artist::search_artists))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::user::user_count))
}

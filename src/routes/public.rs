use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::game::{CatalogResponse, PublicView},
    services::game_service,
    state::SharedState,
};

/// Public read-only endpoints for audience screens.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/public/game", get(get_public_game))
        .route("/catalog", get(get_catalog))
}

#[utoipa::path(
    get,
    path = "/public/game",
    tag = "public",
    responses((status = 200, description = "Audience view of the game", body = PublicView))
)]
/// Return the game with the current song hidden until it is revealed.
pub async fn get_public_game(State(state): State<SharedState>) -> Json<PublicView> {
    Json(game_service::public_view(&state).await)
}

#[utoipa::path(
    get,
    path = "/catalog",
    tag = "public",
    responses((status = 200, description = "Loaded song catalog", body = CatalogResponse))
)]
/// List every song of the catalog.
pub async fn get_catalog(State(state): State<SharedState>) -> Json<CatalogResponse> {
    Json(game_service::catalog_listing(&state))
}

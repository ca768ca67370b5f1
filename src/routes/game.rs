use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        game::{HostView, LookupResponse},
        host::{
            ActionResponse, ActiveTeamRequest, AddPlayerRequest, ChallengeRequest,
            ChallengeRuleRequest, DrawRequest, PlaceRequest, RenameRequest, RoundRuleRequest,
            SwitchModeRequest,
        },
    },
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Host control endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game", get(get_game))
        .route("/game/draw", post(draw))
        .route("/game/reveal", post(reveal))
        .route("/game/place", post(place))
        .route("/game/challenge", post(challenge))
        .route("/game/players", post(add_player))
        .route("/game/participants/{id}", put(rename_participant))
        .route("/game/mode", post(switch_mode))
        .route("/game/rules/round", put(set_round_rule))
        .route("/game/rules/active-team", put(set_active_team))
        .route("/game/rules/challenge", put(set_challenge_rule))
        .route("/game/reset", post(reset))
        .route("/game/lookup", get(lookup))
}

#[utoipa::path(
    get,
    path = "/game",
    tag = "host",
    responses((status = 200, description = "Host view of the game", body = HostView))
)]
/// Return the game as the host screen renders it.
pub async fn get_game(State(state): State<SharedState>) -> Json<HostView> {
    Json(game_service::host_view(&state).await)
}

#[utoipa::path(
    post,
    path = "/game/draw",
    tag = "host",
    request_body = DrawRequest,
    responses((status = 200, description = "Draw outcome", body = ActionResponse))
)]
/// Draw the next song, optionally restricted to one difficulty.
pub async fn draw(
    State(state): State<SharedState>,
    Json(payload): Json<DrawRequest>,
) -> Json<ActionResponse> {
    Json(game_service::draw(&state, payload.difficulty).await)
}

#[utoipa::path(
    post,
    path = "/game/reveal",
    tag = "host",
    responses((status = 200, description = "Reveal outcome", body = ActionResponse))
)]
/// Disclose the current song's title, artist and year.
pub async fn reveal(State(state): State<SharedState>) -> Json<ActionResponse> {
    Json(game_service::reveal(&state).await)
}

#[utoipa::path(
    post,
    path = "/game/place",
    tag = "host",
    request_body = PlaceRequest,
    responses((status = 200, description = "Placement outcome", body = ActionResponse))
)]
/// Drop the current song on a timeline slot and judge it.
pub async fn place(
    State(state): State<SharedState>,
    Json(payload): Json<PlaceRequest>,
) -> Json<ActionResponse> {
    Json(game_service::place(&state, payload.participant_id, payload.insert_index).await)
}

#[utoipa::path(
    post,
    path = "/game/challenge",
    tag = "host",
    request_body = ChallengeRequest,
    responses((status = 200, description = "Challenge outcome", body = ActionResponse))
)]
/// Apply or decline the objection against the last placement.
pub async fn challenge(
    State(state): State<SharedState>,
    Json(payload): Json<ChallengeRequest>,
) -> Json<ActionResponse> {
    Json(game_service::resolve_challenge(&state, payload.applied, payload.challenger_id).await)
}

#[utoipa::path(
    post,
    path = "/game/players",
    tag = "host",
    request_body = AddPlayerRequest,
    responses(
        (status = 200, description = "Player added or ignored", body = ActionResponse),
        (status = 400, description = "Name too long")
    )
)]
/// Add a player to an individual game.
pub async fn add_player(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<AddPlayerRequest>>,
) -> Json<ActionResponse> {
    Json(game_service::add_player(&state, payload.name).await)
}

#[utoipa::path(
    put,
    path = "/game/participants/{id}",
    tag = "host",
    params(("id" = Uuid, Path, description = "Player or team identifier")),
    request_body = RenameRequest,
    responses(
        (status = 200, description = "Participant renamed or ignored", body = ActionResponse),
        (status = 400, description = "Name too long")
    )
)]
/// Rename a player or team.
pub async fn rename_participant(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<RenameRequest>>,
) -> Json<ActionResponse> {
    Json(game_service::rename_participant(&state, id, payload.name).await)
}

#[utoipa::path(
    post,
    path = "/game/mode",
    tag = "host",
    request_body = SwitchModeRequest,
    responses((status = 200, description = "Fresh game in the requested mode", body = ActionResponse))
)]
/// Discard the game and start a new one in the requested mode.
pub async fn switch_mode(
    State(state): State<SharedState>,
    Json(payload): Json<SwitchModeRequest>,
) -> Json<ActionResponse> {
    Json(game_service::switch_mode(&state, payload.mode).await)
}

#[utoipa::path(
    put,
    path = "/game/rules/round",
    tag = "host",
    request_body = RoundRuleRequest,
    responses((status = 200, description = "Round rule updated or ignored", body = ActionResponse))
)]
/// Change who may place each song in teams mode.
pub async fn set_round_rule(
    State(state): State<SharedState>,
    Json(payload): Json<RoundRuleRequest>,
) -> Json<ActionResponse> {
    Json(game_service::set_round_rule(&state, payload.round_rule).await)
}

#[utoipa::path(
    put,
    path = "/game/rules/active-team",
    tag = "host",
    request_body = ActiveTeamRequest,
    responses((status = 200, description = "Active team updated or ignored", body = ActionResponse))
)]
/// Hand the turn to another team.
pub async fn set_active_team(
    State(state): State<SharedState>,
    Json(payload): Json<ActiveTeamRequest>,
) -> Json<ActionResponse> {
    Json(game_service::set_active_team(&state, payload.team_id).await)
}

#[utoipa::path(
    put,
    path = "/game/rules/challenge",
    tag = "host",
    request_body = ChallengeRuleRequest,
    responses((status = 200, description = "Challenge rule updated or ignored", body = ActionResponse))
)]
/// Change the penalty for failed challenges.
pub async fn set_challenge_rule(
    State(state): State<SharedState>,
    Json(payload): Json<ChallengeRuleRequest>,
) -> Json<ActionResponse> {
    Json(game_service::set_challenge_rule(&state, payload.challenge_rule).await)
}

#[utoipa::path(
    post,
    path = "/game/reset",
    tag = "host",
    responses((status = 200, description = "Fresh game in the current mode", body = ActionResponse))
)]
/// Discard the game and start over in the same mode.
pub async fn reset(State(state): State<SharedState>) -> Json<ActionResponse> {
    Json(game_service::reset(&state).await)
}

#[utoipa::path(
    get,
    path = "/game/lookup",
    tag = "host",
    responses(
        (status = 200, description = "Search link for the current song", body = LookupResponse),
        (status = 404, description = "No song is drawn")
    )
)]
/// Build the video search link for the current song.
pub async fn lookup(State(state): State<SharedState>) -> Result<Json<LookupResponse>, AppError> {
    let payload = game_service::lookup_current_song(&state).await?;
    Ok(Json(payload))
}

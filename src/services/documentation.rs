use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI document for Hitster Host Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::sse::host_stream,
        crate::routes::game::get_game,
        crate::routes::game::draw,
        crate::routes::game::reveal,
        crate::routes::game::place,
        crate::routes::game::challenge,
        crate::routes::game::add_player,
        crate::routes::game::rename_participant,
        crate::routes::game::switch_mode,
        crate::routes::game::set_round_rule,
        crate::routes::game::set_active_team,
        crate::routes::game::set_challenge_rule,
        crate::routes::game::reset,
        crate::routes::game::lookup,
        crate::routes::public::get_public_game,
        crate::routes::public::get_catalog,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::sse::Handshake,
            crate::dto::game::HostView,
            crate::dto::game::PublicView,
            crate::dto::game::CatalogResponse,
            crate::dto::game::LookupResponse,
            crate::dto::host::ActionResponse,
            crate::dto::host::DrawRequest,
            crate::dto::host::PlaceRequest,
            crate::dto::host::ChallengeRequest,
            crate::dto::host::AddPlayerRequest,
            crate::dto::host::RenameRequest,
            crate::dto::host::SwitchModeRequest,
            crate::dto::host::RoundRuleRequest,
            crate::dto::host::ActiveTeamRequest,
            crate::dto::host::ChallengeRuleRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "host", description = "Host controls driving the game"),
        (name = "public", description = "Read-only views for audience screens"),
    )
)]
pub struct ApiDoc;

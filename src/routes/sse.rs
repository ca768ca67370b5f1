use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{
    services::{
        sse_events::initial_events,
        sse_service::{self, StreamKind},
    },
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/sse/public",
    tag = "sse",
    responses((status = 200, description = "Public SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream audience views after every applied host action.
pub async fn public_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe_public(&state);
    info!("New public SSE connection");
    let initial = initial_events(&state, StreamKind::Public).await;
    sse_service::to_sse_stream(receiver, StreamKind::Public, initial)
}

#[utoipa::path(
    get,
    path = "/sse/host",
    tag = "sse",
    responses((status = 200, description = "Host SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream host views after every applied host action.
pub async fn host_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe_host(&state);
    info!("New host SSE connection");
    let initial = initial_events(&state, StreamKind::Host).await;
    sse_service::to_sse_stream(receiver, StreamKind::Host, initial)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/sse/public", get(public_stream))
        .route("/sse/host", get(host_stream))
}

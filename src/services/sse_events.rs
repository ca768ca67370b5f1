use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        game::PublicView,
        sse::{Handshake, ServerEvent},
    },
    services::{game_service::build_host_view, sse_service::StreamKind},
    state::{SharedState, SseHub, game::GameState},
};

/// Full game view, sent after every applied host action.
pub const EVENT_GAME_STATE: &str = "game.state";
/// First event of every stream.
pub const EVENT_HANDSHAKE: &str = "handshake";

/// Broadcast the host and audience views of `game`.
pub fn broadcast_game_state(state: &SharedState, game: &GameState) {
    send_event(
        state.host_sse(),
        EVENT_GAME_STATE,
        &build_host_view(state, game),
    );
    send_event(
        state.public_sse(),
        EVENT_GAME_STATE,
        &PublicView::new(game, state.catalog()),
    );
}

/// Events a freshly connected client receives before any broadcast: a
/// handshake followed by the current view of its stream.
pub async fn initial_events(state: &SharedState, kind: StreamKind) -> Vec<ServerEvent> {
    let handshake = Handshake {
        stream: kind.as_str().to_string(),
        message: format!("{} stream connected", kind.as_str()),
    };
    let game = state.snapshot().await;
    let view = match kind {
        StreamKind::Host => ServerEvent::json(
            Some(EVENT_GAME_STATE.to_string()),
            &build_host_view(state, &game),
        ),
        StreamKind::Public => ServerEvent::json(
            Some(EVENT_GAME_STATE.to_string()),
            &PublicView::new(&game, state.catalog()),
        ),
    };

    [
        ServerEvent::json(Some(EVENT_HANDSHAKE.to_string()), &handshake),
        view,
    ]
    .into_iter()
    .filter_map(|event| {
        event
            .inspect_err(|err| {
                warn!(stream = kind.as_str(), error = %err, "failed to serialize SSE payload")
            })
            .ok()
    })
    .collect()
}

fn send_event(hub: &SseHub, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}

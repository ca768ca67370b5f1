use crate::{
    services::sse_events::broadcast_game_state,
    state::{SharedState, TransitionOutcome, state_machine::GameEvent},
};

/// Run a host action through the state machine, then push the new views to SSE subscribers.
///
/// Nothing is broadcast when the action was ignored.
pub async fn run_transition_with_broadcast(
    state: &SharedState,
    event: GameEvent,
) -> TransitionOutcome {
    let outcome = state.run_transition(event).await;
    if outcome.applied() {
        broadcast_game_state(state, &outcome.state);
    }
    outcome
}

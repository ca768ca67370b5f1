use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether the snapshot store is readable.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let songs = state.catalog().len();
    match state.store().load().await {
        Ok(_) => HealthResponse::ok(songs),
        Err(err) => {
            warn!(error = %err, "snapshot store health check failed");
            HealthResponse::degraded(songs)
        }
    }
}

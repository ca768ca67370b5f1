use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Number of songs in the loaded catalog.
    pub songs: usize,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(songs: usize) -> Self {
        Self {
            status: "ok".to_string(),
            songs,
        }
    }

    /// Create a health response indicating the snapshot store cannot be read.
    pub fn degraded(songs: usize) -> Self {
        Self {
            status: "degraded".to_string(),
            songs,
        }
    }
}

/// OpenAPI documentation generation.
pub mod documentation;
/// Host actions and game views.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Links to the external video site.
pub mod lookup;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;

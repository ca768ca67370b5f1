use axum::Router;

use crate::state::SharedState;

pub mod docs;
pub mod game;
pub mod health;
pub mod public;
pub mod sse;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(public::router())
        .merge(game::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::state::tests::test_state;

    async fn call(
        app: &Router<()>,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn host_flow_over_http() {
        let (state, _store) = test_state().await;
        let app = router(state);

        let (status, body) =
            call(&app, "POST", "/game/players", Some(json!({ "name": "Mina" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], true);
        let mina = body["game"]["participants"][0]["id"].as_str().unwrap().to_string();

        let (_, body) =
            call(&app, "POST", "/game/draw", Some(json!({ "difficulty": "hard" }))).await;
        assert_eq!(body["game"]["deck"]["used"], 1);
        assert_eq!(body["game"]["participants"][0]["can_place"], true);

        let (_, body) = call(
            &app,
            "POST",
            "/game/place",
            Some(json!({ "participant_id": mina, "insert_index": 0 })),
        )
        .await;
        assert_eq!(body["applied"], true);
        assert_eq!(body["game"]["participants"][0]["score"], 1);

        let (status, body) = call(&app, "GET", "/game/lookup", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["url"].as_str().unwrap().contains("search_query="));

        let (_, body) = call(&app, "GET", "/public/game", None).await;
        assert_eq!(body["current_song"]["revealed"], true);
    }

    #[tokio::test]
    async fn ignored_actions_are_not_http_errors() {
        let (state, _store) = test_state().await;
        let app = router(state);

        let (status, body) = call(&app, "POST", "/game/reveal", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], false);
        assert!(body["reason"].is_string());

        let (status, body) = call(&app, "GET", "/game/lookup", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn overlong_names_are_rejected() {
        let (state, _store) = test_state().await;
        let app = router(state);

        let name = "x".repeat(65);
        let (status, _) =
            call(&app, "POST", "/game/players", Some(json!({ "name": name }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_and_catalog_are_served() {
        let (state, _store) = test_state().await;
        let app = router(state);

        let (status, body) = call(&app, "GET", "/healthcheck", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (_, body) = call(&app, "GET", "/catalog", None).await;
        assert_eq!(body["count"], 5);
    }
}

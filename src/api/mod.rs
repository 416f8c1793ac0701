//! Axum HTTP handlers.

pub mod codes;
pub mod indices;
pub mod organizations;
pub mod search;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;

use crate::search::gateway::GatewayError;
use crate::state::AppState;

/// All routes, bound to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Index lifecycle
        .route(
            "/indices/{name}",
            post(indices::create_index).delete(indices::delete_index),
        )
        // Organization documents
        .route("/organizations", post(organizations::create_organization))
        .route(
            "/organizations/bulk",
            post(organizations::bulk_add_organizations),
        )
        .route(
            "/organizations/{id}",
            put(organizations::put_organization).delete(organizations::delete_organization),
        )
        // Search
        .route("/api/search", post(search::search))
        .route("/api/survey", post(search::survey))
        .route("/api/info", get(indices::info))
        .route("/api/codes/ntee/{code}", get(codes::ntee_code))
        .with_state(state)
}

/// Engine errors keep the engine's own status and JSON body; anything else is a 502.
pub fn gateway_error(e: GatewayError) -> Response {
    match e {
        GatewayError::Engine { status, body } => {
            (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        other => {
            tracing::warn!("Elasticsearch request failed: {other}");
            (StatusCode::BAD_GATEWAY, other.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_text(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_engine_error_passes_through_as_json() {
        let resp = gateway_error(GatewayError::Engine {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"error":{"type":"parsing_exception"}}"#.to_string(),
        });
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(
            body_text(resp).await,
            r#"{"error":{"type":"parsing_exception"}}"#
        );
    }

    #[tokio::test]
    async fn test_other_errors_are_bad_gateway() {
        let resp = gateway_error(GatewayError::Decode("no hits".to_string()));
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert!(body_text(resp).await.contains("no hits"));
    }
}

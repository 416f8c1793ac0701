use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::api::gateway_error;
use crate::models::{CreateIndexRequest, IndexResponse};
use crate::search::gateway::IndexCreation;
use crate::state::AppState;

/// GET /api/info - Cluster info as reported by Elasticsearch
pub async fn info(State(state): State<AppState>) -> Result<Json<Value>, Response> {
    let info = state.gateway.info().await.map_err(gateway_error)?;
    Ok(Json(info))
}

/// POST /indices/:name - Create an index (no-op when it already exists)
pub async fn create_index(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<IndexResponse>), Response> {
    // The body is optional
    let req: CreateIndexRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateIndexRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| {
                (StatusCode::BAD_REQUEST, format!("Invalid request body: {e}")).into_response()
            })?
    };

    let outcome = state
        .gateway
        .create_index(&name, req.mappings.as_ref())
        .await
        .map_err(gateway_error)?;

    let status = match outcome {
        IndexCreation::Created => StatusCode::CREATED,
        IndexCreation::AlreadyExists => StatusCode::OK,
    };

    Ok((
        status,
        Json(IndexResponse {
            index: name,
            acknowledged: true,
            existed: outcome == IndexCreation::AlreadyExists,
        }),
    ))
}

/// DELETE /indices/:name - Delete an index; a missing index is not an error
pub async fn delete_index(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<IndexResponse>, Response> {
    let existed = state
        .gateway
        .delete_index(&name)
        .await
        .map_err(gateway_error)?;

    Ok(Json(IndexResponse {
        index: name,
        acknowledged: true,
        existed,
    }))
}

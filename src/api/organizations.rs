use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde_json::{Map, Value};

use crate::api::gateway_error;
use crate::models::{BulkRequest, BulkResponse, DocumentResponse};
use crate::state::AppState;

/// Pull the optional `id` out of a document body. Blank strings and non-scalar
/// values count as no id.
fn take_id(doc: &mut Map<String, Value>) -> Option<String> {
    match doc.remove("id")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// POST /organizations - Upsert when the body carries an `id`, append otherwise
pub async fn create_organization(
    State(state): State<AppState>,
    Json(mut doc): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<DocumentResponse>), Response> {
    let index = state.index();

    let written = match take_id(&mut doc) {
        Some(id) => state.gateway.upsert_document(index, &id, &doc).await,
        None => state.gateway.append_document(index, &doc).await,
    }
    .map_err(gateway_error)?;

    let status = if written.result == "updated" {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((
        status,
        Json(DocumentResponse {
            id: written.id,
            result: written.result,
        }),
    ))
}

/// PUT /organizations/:id - Insert or replace the organization stored under `id`
pub async fn put_organization(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut doc): Json<Map<String, Value>>,
) -> Result<Json<DocumentResponse>, Response> {
    // The path id wins over any id in the body
    doc.remove("id");

    let written = state
        .gateway
        .upsert_document(state.index(), &id, &doc)
        .await
        .map_err(gateway_error)?;

    Ok(Json(DocumentResponse {
        id: written.id,
        result: written.result,
    }))
}

/// DELETE /organizations/:id - Remove an organization; a missing one is not an error
pub async fn delete_organization(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, Response> {
    state
        .gateway
        .delete_document(state.index(), &id)
        .await
        .map_err(gateway_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /organizations/bulk - Append each organization under a generated id
pub async fn bulk_add_organizations(
    State(state): State<AppState>,
    Json(req): Json<BulkRequest>,
) -> Result<Json<BulkResponse>, Response> {
    let ids = state
        .gateway
        .bulk_append(state.index(), &req.organizations)
        .await
        .map_err(gateway_error)?;

    Ok(Json(BulkResponse {
        added: ids.len(),
        ids,
    }))
}

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde_json::Value;

use crate::api::gateway_error;
use crate::models::{SearchRequest, SurveyAnswer, SurveyResponse};
use crate::search::survey::translate;
use crate::state::AppState;

/// POST /api/search - Run a raw engine query with pagination, returning hits
/// in engine relevance order.
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<Vec<Value>>, Response> {
    let body = req.into_body();
    let hits = state
        .gateway
        .search(state.index(), &body)
        .await
        .map_err(gateway_error)?;
    Ok(Json(hits))
}

/// Positional survey answers from a request body. Anything other than an array
/// is treated as an empty survey.
pub fn parse_survey(body: Value) -> Vec<SurveyAnswer> {
    match body {
        Value::Array(items) => items.into_iter().map(SurveyAnswer::from_value).collect(),
        _ => Vec::new(),
    }
}

/// POST /api/survey - Translate survey answers into a query and run it
pub async fn survey(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<SurveyResponse>, Response> {
    let answers = parse_survey(body);
    let query = translate(&answers).to_json();
    tracing::debug!("Survey query: {query}");

    let results = state
        .gateway
        .search(state.index(), &query)
        .await
        .map_err(gateway_error)?;

    Ok(Json(SurveyResponse { query, results }))
}

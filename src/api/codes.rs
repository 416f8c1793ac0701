use axum::extract::{Path, State};
use axum::Json;

use crate::models::NteeCodeResponse;
use crate::state::AppState;

/// GET /api/codes/ntee/:code - Title, description and keywords for an NTEE code.
/// Unknown codes answer "Unknown code" with no keywords.
pub async fn ntee_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Json<NteeCodeResponse> {
    let ntee = &state.ntee;
    Json(NteeCodeResponse {
        code: code.trim().to_uppercase(),
        title: ntee.get_title(&code).to_string(),
        description: ntee.get_description(&code).to_string(),
        keywords: ntee.get_keywords(&code).to_vec(),
    })
}

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::Team;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub teams: Vec<Team>,
}

/// Team lookup by name. A blank query answers an empty list without calling
/// the backend.
pub async fn search_teams(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params.q.trim().to_string();
    let teams = if query.is_empty() {
        Vec::new()
    } else {
        state.backend.search_teams(&query).await?
    };

    Ok(Json(SearchResponse { query, teams }))
}

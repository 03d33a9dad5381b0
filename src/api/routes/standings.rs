use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use super::load_championship;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::championship_standings;
use crate::models::{ChampionshipId, StandingsRow};

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub championship_id: ChampionshipId,
    pub championship_name: String,
    pub standings: Vec<StandingsRow>,
}

pub async fn get_standings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let championship = load_championship(&state, &id).await?;
    let standings = championship_standings(&championship);

    Ok(Json(StandingsResponse {
        championship_id: championship.id,
        championship_name: championship.name,
        standings,
    }))
}

//! Match mutations. Each one is validated locally, sent to the backend, and
//! answered from a fresh re-fetch of the championship.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use super::load_championship;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{
    round_progress, validate_result, validate_schedule, ResultInput, RoundProgress, ScheduleInput,
};
use crate::models::{Championship, Match, MatchId};

#[derive(Debug, Serialize)]
pub struct MatchUpdateResponse {
    #[serde(rename = "match")]
    pub fixture: Match,
    pub progress: RoundProgress,
}

fn find_match(championship: &Championship, match_id: &str) -> Result<Match, ApiError> {
    championship
        .find_match(&MatchId::new(match_id))
        .cloned()
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "match {} in championship {}",
                match_id, championship.id
            ))
        })
}

async fn refreshed(
    state: &AppState,
    id: &str,
    match_id: &str,
) -> Result<Json<MatchUpdateResponse>, ApiError> {
    let championship = load_championship(state, id).await?;
    Ok(Json(MatchUpdateResponse {
        fixture: find_match(&championship, match_id)?,
        progress: round_progress(&championship),
    }))
}

pub async fn submit_result(
    State(state): State<AppState>,
    Path((id, match_id)): Path<(String, String)>,
    payload: Result<Json<ResultInput>, JsonRejection>,
) -> Result<Json<MatchUpdateResponse>, ApiError> {
    let Json(input) = payload?;
    let championship = load_championship(&state, &id).await?;
    let fixture = find_match(&championship, &match_id)?;

    let result = validate_result(&fixture, &input)?;
    state
        .backend
        .submit_result(&championship.id, &fixture.id, &result)
        .await?;
    info!(
        "Recorded {}-{} for match {} in championship {}",
        result.goals_a, result.goals_b, fixture.id, championship.id
    );

    refreshed(&state, &id, &match_id).await
}

pub async fn schedule_match(
    State(state): State<AppState>,
    Path((id, match_id)): Path<(String, String)>,
    payload: Result<Json<ScheduleInput>, JsonRejection>,
) -> Result<Json<MatchUpdateResponse>, ApiError> {
    let Json(schedule) = payload?;
    validate_schedule(&schedule)?;

    let championship = load_championship(&state, &id).await?;
    let fixture = find_match(&championship, &match_id)?;
    state
        .backend
        .schedule_match(&championship.id, &fixture.id, &schedule)
        .await?;

    refreshed(&state, &id, &match_id).await
}

pub async fn next_round(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RoundProgress>, ApiError> {
    let championship = load_championship(&state, &id).await?;
    let progress = round_progress(&championship);

    if !progress.can_request_next_round {
        let reason = if progress.tournament_finished {
            "the tournament is finished".to_string()
        } else if !championship.status.is_open() {
            format!("the championship is {}", championship.status)
        } else if progress.round_complete {
            "the final has no next round".to_string()
        } else {
            format!(
                "{} of {} matches finished in the active round",
                progress.finished_matches, progress.total_matches
            )
        };
        return Err(ApiError::Conflict(format!(
            "Cannot generate next round: {}",
            reason
        )));
    }

    state.backend.request_next_round(&championship.id).await?;
    info!("Generated next round for championship {}", championship.id);

    let championship = load_championship(&state, &id).await?;
    Ok(Json(round_progress(&championship)))
}

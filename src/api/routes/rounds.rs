use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use super::load_championship;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{build_bracket, group_by_round, is_round_complete, round_progress};
use crate::calculate::{BracketView, RoundProgress};
use crate::models::{Match, Round};

#[derive(Debug, Serialize)]
pub struct RoundView {
    pub round: Round,
    pub priority: u8,
    pub active: bool,
    pub complete: bool,
    pub finished_matches: usize,
    pub matches: Vec<Match>,
}

#[derive(Debug, Serialize)]
pub struct RoundsResponse {
    pub active_round: Option<Round>,
    pub rounds: Vec<RoundView>,
}

/// Rounds ordered by elimination proximity, final first.
pub async fn get_rounds(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RoundsResponse>, ApiError> {
    let championship = load_championship(&state, &id).await?;
    let groups = group_by_round(&championship.matches);
    let active_round = groups.active().map(|g| g.round.clone());

    let rounds = groups
        .ranked()
        .into_iter()
        .map(|group| RoundView {
            round: group.round.clone(),
            priority: group.priority(),
            active: active_round.as_ref() == Some(&group.round),
            complete: is_round_complete(&group.matches),
            finished_matches: group.finished_count(),
            matches: group.matches.iter().map(|m| (*m).clone()).collect(),
        })
        .collect();

    Ok(Json(RoundsResponse {
        active_round,
        rounds,
    }))
}

pub async fn get_bracket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BracketView>, ApiError> {
    let championship = load_championship(&state, &id).await?;
    Ok(Json(build_bracket(&championship)))
}

pub async fn get_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RoundProgress>, ApiError> {
    let championship = load_championship(&state, &id).await?;
    Ok(Json(round_progress(&championship)))
}

#[cfg(test)]
mod tests {
    use crate::api::routes::test_support::{app, get_json};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_rounds_final_first() {
        let (status, json) = get_json(app(), "/api/championships/2/rounds").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["active_round"], "final");

        let rounds = json["rounds"].as_array().unwrap();
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0]["round"], "final");
        assert_eq!(rounds[0]["active"], true);
        assert_eq!(rounds[0]["complete"], false);
        assert_eq!(rounds[1]["round"], "semifinal");
        assert_eq!(rounds[1]["complete"], true);
        assert_eq!(rounds[1]["matches"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_progress_gate_open_after_semis() {
        let (status, json) = get_json(app(), "/api/championships/1/progress").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["active_round"], "semifinal");
        assert_eq!(json["round_complete"], true);
        assert_eq!(json["tournament_finished"], false);
        assert_eq!(json["can_request_next_round"], true);
    }

    #[tokio::test]
    async fn test_progress_finished_tournament() {
        let (_, json) = get_json(app(), "/api/championships/3/progress").await;

        assert_eq!(json["tournament_finished"], true);
        assert_eq!(json["final_outcome"]["state"], "decided");
        assert_eq!(json["can_request_next_round"], false);
    }

    #[tokio::test]
    async fn test_bracket_has_champion() {
        let (status, json) = get_json(app(), "/api/championships/3/bracket").await;

        assert_eq!(status, StatusCode::OK);
        let rounds = json["rounds"].as_array().unwrap();
        assert_eq!(rounds.last().unwrap()["round"], "final");
        assert_eq!(json["champion"], "Derecho");
    }
}

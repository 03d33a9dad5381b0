use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::load_championship;
use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::calculate::champion;
use crate::models::{Championship, ChampionshipStatus, ChampionshipSummary, Team};

#[derive(Debug, Deserialize)]
pub struct ListChampionshipsParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub year: Option<u16>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChampionshipListResponse {
    pub championships: Vec<ChampionshipSummary>,
    pub pagination: PaginationMeta,
}

fn parse_status(raw: &str) -> Result<ChampionshipStatus, ApiError> {
    let status: ChampionshipStatus =
        serde_json::from_value(serde_json::Value::String(raw.trim().to_lowercase()))
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if status == ChampionshipStatus::Unknown {
        return Err(ApiError::BadRequest(format!(
            "Unknown championship status: {}",
            raw
        )));
    }
    Ok(status)
}

pub async fn list_championships(
    State(state): State<AppState>,
    Query(params): Query<ListChampionshipsParams>,
) -> Result<Json<ChampionshipListResponse>, ApiError> {
    let status = params.status.as_deref().map(parse_status).transpose()?;
    let mut championships = state.backend.list_championships().await?;

    if let Some(year) = params.year {
        championships.retain(|c| c.year == Some(year));
    }
    if let Some(status) = status {
        championships.retain(|c| c.status == status);
    }

    // Most recent first
    championships.sort_by(|a, b| {
        b.year
            .cmp(&a.year)
            .then_with(|| b.term.cmp(&a.term))
            .then_with(|| a.name.cmp(&b.name))
    });

    let pagination = Pagination::new(params.page, params.page_size);
    let meta = PaginationMeta::new(&pagination, championships.len() as u32);

    Ok(Json(ChampionshipListResponse {
        championships: pagination.slice(&championships).to_vec(),
        pagination: meta,
    }))
}

#[derive(Debug, Serialize)]
pub struct ChampionshipDetail {
    pub championship: Championship,
    pub champion: Option<Team>,
}

pub async fn get_championship(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ChampionshipDetail>, ApiError> {
    let championship = load_championship(&state, &id).await?;
    let champion = champion(&championship).cloned();

    Ok(Json(ChampionshipDetail {
        championship,
        champion,
    }))
}

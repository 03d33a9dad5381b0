//! In-memory backend over championship snapshots.
//!
//! Serves snapshot files for offline use and backs the API tests. Mutations
//! are applied to the held snapshots so a re-fetch observes them, the same
//! way the real backend behaves.

use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::envelope::{self, keys};
use super::{ChampionshipBackend, ClientError};
use crate::calculate::{group_by_round, ScheduleInput, ValidatedResult};
use crate::models::{
    Championship, ChampionshipId, ChampionshipStatus, ChampionshipSummary, Match, MatchId,
    MatchStatus, Round, Team, TeamId,
};

pub struct InMemoryBackend {
    championships: RwLock<Vec<Championship>>,
}

impl InMemoryBackend {
    pub fn new(championships: Vec<Championship>) -> Self {
        Self {
            championships: RwLock::new(championships),
        }
    }

    /// Load a snapshot file holding one championship or a list of them, in
    /// any of the backend's response envelopes.
    pub async fn from_file(path: &Path) -> Result<Self, ClientError> {
        let contents = tokio::fs::read_to_string(path).await?;
        let body: serde_json::Value = serde_json::from_str(&contents)?;

        let championships = if body.is_array() {
            envelope::decode::<Vec<Championship>>(body, keys::CHAMPIONSHIPS)?
        } else {
            let payload = envelope::unwrap_payload(body, keys::CHAMPIONSHIP)?;
            if payload.is_array() {
                envelope::decode::<Vec<Championship>>(payload, keys::CHAMPIONSHIPS)?
            } else {
                vec![envelope::decode::<Championship>(payload, keys::CHAMPIONSHIP)?]
            }
        };

        info!(
            "Loaded {} championship snapshot(s) from {:?}",
            championships.len(),
            path
        );
        Ok(Self::new(championships))
    }
}

/// Match ids are only unique within a championship.
fn find_match_mut<'a>(
    championships: &'a mut [Championship],
    championship: &ChampionshipId,
    match_id: &MatchId,
) -> Result<&'a mut Match, ClientError> {
    championships
        .iter_mut()
        .find(|c| &c.id == championship)
        .ok_or_else(|| ClientError::NotFound(format!("championship {}", championship)))?
        .matches
        .iter_mut()
        .find(|m| &m.id == match_id)
        .ok_or_else(|| {
            ClientError::NotFound(format!("match {} in championship {}", match_id, championship))
        })
}

/// The round that follows a knockout round.
fn next_round(round: &Round) -> Option<Round> {
    match round {
        Round::RoundOf16 => Some(Round::QuarterFinal),
        Round::QuarterFinal => Some(Round::SemiFinal),
        Round::SemiFinal => Some(Round::Final),
        _ => None,
    }
}

fn next_match_id(championship: &Championship) -> i64 {
    championship
        .matches
        .iter()
        .filter_map(|m| m.id.as_str().parse::<i64>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

/// Pair the winners of the active round into the next one. An odd winner out
/// gets a BYE match that is already finished in their favour.
fn generate_next_round(championship: &mut Championship) -> Result<(), ClientError> {
    let (round, winners) = {
        let groups = group_by_round(&championship.matches);
        let active = groups
            .active()
            .ok_or_else(|| ClientError::Rejected("championship has no matches".to_string()))?;
        let round = next_round(&active.round).ok_or_else(|| {
            ClientError::Rejected(format!("no round follows '{}'", active.round))
        })?;
        let winners: Vec<TeamId> = active
            .matches
            .iter()
            .map(|m| {
                let bye_side = || {
                    m.is_bye()
                        .then(|| m.team_a_id.clone().or_else(|| m.team_b_id.clone()))
                        .flatten()
                };
                m.winner().cloned().or_else(bye_side).ok_or_else(|| {
                    ClientError::Rejected(format!("match {} has no winner yet", m.id))
                })
            })
            .collect::<Result<_, _>>()?;
        (round, winners)
    };

    if round == Round::Final && winners.len() != 2 {
        return Err(ClientError::Rejected(format!(
            "the final needs exactly 2 winners, found {}",
            winners.len()
        )));
    }

    let mut id = next_match_id(championship);
    for pair in winners.chunks(2) {
        let mut m = Match::new(id, round.clone(), Some(pair[0].clone()), pair.get(1).cloned());
        if m.is_bye() {
            m.status = MatchStatus::Finished;
            m.winner_id = Some(pair[0].clone());
        }
        championship.matches.push(m);
        id += 1;
    }
    championship.status = ChampionshipStatus::InProgress;
    Ok(())
}

#[async_trait]
impl ChampionshipBackend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_championships(&self) -> Result<Vec<ChampionshipSummary>, ClientError> {
        let championships = self.championships.read().await;
        Ok(championships.iter().map(ChampionshipSummary::from).collect())
    }

    async fn fetch_championship(&self, id: &ChampionshipId) -> Result<Championship, ClientError> {
        let championships = self.championships.read().await;
        championships
            .iter()
            .find(|c| &c.id == id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("championship {}", id)))
    }

    async fn submit_result(
        &self,
        championship: &ChampionshipId,
        match_id: &MatchId,
        result: &ValidatedResult,
    ) -> Result<(), ClientError> {
        let mut championships = self.championships.write().await;
        let m = find_match_mut(&mut championships, championship, match_id)?;

        m.goals_a = Some(result.goals_a);
        m.goals_b = Some(result.goals_b);
        m.penalties_a = result.penalties_a;
        m.penalties_b = result.penalties_b;
        m.decided_by_penalties = result.decided_by_penalties;
        m.winner_id = result.winner_id.clone();
        m.status = MatchStatus::Finished;
        Ok(())
    }

    async fn schedule_match(
        &self,
        championship: &ChampionshipId,
        match_id: &MatchId,
        schedule: &ScheduleInput,
    ) -> Result<(), ClientError> {
        let mut championships = self.championships.write().await;
        let m = find_match_mut(&mut championships, championship, match_id)?;

        m.venue_id = Some(schedule.venue_id.clone());
        m.date = Some(schedule.date);
        m.start_time = Some(schedule.start_time);
        m.end_time = Some(schedule.end_time);
        if m.status == MatchStatus::Pending {
            m.status = MatchStatus::Scheduled;
        }
        Ok(())
    }

    async fn request_next_round(&self, id: &ChampionshipId) -> Result<(), ClientError> {
        let mut championships = self.championships.write().await;
        let championship = championships
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("championship {}", id)))?;

        let result = generate_next_round(championship);
        if let Err(e) = &result {
            warn!("Next round rejected for championship {}: {}", id, e);
        }
        result
    }

    async fn search_teams(&self, query: &str) -> Result<Vec<Team>, ClientError> {
        let needle = query.trim().to_lowercase();
        let championships = self.championships.read().await;

        let mut found: Vec<Team> = Vec::new();
        for team in championships.iter().flat_map(|c| c.teams.iter()) {
            if team.name.to_lowercase().contains(&needle) && !found.iter().any(|t| t.id == team.id) {
                found.push(team.clone());
            }
        }
        Ok(found)
    }
}

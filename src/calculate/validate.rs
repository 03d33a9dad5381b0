//! Field validation for match mutations before they reach the backend.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Match, MatchStatus, TeamId, VenueId};

/// Validation failures for result and schedule submissions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Match {0} does not have two teams yet")]
    MissingTeams(String),

    #[error("Match {0} is cancelled")]
    Cancelled(String),

    #[error("Match {0} already has a final result")]
    AlreadyFinished(String),

    #[error("A level score in an elimination round needs a penalty shootout")]
    PenaltiesRequired,

    #[error("Penalty shootout cannot end level")]
    PenaltiesLevel,

    #[error("Penalties are only recorded for a level score in an elimination round")]
    UnexpectedPenalties,

    #[error("End time {end} must be after start time {start}")]
    InvalidTimeWindow { start: NaiveTime, end: NaiveTime },
}

/// Result entered by an operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResultInput {
    pub goals_a: u32,
    pub goals_b: u32,
    #[serde(default)]
    pub penalties_a: Option<u32>,
    #[serde(default)]
    pub penalties_b: Option<u32>,
}

/// Result ready to submit, in the backend's field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedResult {
    #[serde(rename = "golesA")]
    pub goals_a: u32,
    #[serde(rename = "golesB")]
    pub goals_b: u32,
    #[serde(rename = "penalesA")]
    pub penalties_a: Option<u32>,
    #[serde(rename = "penalesB")]
    pub penalties_b: Option<u32>,
    #[serde(rename = "definidoPorPenales")]
    pub decided_by_penalties: bool,
    #[serde(rename = "ganadorId")]
    pub winner_id: Option<TeamId>,
}

pub fn validate_result(m: &Match, input: &ResultInput) -> Result<ValidatedResult, ValidationError> {
    let (team_a, team_b) = match (&m.team_a_id, &m.team_b_id) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(ValidationError::MissingTeams(m.id.to_string())),
    };
    match m.status {
        MatchStatus::Cancelled => return Err(ValidationError::Cancelled(m.id.to_string())),
        MatchStatus::Finished => return Err(ValidationError::AlreadyFinished(m.id.to_string())),
        _ => {}
    }

    let level = input.goals_a == input.goals_b;
    let has_penalties = input.penalties_a.is_some() || input.penalties_b.is_some();

    if !(level && m.round.is_elimination()) {
        if has_penalties {
            return Err(ValidationError::UnexpectedPenalties);
        }
        let winner_id = if input.goals_a > input.goals_b {
            Some(team_a.clone())
        } else if input.goals_b > input.goals_a {
            Some(team_b.clone())
        } else {
            None
        };
        return Ok(ValidatedResult {
            goals_a: input.goals_a,
            goals_b: input.goals_b,
            penalties_a: None,
            penalties_b: None,
            decided_by_penalties: false,
            winner_id,
        });
    }

    let (pen_a, pen_b) = match (input.penalties_a, input.penalties_b) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(ValidationError::PenaltiesRequired),
    };
    if pen_a == pen_b {
        return Err(ValidationError::PenaltiesLevel);
    }

    let winner = if pen_a > pen_b { team_a } else { team_b };

    Ok(ValidatedResult {
        goals_a: input.goals_a,
        goals_b: input.goals_b,
        penalties_a: Some(pen_a),
        penalties_b: Some(pen_b),
        decided_by_penalties: true,
        winner_id: Some(winner.clone()),
    })
}

/// Scheduling request: venue, day and time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInput {
    #[serde(rename = "canchaId", alias = "venue_id")]
    pub venue_id: VenueId,
    #[serde(rename = "fecha", alias = "date")]
    pub date: NaiveDate,
    #[serde(rename = "horaInicio", alias = "start_time", with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(rename = "horaFin", alias = "end_time", with = "hhmm")]
    pub end_time: NaiveTime,
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        crate::models::wire::time::parse(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid time: {}", raw)))
    }
}

pub fn validate_schedule(input: &ScheduleInput) -> Result<(), ValidationError> {
    if input.end_time <= input.start_time {
        return Err(ValidationError::InvalidTimeWindow {
            start: input.start_time,
            end: input.end_time,
        });
    }
    Ok(())
}

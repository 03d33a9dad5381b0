//! Match model: a fixture between two teams within a round.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{MatchId, TeamId, VenueId};

/// Priority assigned to rounds outside the known knockout stages.
pub const UNRANKED_PRIORITY: u8 = 99;

/// A named stage of a championship.
///
/// The backend sends Spanish round names; English spellings are accepted too.
/// Any other name is kept verbatim, and a missing name becomes `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Round {
    RoundOf16,
    QuarterFinal,
    SemiFinal,
    Final,
    Other(String),
    Unknown,
}

impl Round {
    /// Elimination proximity: lower means closer to the final.
    pub fn priority(&self) -> u8 {
        match self {
            Round::Final => 1,
            Round::SemiFinal => 2,
            Round::QuarterFinal => 3,
            Round::RoundOf16 => 4,
            Round::Other(_) | Round::Unknown => UNRANKED_PRIORITY,
        }
    }

    /// Knockout rounds, where a level score must be settled on penalties.
    pub fn is_elimination(&self) -> bool {
        self.priority() < UNRANKED_PRIORITY
    }

    /// Canonical name as the backend spells it.
    pub fn name(&self) -> &str {
        match self {
            Round::RoundOf16 => "octavos",
            Round::QuarterFinal => "cuartos",
            Round::SemiFinal => "semifinal",
            Round::Final => "final",
            Round::Other(name) => name,
            Round::Unknown => "unknown",
        }
    }

    pub fn parse(name: &str) -> Self {
        let normalized = name.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "octavos" | "octavos_de_final" | "round_of_16" | "roundof16" => Round::RoundOf16,
            "cuartos" | "cuartos_de_final" | "quarterfinal" | "quarter_final" => {
                Round::QuarterFinal
            }
            "semifinal" | "semifinales" | "semi_final" => Round::SemiFinal,
            "final" => Round::Final,
            "" | "unknown" => Round::Unknown,
            _ => Round::Other(name.trim().to_string()),
        }
    }
}

impl From<Option<String>> for Round {
    fn from(name: Option<String>) -> Self {
        name.as_deref().map(Round::parse).unwrap_or(Round::Unknown)
    }
}

impl From<Round> for Option<String> {
    fn from(round: Round) -> Self {
        match round {
            Round::Unknown => None,
            other => Some(other.name().to_string()),
        }
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchStatus {
    #[default]
    #[serde(rename = "pendiente", alias = "pending")]
    Pending,
    #[serde(rename = "programado", alias = "scheduled")]
    Scheduled,
    #[serde(rename = "en_curso", alias = "in_progress", alias = "en curso")]
    InProgress,
    #[serde(rename = "finalizado", alias = "finished")]
    Finished,
    #[serde(rename = "cancelado", alias = "cancelled")]
    Cancelled,
    /// Any status string the backend sends that we do not recognize.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchStatus::Pending => "pendiente",
            MatchStatus::Scheduled => "programado",
            MatchStatus::InProgress => "en_curso",
            MatchStatus::Finished => "finalizado",
            MatchStatus::Cancelled => "cancelado",
            MatchStatus::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// A scheduled or played fixture between two teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,

    #[serde(rename = "ronda", default = "unknown_round")]
    pub round: Round,

    /// Side A; absent for a BYE slot or a slot not yet decided
    #[serde(rename = "equipoAId", default)]
    pub team_a_id: Option<TeamId>,

    /// Side B
    #[serde(rename = "equipoBId", default)]
    pub team_b_id: Option<TeamId>,

    /// Regulation-time goals for side A
    #[serde(rename = "golesA", default)]
    pub goals_a: Option<u32>,

    #[serde(rename = "golesB", default)]
    pub goals_b: Option<u32>,

    /// Penalty-shootout goals for side A
    #[serde(rename = "penalesA", default)]
    pub penalties_a: Option<u32>,

    #[serde(rename = "penalesB", default)]
    pub penalties_b: Option<u32>,

    #[serde(rename = "definidoPorPenales", default)]
    pub decided_by_penalties: bool,

    #[serde(rename = "ganadorId", default)]
    pub winner_id: Option<TeamId>,

    #[serde(rename = "estado", default)]
    pub status: MatchStatus,

    #[serde(rename = "canchaId", default)]
    pub venue_id: Option<VenueId>,

    #[serde(rename = "fecha", default, with = "super::wire::date")]
    pub date: Option<NaiveDate>,

    #[serde(rename = "horaInicio", default, with = "super::wire::time")]
    pub start_time: Option<NaiveTime>,

    #[serde(rename = "horaFin", default, with = "super::wire::time")]
    pub end_time: Option<NaiveTime>,
}

fn unknown_round() -> Round {
    Round::Unknown
}

impl Match {
    /// A new pending match with no schedule or score.
    pub fn new(
        id: impl Into<MatchId>,
        round: Round,
        team_a_id: Option<TeamId>,
        team_b_id: Option<TeamId>,
    ) -> Self {
        Self {
            id: id.into(),
            round,
            team_a_id,
            team_b_id,
            goals_a: None,
            goals_b: None,
            penalties_a: None,
            penalties_b: None,
            decided_by_penalties: false,
            winner_id: None,
            status: MatchStatus::Pending,
            venue_id: None,
            date: None,
            start_time: None,
            end_time: None,
        }
    }

    /// Mark the match finished with a regulation score.
    pub fn finished(mut self, goals_a: u32, goals_b: u32) -> Self {
        self.goals_a = Some(goals_a);
        self.goals_b = Some(goals_b);
        self.status = MatchStatus::Finished;
        self
    }

    pub fn with_winner(mut self, winner: impl Into<TeamId>) -> Self {
        self.winner_id = Some(winner.into());
        self
    }

    pub fn with_status(mut self, status: MatchStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// Whether the team plays on either side.
    pub fn involves(&self, team: &TeamId) -> bool {
        self.team_a_id.as_ref() == Some(team) || self.team_b_id.as_ref() == Some(team)
    }

    /// Exactly one side present: the other slot was a BYE.
    pub fn is_bye(&self) -> bool {
        self.team_a_id.is_some() != self.team_b_id.is_some()
    }

    /// The recorded winner, only if it is one of the two sides.
    pub fn winner(&self) -> Option<&TeamId> {
        self.winner_id.as_ref().filter(|w| self.involves(w))
    }

    /// Goals scored and conceded by `team` in regulation time.
    /// Side A is checked first. Missing goals count as zero.
    pub fn regulation_goals_for(&self, team: &TeamId) -> Option<(u32, u32)> {
        let a = self.goals_a.unwrap_or(0);
        let b = self.goals_b.unwrap_or(0);
        if self.team_a_id.as_ref() == Some(team) {
            Some((a, b))
        } else if self.team_b_id.as_ref() == Some(team) {
            Some((b, a))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_parse_spanish_and_english() {
        assert_eq!(Round::parse("octavos"), Round::RoundOf16);
        assert_eq!(Round::parse("round-of-16"), Round::RoundOf16);
        assert_eq!(Round::parse("Cuartos"), Round::QuarterFinal);
        assert_eq!(Round::parse("quarterfinal"), Round::QuarterFinal);
        assert_eq!(Round::parse("semifinal"), Round::SemiFinal);
        assert_eq!(Round::parse("FINAL"), Round::Final);
        assert_eq!(Round::parse("fase de grupos"), Round::Other("fase de grupos".into()));
        assert_eq!(Round::parse("  "), Round::Unknown);
        assert_eq!(Round::parse("Unknown"), Round::Unknown);
    }

    #[test]
    fn test_round_priority() {
        assert_eq!(Round::Final.priority(), 1);
        assert_eq!(Round::SemiFinal.priority(), 2);
        assert_eq!(Round::QuarterFinal.priority(), 3);
        assert_eq!(Round::RoundOf16.priority(), 4);
        assert_eq!(Round::Other("grupo A".into()).priority(), UNRANKED_PRIORITY);
        assert_eq!(Round::Unknown.priority(), UNRANKED_PRIORITY);
    }

    #[test]
    fn test_round_elimination() {
        assert!(Round::Final.is_elimination());
        assert!(Round::RoundOf16.is_elimination());
        assert!(!Round::Other("grupos".into()).is_elimination());
        assert!(!Round::Unknown.is_elimination());
    }

    #[test]
    fn test_match_deserialize_backend_shape() {
        let json = r#"{
            "id": 11, "ronda": "semifinal", "equipoAId": 1, "equipoBId": 2,
            "golesA": 1, "golesB": 1, "penalesA": 4, "penalesB": 3,
            "definidoPorPenales": true, "ganadorId": 1, "estado": "finalizado",
            "canchaId": 5, "fecha": "2025-04-12T00:00:00.000Z",
            "horaInicio": "14:00", "horaFin": "15:30:00"
        }"#;
        let m: Match = serde_json::from_str(json).unwrap();

        assert_eq!(m.round, Round::SemiFinal);
        assert_eq!(m.status, MatchStatus::Finished);
        assert_eq!(m.penalties_a, Some(4));
        assert!(m.decided_by_penalties);
        assert_eq!(m.date, NaiveDate::from_ymd_opt(2025, 4, 12));
        assert_eq!(m.start_time, NaiveTime::from_hms_opt(14, 0, 0));
        assert_eq!(m.end_time, NaiveTime::from_hms_opt(15, 30, 0));
        assert_eq!(m.winner(), Some(&TeamId::from(1)));
    }

    #[test]
    fn test_match_nulls_and_missing_round() {
        let json = r#"{"id": 3, "ronda": null, "equipoAId": 1, "equipoBId": null,
            "golesA": null, "golesB": null, "estado": "pendiente"}"#;
        let m: Match = serde_json::from_str(json).unwrap();

        assert_eq!(m.round, Round::Unknown);
        assert!(m.is_bye());
        assert!(m.goals_a.is_none());
        assert!(m.date.is_none());
    }

    #[test]
    fn test_match_without_id_fails() {
        let json = r#"{"ronda": "final", "estado": "pendiente"}"#;
        assert!(serde_json::from_str::<Match>(json).is_err());
    }

    #[test]
    fn test_unrecognized_status() {
        let m: Match = serde_json::from_str(r#"{"id": 1, "estado": "suspendido"}"#).unwrap();
        assert_eq!(m.status, MatchStatus::Unknown);
        assert!(!m.is_finished());
    }

    #[test]
    fn test_winner_outside_match_is_ignored() {
        let m = Match::new(1, Round::Final, Some(TeamId::from(1)), Some(TeamId::from(2)))
            .finished(2, 0)
            .with_winner(7);
        assert!(m.winner().is_none());
    }

    #[test]
    fn test_regulation_goals_for() {
        let m = Match::new(1, Round::Final, Some(TeamId::from(1)), Some(TeamId::from(2)))
            .finished(3, 1);
        assert_eq!(m.regulation_goals_for(&TeamId::from(1)), Some((3, 1)));
        assert_eq!(m.regulation_goals_for(&TeamId::from(2)), Some((1, 3)));
        assert_eq!(m.regulation_goals_for(&TeamId::from(3)), None);
    }

    #[test]
    fn test_round_serializes_to_backend_name() {
        let m = Match::new(1, Round::QuarterFinal, None, None);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["ronda"], "cuartos");
        assert_eq!(json["estado"], "pendiente");

        let m = Match::new(2, Round::Unknown, None, None);
        let json = serde_json::to_value(&m).unwrap();
        assert!(json["ronda"].is_null());
    }
}

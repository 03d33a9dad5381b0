//! Championship snapshot as fetched from the backend.

use serde::{Deserialize, Serialize};

use super::{ChampionshipId, Match, Team, TeamDirectory};

/// Team-size class of a championship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamFormat {
    #[serde(rename = "futbol_5", alias = "5", alias = "futbol5", alias = "F5")]
    FiveASide,
    #[serde(rename = "futbol_7", alias = "7", alias = "futbol7", alias = "F7")]
    SevenASide,
    #[serde(rename = "futbol_11", alias = "11", alias = "futbol11", alias = "F11")]
    ElevenASide,
    #[serde(other)]
    Other,
}

/// Gender category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "masculino", alias = "M")]
    Male,
    #[serde(rename = "femenino", alias = "F")]
    Female,
    #[serde(rename = "mixto")]
    Mixed,
    #[serde(other)]
    Other,
}

/// Overall championship status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChampionshipStatus {
    #[default]
    #[serde(rename = "creado", alias = "created")]
    Created,
    #[serde(rename = "en_curso", alias = "in_progress", alias = "en curso")]
    InProgress,
    #[serde(rename = "finalizado", alias = "finished")]
    Finished,
    #[serde(rename = "cancelado", alias = "cancelled")]
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl ChampionshipStatus {
    /// Whether the championship still accepts results and new rounds.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            ChampionshipStatus::Created | ChampionshipStatus::InProgress
        )
    }
}

impl std::fmt::Display for ChampionshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChampionshipStatus::Created => "creado",
            ChampionshipStatus::InProgress => "en_curso",
            ChampionshipStatus::Finished => "finalizado",
            ChampionshipStatus::Cancelled => "cancelado",
            ChampionshipStatus::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// A championship with its teams and matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Championship {
    pub id: ChampionshipId,

    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "formato", default, skip_serializing_if = "Option::is_none")]
    pub format: Option<TeamFormat>,

    #[serde(rename = "genero", default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    #[serde(
        rename = "anio",
        default,
        deserialize_with = "super::wire::lenient_u16::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<u16>,

    /// Academic term (1 or 2)
    #[serde(
        rename = "semestre",
        default,
        deserialize_with = "super::wire::lenient_u16::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub term: Option<u16>,

    #[serde(rename = "estado", default)]
    pub status: ChampionshipStatus,

    #[serde(rename = "equipos", default)]
    pub teams: Vec<Team>,

    #[serde(rename = "partidos", default)]
    pub matches: Vec<Match>,
}

impl Championship {
    pub fn new(id: impl Into<ChampionshipId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            format: None,
            gender: None,
            year: None,
            term: None,
            status: ChampionshipStatus::InProgress,
            teams: Vec::new(),
            matches: Vec::new(),
        }
    }

    pub fn with_teams(mut self, teams: Vec<Team>) -> Self {
        self.teams = teams;
        self
    }

    pub fn with_matches(mut self, matches: Vec<Match>) -> Self {
        self.matches = matches;
        self
    }

    pub fn directory(&self) -> TeamDirectory<'_> {
        TeamDirectory::new(&self.teams)
    }

    pub fn find_match(&self, id: &super::MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| &m.id == id)
    }
}

/// Championship listing entry without teams or matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionshipSummary {
    pub id: ChampionshipId,

    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "formato", default, skip_serializing_if = "Option::is_none")]
    pub format: Option<TeamFormat>,

    #[serde(rename = "genero", default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    #[serde(
        rename = "anio",
        default,
        deserialize_with = "super::wire::lenient_u16::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<u16>,

    #[serde(
        rename = "semestre",
        default,
        deserialize_with = "super::wire::lenient_u16::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub term: Option<u16>,

    #[serde(rename = "estado", default)]
    pub status: ChampionshipStatus,
}

impl From<&Championship> for ChampionshipSummary {
    fn from(c: &Championship) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            format: c.format,
            gender: c.gender,
            year: c.year,
            term: c.term,
            status: c.status,
        }
    }
}

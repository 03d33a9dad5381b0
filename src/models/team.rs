//! Team model and name resolution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::TeamId;

/// Label shown for a bracket slot that has no team yet.
pub const TBD_LABEL: &str = "TBD";

/// Label shown for a team id that is not in the championship's team list.
pub const UNKNOWN_TEAM_LABEL: &str = "Unknown team";

/// A team registered in a championship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,

    /// Display name
    #[serde(rename = "nombre")]
    pub name: String,

    /// Academic program the team represents
    #[serde(rename = "programa", default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    /// Number of players on the roster
    #[serde(
        rename = "cantidadJugadores",
        alias = "jugadores",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub roster_size: Option<u32>,
}

impl Team {
    pub fn new(id: impl Into<TeamId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            program: None,
            roster_size: None,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }
}

/// Lookup from team id to team, built once per snapshot.
#[derive(Debug)]
pub struct TeamDirectory<'a> {
    by_id: HashMap<&'a TeamId, &'a Team>,
}

impl<'a> TeamDirectory<'a> {
    pub fn new(teams: &'a [Team]) -> Self {
        Self {
            by_id: teams.iter().map(|t| (&t.id, t)).collect(),
        }
    }

    pub fn get(&self, id: &TeamId) -> Option<&'a Team> {
        self.by_id.get(id).copied()
    }

    /// Resolve a display name, falling back to placeholder labels.
    pub fn name_of(&self, id: Option<&TeamId>) -> &'a str {
        match id {
            None => TBD_LABEL,
            Some(id) => self
                .get(id)
                .map(|t| t.name.as_str())
                .unwrap_or(UNKNOWN_TEAM_LABEL),
        }
    }
}

//! Derived standings table rows.

use serde::{Deserialize, Serialize};

use super::TeamId;

/// Points awarded for a win.
pub const POINTS_WIN: u32 = 3;

/// Points awarded for a draw.
pub const POINTS_DRAW: u32 = 1;

/// One row of the points table. Recomputed on every read, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    /// 1-based rank after sorting
    pub position: u32,
    pub team_id: TeamId,
    pub team_name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

impl StandingsRow {
    /// A zero-activity row for a team.
    pub fn new(team_id: TeamId, team_name: String) -> Self {
        Self {
            position: 0,
            team_id,
            team_name,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }

    /// Fold one regulation-time result into the row.
    pub fn record(&mut self, scored: u32, conceded: u32) {
        // Backend scores are unbounded; counters saturate.
        self.played = self.played.saturating_add(1);
        self.goals_for = self.goals_for.saturating_add(scored);
        self.goals_against = self.goals_against.saturating_add(conceded);

        if scored > conceded {
            self.won = self.won.saturating_add(1);
            self.points = self.points.saturating_add(POINTS_WIN);
        } else if scored == conceded {
            self.drawn = self.drawn.saturating_add(1);
            self.points = self.points.saturating_add(POINTS_DRAW);
        } else {
            self.lost = self.lost.saturating_add(1);
        }

        self.goal_difference = self.goals_for as i64 - self.goals_against as i64;
    }
}

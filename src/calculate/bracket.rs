//! Display-ready bracket: rounds from the earliest stage up to the final.

use serde::Serialize;

use crate::models::{Championship, Match, MatchId, MatchStatus, Round, TeamDirectory, TeamId};

use super::progress::{final_outcome, is_round_complete, FinalOutcome};
use super::rounds::group_by_round;

/// Regulation score, plus the shootout when it settled the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreLine {
    pub goals_a: u32,
    pub goals_b: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalties: Option<(u32, u32)>,
}

impl std::fmt::Display for ScoreLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.goals_a, self.goals_b)?;
        if let Some((a, b)) = self.penalties {
            write!(f, " ({} - {} pen.)", a, b)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketMatch {
    pub id: MatchId,
    pub team_a: String,
    pub team_b: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<TeamId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    pub status: MatchStatus,
    pub is_bye: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketRound {
    pub round: Round,
    pub complete: bool,
    pub matches: Vec<BracketMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketView {
    pub rounds: Vec<BracketRound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub champion: Option<String>,
}

fn bracket_match(m: &Match, directory: &TeamDirectory<'_>) -> BracketMatch {
    let score = match (m.goals_a, m.goals_b) {
        (Some(goals_a), Some(goals_b)) => Some(ScoreLine {
            goals_a,
            goals_b,
            penalties: match (m.decided_by_penalties, m.penalties_a, m.penalties_b) {
                (true, Some(a), Some(b)) => Some((a, b)),
                _ => None,
            },
        }),
        _ => None,
    };

    // A BYE advances the only present side, even if the backend left the
    // winner blank.
    let winner_id = m.winner().cloned().or_else(|| {
        if m.is_bye() && m.is_finished() {
            m.team_a_id.clone().or_else(|| m.team_b_id.clone())
        } else {
            None
        }
    });

    BracketMatch {
        id: m.id.clone(),
        team_a: directory.name_of(m.team_a_id.as_ref()).to_string(),
        team_b: directory.name_of(m.team_b_id.as_ref()).to_string(),
        score,
        winner: winner_id
            .as_ref()
            .map(|id| directory.name_of(Some(id)).to_string()),
        winner_id,
        status: m.status,
        is_bye: m.is_bye(),
    }
}

/// Build the bracket view. Unranked rounds (group fixtures and the like) come
/// first in appearance order, then knockout rounds towards the final.
pub fn build_bracket(championship: &Championship) -> BracketView {
    let directory = championship.directory();
    let groups = group_by_round(&championship.matches);

    let mut ordered: Vec<_> = groups.iter().collect();
    ordered.sort_by_key(|g| std::cmp::Reverse(g.priority()));

    let rounds = ordered
        .into_iter()
        .map(|group| BracketRound {
            round: group.round.clone(),
            complete: is_round_complete(&group.matches),
            matches: group
                .matches
                .iter()
                .map(|m| bracket_match(m, &directory))
                .collect(),
        })
        .collect();

    let champion = match final_outcome(championship) {
        FinalOutcome::Decided { champion } => Some(directory.name_of(Some(&champion)).to_string()),
        _ => None,
    };

    BracketView { rounds, champion }
}

//! Round completion and tournament conclusion predicates.

use serde::Serialize;

use crate::models::{Championship, Match, Round, Team, TeamId};

use super::rounds::group_by_round;

/// Outcome of the final round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FinalOutcome {
    /// No final round, or it holds no matches.
    Absent,
    /// The final is unfinished or its winner is not determined.
    Pending,
    /// The single final match is finished with a winner from one of its sides.
    Decided { champion: TeamId },
    /// More than one match is labeled final. Reported, never resolved.
    Ambiguous { matches: usize },
}

/// Whether every match of a round is finished. An empty round is not complete.
pub fn is_round_complete(matches: &[&Match]) -> bool {
    !matches.is_empty() && matches.iter().all(|m| m.is_finished())
}

pub fn final_outcome(championship: &Championship) -> FinalOutcome {
    let finals: Vec<&Match> = championship
        .matches
        .iter()
        .filter(|m| m.round == Round::Final)
        .collect();

    if finals.is_empty() {
        return FinalOutcome::Absent;
    }
    if !is_round_complete(&finals) {
        return FinalOutcome::Pending;
    }
    if finals.len() > 1 {
        tracing::warn!(
            "Championship {} has {} matches labeled final",
            championship.id,
            finals.len()
        );
        return FinalOutcome::Ambiguous {
            matches: finals.len(),
        };
    }

    match finals[0].winner() {
        Some(champion) => FinalOutcome::Decided {
            champion: champion.clone(),
        },
        None => FinalOutcome::Pending,
    }
}

pub fn is_tournament_finished(championship: &Championship) -> bool {
    matches!(final_outcome(championship), FinalOutcome::Decided { .. })
}

/// The champion team, when the final is decided.
///
/// A winner id missing from the team list yields `None` here; callers that
/// only need the id can use `final_outcome`.
pub fn champion(championship: &Championship) -> Option<&Team> {
    match final_outcome(championship) {
        FinalOutcome::Decided { champion } => championship.directory().get(&champion),
        _ => None,
    }
}

/// Progress summary of the active round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundProgress {
    pub active_round: Option<Round>,
    pub total_matches: usize,
    pub finished_matches: usize,
    pub round_complete: bool,
    pub tournament_finished: bool,
    pub final_outcome: FinalOutcome,
    pub can_request_next_round: bool,
}

pub fn round_progress(championship: &Championship) -> RoundProgress {
    let groups = group_by_round(&championship.matches);
    let outcome = final_outcome(championship);
    let tournament_finished = matches!(outcome, FinalOutcome::Decided { .. });

    let (active_round, total, finished, complete) = match groups.active() {
        Some(active) => (
            Some(active.round.clone()),
            active.matches.len(),
            active.finished_count(),
            is_round_complete(&active.matches),
        ),
        None => (None, 0, 0, false),
    };

    let can_advance = complete
        && !tournament_finished
        && active_round.as_ref() != Some(&Round::Final)
        && championship.status.is_open();

    RoundProgress {
        active_round,
        total_matches: total,
        finished_matches: finished,
        round_complete: complete,
        tournament_finished,
        final_outcome: outcome,
        can_request_next_round: can_advance,
    }
}

/// Whether the backend may be asked to generate the next round.
pub fn can_request_next_round(championship: &Championship) -> bool {
    round_progress(championship).can_request_next_round
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChampionshipStatus, MatchStatus};

    fn final_match(id: i64) -> Match {
        Match::new(id, Round::Final, Some(TeamId::from(1)), Some(TeamId::from(2)))
    }

    fn championship(matches: Vec<Match>) -> Championship {
        Championship::new(1, "Copa")
            .with_teams(vec![Team::new(1, "A"), Team::new(2, "B")])
            .with_matches(matches)
    }

    #[test]
    fn test_round_complete() {
        let done = final_match(1).finished(1, 0);
        let open = final_match(2);

        assert!(is_round_complete(&[&done]));
        assert!(!is_round_complete(&[&done, &open]));
        assert!(!is_round_complete(&[]));
    }

    #[test]
    fn test_scheduled_final_not_finished() {
        let c = championship(vec![final_match(1).with_status(MatchStatus::Scheduled)]);

        assert_eq!(final_outcome(&c), FinalOutcome::Pending);
        assert!(!is_tournament_finished(&c));
        assert!(champion(&c).is_none());
    }

    #[test]
    fn test_decided_final() {
        let c = championship(vec![final_match(1).finished(2, 1).with_winner(1)]);

        assert!(is_tournament_finished(&c));
        assert_eq!(champion(&c).unwrap().name, "A");
    }

    #[test]
    fn test_final_absent() {
        let c = championship(vec![Match::new(
            1,
            Round::SemiFinal,
            Some(TeamId::from(1)),
            Some(TeamId::from(2)),
        )
        .finished(1, 0)
        .with_winner(1)]);

        assert_eq!(final_outcome(&c), FinalOutcome::Absent);
        assert!(!is_tournament_finished(&c));
    }

    #[test]
    fn test_finished_final_without_winner_is_pending() {
        let c = championship(vec![final_match(1).finished(1, 1)]);
        assert_eq!(final_outcome(&c), FinalOutcome::Pending);
    }

    #[test]
    fn test_winner_outside_final_is_pending() {
        let c = championship(vec![final_match(1).finished(1, 0).with_winner(5)]);
        assert!(!is_tournament_finished(&c));
    }

    #[test]
    fn test_multiple_finals_are_ambiguous() {
        let c = championship(vec![
            final_match(1).finished(1, 0).with_winner(1),
            final_match(2).finished(0, 1).with_winner(2),
        ]);

        assert_eq!(final_outcome(&c), FinalOutcome::Ambiguous { matches: 2 });
        assert!(!is_tournament_finished(&c));
    }

    #[test]
    fn test_one_unfinished_final_among_many() {
        let c = championship(vec![
            final_match(1).finished(1, 0).with_winner(1),
            final_match(2),
        ]);
        assert_eq!(final_outcome(&c), FinalOutcome::Pending);
    }

    #[test]
    fn test_progress_can_advance_after_complete_semis() {
        let semi = |id: i64| {
            Match::new(id, Round::SemiFinal, Some(TeamId::from(1)), Some(TeamId::from(2)))
                .finished(1, 0)
                .with_winner(1)
        };
        let c = championship(vec![semi(1), semi(2)]);
        let progress = round_progress(&c);

        assert_eq!(progress.active_round, Some(Round::SemiFinal));
        assert_eq!(progress.total_matches, 2);
        assert_eq!(progress.finished_matches, 2);
        assert!(progress.round_complete);
        assert!(progress.can_request_next_round);
    }

    #[test]
    fn test_progress_blocks_on_pending_matches() {
        let c = championship(vec![
            Match::new(1, Round::QuarterFinal, None, None).finished(1, 0),
            Match::new(2, Round::QuarterFinal, None, None),
        ]);
        let progress = round_progress(&c);

        assert_eq!(progress.finished_matches, 1);
        assert!(!progress.round_complete);
        assert!(!can_request_next_round(&c));
    }

    #[test]
    fn test_progress_no_next_round_after_final() {
        let c = championship(vec![final_match(1).finished(3, 0).with_winner(1)]);
        let progress = round_progress(&c);

        assert!(progress.tournament_finished);
        assert!(!progress.can_request_next_round);
    }

    #[test]
    fn test_progress_closed_championship() {
        let mut c = championship(vec![Match::new(1, Round::SemiFinal, None, None).finished(1, 0)]);
        c.status = ChampionshipStatus::Cancelled;
        assert!(!can_request_next_round(&c));
    }

    #[test]
    fn test_progress_empty() {
        let progress = round_progress(&championship(vec![]));
        assert!(progress.active_round.is_none());
        assert!(!progress.round_complete);
        assert_eq!(progress.final_outcome, FinalOutcome::Absent);
    }
}

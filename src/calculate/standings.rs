//! Points table computation.

use std::cmp::Ordering;

use crate::models::{Championship, Match, StandingsRow, Team};

/// Table order: points, then goal difference, then goals for, all descending.
fn table_order(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference.cmp(&a.goal_difference))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
}

/// Compute the ranked standings table.
///
/// Only finished matches count, on regulation goals alone: a draw settled on
/// penalties stays a draw here. Every team gets a row, including teams with no
/// finished matches. The sort is stable, so teams level on all keys keep their
/// input order.
pub fn compute_standings(teams: &[Team], matches: &[Match]) -> Vec<StandingsRow> {
    let finished: Vec<&Match> = matches.iter().filter(|m| m.is_finished()).collect();

    let mut rows: Vec<StandingsRow> = teams
        .iter()
        .map(|team| {
            let mut row = StandingsRow::new(team.id.clone(), team.name.clone());
            for m in &finished {
                if let Some((scored, conceded)) = m.regulation_goals_for(&team.id) {
                    row.record(scored, conceded);
                }
            }
            row
        })
        .collect();

    rows.sort_by(table_order);

    for (i, row) in rows.iter_mut().enumerate() {
        row.position = i as u32 + 1;
    }

    rows
}

/// Standings for a whole championship snapshot.
pub fn championship_standings(championship: &Championship) -> Vec<StandingsRow> {
    let rows = compute_standings(&championship.teams, &championship.matches);
    tracing::debug!(
        "Computed standings for championship {} ({} teams)",
        championship.id,
        rows.len()
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchStatus, Round, TeamId, POINTS_DRAW, POINTS_WIN};
    use pretty_assertions::assert_eq;

    fn teams(names: &[(i64, &str)]) -> Vec<Team> {
        names.iter().map(|(id, name)| Team::new(*id, *name)).collect()
    }

    fn played(id: i64, a: i64, b: i64, goals_a: u32, goals_b: u32) -> Match {
        Match::new(id, Round::Other("fecha 1".into()), Some(a.into()), Some(b.into()))
            .finished(goals_a, goals_b)
    }

    fn row<'a>(rows: &'a [StandingsRow], id: i64) -> &'a StandingsRow {
        rows.iter().find(|r| r.team_id == TeamId::from(id)).unwrap()
    }

    #[test]
    fn test_single_win() {
        let teams = teams(&[(1, "A"), (2, "B")]);
        let rows = compute_standings(&teams, &[played(1, 1, 2, 3, 1)]);

        let expected_a = StandingsRow {
            position: 1,
            team_id: TeamId::from(1),
            team_name: "A".to_string(),
            played: 1,
            won: 1,
            drawn: 0,
            lost: 0,
            goals_for: 3,
            goals_against: 1,
            goal_difference: 2,
            points: 3,
        };
        let expected_b = StandingsRow {
            position: 2,
            team_id: TeamId::from(2),
            team_name: "B".to_string(),
            played: 1,
            won: 0,
            drawn: 0,
            lost: 1,
            goals_for: 1,
            goals_against: 3,
            goal_difference: -2,
            points: 0,
        };
        assert_eq!(rows, vec![expected_a, expected_b]);
    }

    #[test]
    fn test_draw_keeps_team_order() {
        let teams = teams(&[(1, "A"), (2, "B")]);
        let rows = compute_standings(&teams, &[played(1, 1, 2, 2, 2)]);

        for r in &rows {
            assert_eq!(r.played, 1);
            assert_eq!(r.drawn, 1);
            assert_eq!(r.points, 1);
            assert_eq!(r.goal_difference, 0);
        }
        assert_eq!(rows[0].team_id, TeamId::from(1));
        assert_eq!(rows[1].team_id, TeamId::from(2));

        // Reversed input order flips the table.
        let reversed: Vec<Team> = teams.into_iter().rev().collect();
        let rows = compute_standings(&reversed, &[played(1, 1, 2, 2, 2)]);
        assert_eq!(rows[0].team_id, TeamId::from(2));
    }

    #[test]
    fn test_penalty_shootout_does_not_convert_draw() {
        let teams = teams(&[(1, "A"), (2, "B")]);
        let mut m = Match::new(1, Round::SemiFinal, Some(1.into()), Some(2.into()))
            .finished(1, 1)
            .with_winner(2);
        m.penalties_a = Some(3);
        m.penalties_b = Some(5);
        m.decided_by_penalties = true;

        let rows = compute_standings(&teams, &[m]);
        assert_eq!(row(&rows, 2).won, 0);
        assert_eq!(row(&rows, 2).drawn, 1);
        assert_eq!(row(&rows, 2).goals_for, 1);
        assert_eq!(row(&rows, 1).points, 1);
    }

    #[test]
    fn test_only_finished_matches_count() {
        let teams = teams(&[(1, "A"), (2, "B")]);
        let mut pending = played(1, 1, 2, 5, 0);
        pending.status = MatchStatus::InProgress;
        let cancelled = played(2, 1, 2, 3, 0).with_status(MatchStatus::Cancelled);

        let rows = compute_standings(&teams, &[pending, cancelled]);
        assert!(rows.iter().all(|r| r.played == 0 && r.points == 0));
    }

    #[test]
    fn test_tie_breaks() {
        // A and B both on 3 points; B has better goal difference.
        // C and D both on 3 points with equal difference; D scored more.
        let teams = teams(&[(1, "A"), (2, "B"), (3, "C"), (4, "D"), (5, "E")]);
        let matches = vec![
            played(1, 1, 5, 1, 0),
            played(2, 2, 5, 4, 0),
            played(3, 3, 5, 2, 1),
            played(4, 4, 5, 3, 2),
        ];
        let rows = compute_standings(&teams, &matches);
        let order: Vec<TeamId> = rows.iter().map(|r| r.team_id.clone()).collect();

        assert_eq!(
            order,
            vec![
                TeamId::from(2),
                TeamId::from(4),
                TeamId::from(3),
                TeamId::from(1),
                TeamId::from(5),
            ]
        );
        assert_eq!(rows.iter().map(|r| r.position).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_zero_activity_teams_kept_below_scorers() {
        let teams = teams(&[(1, "Idle1"), (2, "A"), (3, "Idle2"), (4, "B")]);
        let rows = compute_standings(&teams, &[played(1, 2, 4, 2, 2)]);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].team_id, TeamId::from(2));
        assert_eq!(rows[1].team_id, TeamId::from(4));
        assert_eq!(rows[2].team_id, TeamId::from(1));
        assert_eq!(rows[3].team_id, TeamId::from(3));

        let idle = row(&rows, 3);
        assert_eq!(
            (idle.played, idle.won, idle.drawn, idle.lost),
            (0, 0, 0, 0)
        );
        assert_eq!((idle.goals_for, idle.goals_against, idle.points), (0, 0, 0));
    }

    #[test]
    fn test_missing_team_reference_does_not_panic() {
        let teams = teams(&[(1, "A")]);
        let rows = compute_standings(&teams, &[played(1, 99, 1, 2, 1)]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].lost, 1);
        assert_eq!(rows[0].goals_against, 2);
    }

    #[test]
    fn test_missing_goals_count_as_zero() {
        let teams = teams(&[(1, "A"), (2, "B")]);
        let mut m = played(1, 1, 2, 0, 0);
        m.goals_a = None;
        m.goals_b = Some(2);

        let rows = compute_standings(&teams, &[m]);
        assert_eq!(row(&rows, 2).won, 1);
        assert_eq!(row(&rows, 1).goals_for, 0);
    }

    #[test]
    fn test_huge_scores_saturate() {
        let teams = teams(&[(1, "A"), (2, "B")]);
        let matches = vec![
            played(1, 1, 2, u32::MAX, 0),
            played(2, 1, 2, u32::MAX, 0),
        ];

        let rows = compute_standings(&teams, &matches);
        let a = row(&rows, 1);
        assert_eq!(a.goals_for, u32::MAX);
        assert_eq!(a.goal_difference, u32::MAX as i64);
        assert_eq!(a.points, 2 * POINTS_WIN);
        assert_eq!(rows[0].team_id, TeamId::from(1));
    }

    #[test]
    fn test_no_teams_empty_table() {
        assert!(compute_standings(&[], &[played(1, 1, 2, 1, 0)]).is_empty());
    }

    #[test]
    fn test_row_invariants_hold() {
        let teams = teams(&[(1, "A"), (2, "B"), (3, "C")]);
        let matches = vec![
            played(1, 1, 2, 3, 3),
            played(2, 2, 3, 0, 1),
            played(3, 3, 1, 4, 2),
            played(4, 1, 2, 1, 0),
        ];
        let rows = compute_standings(&teams, &matches);

        for r in &rows {
            assert_eq!(r.points, POINTS_WIN * r.won + POINTS_DRAW * r.drawn);
            assert_eq!(r.goal_difference, r.goals_for as i64 - r.goals_against as i64);
            assert_eq!(r.played, r.won + r.drawn + r.lost);
        }
    }

    #[test]
    fn test_sort_is_idempotent() {
        let teams = teams(&[(1, "A"), (2, "B"), (3, "C"), (4, "D")]);
        let matches = vec![played(1, 1, 2, 1, 1), played(2, 3, 4, 0, 0)];

        let first = compute_standings(&teams, &matches);
        let second = compute_standings(&teams, &matches);
        assert_eq!(first, second);

        let mut resorted = first.clone();
        resorted.sort_by(table_order);
        assert_eq!(resorted, first);
    }
}

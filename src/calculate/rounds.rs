//! Round grouping and elimination-proximity ranking.

use crate::models::{Match, Round};

/// Matches of one round, ordered by id ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundGroup<'a> {
    pub round: Round,
    pub matches: Vec<&'a Match>,
}

impl<'a> RoundGroup<'a> {
    pub fn priority(&self) -> u8 {
        self.round.priority()
    }

    pub fn finished_count(&self) -> usize {
        self.matches.iter().filter(|m| m.is_finished()).count()
    }
}

/// A partition of matches by round.
///
/// Groups are held in first-appearance order; `ranked` reorders them by
/// elimination proximity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundGroups<'a> {
    groups: Vec<RoundGroup<'a>>,
}

impl<'a> RoundGroups<'a> {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn get(&self, round: &Round) -> Option<&RoundGroup<'a>> {
        self.groups.iter().find(|g| &g.round == round)
    }

    /// Groups in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = &RoundGroup<'a>> {
        self.groups.iter()
    }

    /// Groups ordered by priority (final first). Unranked rounds keep their
    /// first-appearance order at the end.
    pub fn ranked(&self) -> Vec<&RoundGroup<'a>> {
        let mut ranked: Vec<_> = self.groups.iter().collect();
        ranked.sort_by_key(|g| g.priority());
        ranked
    }

    /// The most advanced round present.
    ///
    /// This assumes brackets are generated in order: if an earlier round still
    /// has pending matches while a later one exists, the later one is reported.
    pub fn active(&self) -> Option<&RoundGroup<'a>> {
        self.groups.iter().min_by_key(|g| g.priority())
    }

    pub fn total_matches(&self) -> usize {
        self.groups.iter().map(|g| g.matches.len()).sum()
    }
}

/// Partition matches by round name.
pub fn group_by_round(matches: &[Match]) -> RoundGroups<'_> {
    let mut groups: Vec<RoundGroup<'_>> = Vec::new();

    for m in matches {
        match groups.iter_mut().find(|g| g.round == m.round) {
            Some(group) => group.matches.push(m),
            None => groups.push(RoundGroup {
                round: m.round.clone(),
                matches: vec![m],
            }),
        }
    }

    for group in &mut groups {
        group.matches.sort_by(|a, b| a.id.cmp(&b.id));
    }

    RoundGroups { groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchId, TeamId};

    fn m(id: i64, round: Round) -> Match {
        Match::new(id, round, Some(TeamId::from(1)), Some(TeamId::from(2)))
    }

    fn ids(group: &RoundGroup<'_>) -> Vec<MatchId> {
        group.matches.iter().map(|m| m.id.clone()).collect()
    }

    #[test]
    fn test_empty_input() {
        let groups = group_by_round(&[]);
        assert!(groups.is_empty());
        assert!(groups.active().is_none());
        assert!(groups.ranked().is_empty());
    }

    #[test]
    fn test_quarter_and_semi_active_is_semi() {
        let matches = vec![
            m(1, Round::QuarterFinal),
            m(2, Round::QuarterFinal),
            m(3, Round::SemiFinal),
        ];
        let groups = group_by_round(&matches);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.active().unwrap().round, Round::SemiFinal);
    }

    #[test]
    fn test_matches_ordered_by_id() {
        let matches = vec![m(10, Round::Final), m(2, Round::Final), m(9, Round::Final)];
        let groups = group_by_round(&matches);

        let final_group = groups.get(&Round::Final).unwrap();
        assert_eq!(
            ids(final_group),
            vec![MatchId::from(2), MatchId::from(9), MatchId::from(10)]
        );
    }

    #[test]
    fn test_ranked_order_with_unknown_rounds() {
        let matches = vec![
            m(1, Round::Other("grupo B".into())),
            m(2, Round::RoundOf16),
            m(3, Round::Unknown),
            m(4, Round::Other("grupo A".into())),
            m(5, Round::Final),
            m(6, Round::SemiFinal),
        ];
        let groups = group_by_round(&matches);
        let order: Vec<Round> = groups.ranked().iter().map(|g| g.round.clone()).collect();

        assert_eq!(
            order,
            vec![
                Round::Final,
                Round::SemiFinal,
                Round::RoundOf16,
                Round::Other("grupo B".into()),
                Round::Unknown,
                Round::Other("grupo A".into()),
            ]
        );
    }

    #[test]
    fn test_null_round_gets_own_bucket() {
        let json = r#"[{"id": 1, "ronda": null}, {"id": 2}, {"id": 3, "ronda": "final"},
            {"id": 4, "ronda": "unknown"}]"#;
        let matches: Vec<Match> = serde_json::from_str(json).unwrap();
        let groups = group_by_round(&matches);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get(&Round::Unknown).unwrap().matches.len(), 3);
        assert_eq!(groups.get(&Round::Final).unwrap().matches.len(), 1);
    }

    #[test]
    fn test_grouping_is_a_partition() {
        let matches = vec![
            m(1, Round::QuarterFinal),
            m(2, Round::Other("repechaje".into())),
            m(3, Round::QuarterFinal),
            m(4, Round::Unknown),
            m(5, Round::SemiFinal),
            m(6, Round::Other("repechaje".into())),
        ];
        let groups = group_by_round(&matches);

        assert_eq!(groups.total_matches(), matches.len());

        let mut seen: Vec<MatchId> = groups.iter().flat_map(ids).collect();
        seen.sort();
        let mut expected: Vec<MatchId> = matches.iter().map(|m| m.id.clone()).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_finished_count() {
        let matches = vec![
            m(1, Round::SemiFinal).finished(1, 0),
            m(2, Round::SemiFinal),
        ];
        let groups = group_by_round(&matches);
        assert_eq!(groups.get(&Round::SemiFinal).unwrap().finished_count(), 1);
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard ordering.

use crate::models::{RankOrder, RankedSubject, ScoreBreakdown, Subject};
use std::cmp::Ordering;

/// Order scored subjects by grand total and assign ranks 1..N.
///
/// Equal totals fall back to display name, then ID, so the ordering is total
/// and stable across calls.
pub fn rank_subjects(
    mut scored: Vec<(Subject, ScoreBreakdown)>,
    order: RankOrder,
) -> Vec<RankedSubject> {
    scored.sort_by(|(subject_a, a), (subject_b, b)| {
        compare_totals(a.total, b.total, order)
            .then_with(|| subject_a.display_name().cmp(subject_b.display_name()))
            .then_with(|| subject_a.id().cmp(&subject_b.id()))
    });

    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (subject, breakdown))| RankedSubject {
            rank: idx as u32 + 1,
            subject,
            breakdown,
        })
        .collect()
}

fn compare_totals(a: f64, b: f64, order: RankOrder) -> Ordering {
    match order {
        RankOrder::Descending => b.total_cmp(&a),
        RankOrder::Ascending => a.total_cmp(&b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn athlete(id: u64, username: &str, total: f64) -> (Subject, ScoreBreakdown) {
        (
            Subject::Athlete {
                id,
                username: username.to_string(),
            },
            ScoreBreakdown {
                total,
                ..Default::default()
            },
        )
    }

    fn ranked_ids(ranked: &[RankedSubject]) -> Vec<u64> {
        ranked.iter().map(|r| r.subject.id()).collect()
    }

    #[test]
    fn test_descending_puts_highest_first() {
        let ranked = rank_subjects(
            vec![athlete(1, "low", 80.0), athlete(2, "high", 120.0)],
            RankOrder::Descending,
        );

        assert_eq!(ranked_ids(&ranked), vec![2, 1]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_ascending_puts_lowest_first() {
        let ranked = rank_subjects(
            vec![athlete(1, "low", 80.0), athlete(2, "high", 120.0)],
            RankOrder::Ascending,
        );

        assert_eq!(ranked_ids(&ranked), vec![1, 2]);
    }

    #[test]
    fn test_ties_break_on_name_then_id() {
        let ranked = rank_subjects(
            vec![
                athlete(3, "bob", 50.0),
                athlete(2, "alice", 50.0),
                athlete(1, "bob", 50.0),
            ],
            RankOrder::Descending,
        );

        assert_eq!(ranked_ids(&ranked), vec![2, 1, 3]);
        let ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_subjects(vec![], RankOrder::Descending).is_empty());
    }
}

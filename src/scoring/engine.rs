// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Budgeted points allocation.
//!
//! For each discipline the activities are consumed slowest-first (lowest
//! distance per second) against the discipline's duration budget. An activity
//! that straddles the budget boundary earns partial credit for the fraction of
//! its distance covered in the remaining time, assuming constant pace.

use crate::models::{Activity, DisciplineScore, ScoreBreakdown};
use crate::scoring::DisciplineRule;

/// Score one discipline for one subject.
///
/// Activities of other disciplines are ignored. Unscorable activities (zero
/// run time, negative or non-finite distance) are skipped.
pub fn score_discipline(rule: &DisciplineRule, activities: &[Activity]) -> DisciplineScore {
    let discipline = &rule.discipline;
    let budget = rule.duration_secs;

    let mut score = DisciplineScore {
        discipline_id: discipline.id,
        duration_budget_secs: budget,
        ..Default::default()
    };

    let mut candidates: Vec<&Activity> = activities
        .iter()
        .filter(|a| a.discipline_id == discipline.id)
        .filter(|a| {
            if !a.is_scorable() {
                tracing::warn!(
                    activity_id = a.id,
                    distance = a.distance,
                    run_time_secs = a.run_time_secs,
                    "Skipping unscorable activity"
                );
            }
            a.is_scorable()
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.efficiency_ratio()
            .total_cmp(&b.efficiency_ratio())
            .then_with(|| a.id.cmp(&b.id))
    });

    for activity in candidates {
        let used = score.duration_used_secs;
        if used >= budget {
            break;
        }

        // `used < budget` here, so the subtraction cannot underflow.
        if activity.run_time_secs <= budget - used {
            score.duration_used_secs += activity.run_time_secs;
            score.points += activity.distance * discipline.points_per_unit;
            score.activity_ids.push(activity.id);
            continue;
        }

        // Boundary activity: credit the distance covered in the remaining time.
        let remaining = budget - used;
        let partial_distance = activity.distance * remaining as f64 / activity.run_time_secs as f64;
        score.points += partial_distance * discipline.points_per_unit;
        score.duration_used_secs = budget;
        score.activity_ids.push(activity.id);
        break;
    }

    score
}

/// Score every discipline of a race and sum the grand total.
///
/// `activities` is the subject's whole pool (one athlete, or the union of a
/// team's members); each rule picks out its own discipline.
pub fn score_activities(rules: &[DisciplineRule], activities: &[Activity]) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();

    for rule in rules {
        let score = score_discipline(rule, activities);
        breakdown.total += score.points;
        breakdown
            .per_discipline
            .insert(rule.discipline.name.clone(), score);
    }

    breakdown
}

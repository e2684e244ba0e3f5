// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Elevation challenge.
//!
//! Kept apart from the distance scoring: points are positive elevation gain
//! times the discipline's `elevation_gain_coeff`, with no duration budget. The
//! time fields of the returned entries are left at zero.

use crate::models::{Activity, DisciplineScore, ScoreBreakdown};
use crate::scoring::DisciplineRule;

/// Score the elevation challenge for one subject.
pub fn score_elevation(rules: &[DisciplineRule], activities: &[Activity]) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();

    for rule in rules {
        let discipline = &rule.discipline;
        let mut score = DisciplineScore {
            discipline_id: discipline.id,
            ..Default::default()
        };

        for activity in activities
            .iter()
            .filter(|a| a.discipline_id == discipline.id)
            .filter(|a| a.positive_elevation_gain.is_finite() && a.positive_elevation_gain > 0.0)
        {
            score.points += activity.positive_elevation_gain * discipline.elevation_gain_coeff;
            score.activity_ids.push(activity.id);
        }

        breakdown.total += score.points;
        breakdown
            .per_discipline
            .insert(discipline.name.clone(), score);
    }

    breakdown
}

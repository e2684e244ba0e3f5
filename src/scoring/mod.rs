// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Scoring engine.
//!
//! Pure functions over already-loaded race configuration and activities:
//! - `engine`: budgeted per-discipline points allocation
//! - `ranking`: leaderboard ordering
//! - `elevation`: optional elevation challenge, scored separately

pub mod elevation;
pub mod engine;
pub mod ranking;

pub use elevation::score_elevation;
pub use engine::{score_activities, score_discipline};
pub use ranking::rank_subjects;

use crate::models::Discipline;

/// A race discipline resolved against its discipline record.
#[derive(Debug, Clone)]
pub struct DisciplineRule {
    pub discipline: Discipline,
    /// Time budget (seconds) for this discipline in this race
    pub duration_secs: u64,
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Race configuration: disciplines, per-race duration budgets and team categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default per-discipline duration budget (24 hours).
pub const DEFAULT_DURATION_SECS: u64 = 24 * 60 * 60;

/// An activity category (running, cycling, ...) with its scoring rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discipline {
    pub id: u64,
    /// Display name, also used as the key of score breakdowns
    pub name: String,
    /// Points awarded per unit of distance
    pub points_per_unit: f64,
    /// Points per unit of positive elevation gain (elevation challenge only)
    #[serde(default)]
    pub elevation_gain_coeff: f64,
    /// Strava sport types imported as this discipline (e.g. "Run", "TrailRun")
    #[serde(default)]
    pub sport_types: Vec<String>,
}

impl Discipline {
    /// Whether a Strava sport type maps onto this discipline.
    pub fn matches_sport_type(&self, sport_type: &str) -> bool {
        self.sport_types
            .iter()
            .any(|s| s.eq_ignore_ascii_case(sport_type))
    }
}

/// A discipline attached to a race, with the time budget that counts toward points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceDiscipline {
    pub discipline_id: u64,
    /// Maximum activity time (seconds) scored for this discipline
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
}

fn default_duration_secs() -> u64 {
    DEFAULT_DURATION_SECS
}

/// A competitive event definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Race {
    pub id: u64,
    pub name: String,
    /// Activities starting before this instant are ignored
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    /// Activities starting at or after this instant are ignored
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub disciplines: Vec<RaceDiscipline>,
}

impl Race {
    /// Check whether an activity start date falls inside the race window.
    pub fn contains(&self, start_date: DateTime<Utc>) -> bool {
        self.starts_at.is_none_or(|start| start_date >= start)
            && self.ends_at.is_none_or(|end| start_date < end)
    }
}

/// Team category; bounds how many athletes a team may hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub max_members: u32,
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Logged activity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// One logged effort by one athlete in one discipline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: u64,
    /// Owning athlete
    pub athlete_id: u64,
    pub discipline_id: u64,
    /// Distance in distance units (the unit `points_per_unit` is expressed in)
    pub distance: f64,
    /// Elapsed (moving) time in seconds
    pub run_time_secs: u64,
    /// Average speed in distance units per hour
    #[serde(default)]
    pub average_speed: f64,
    #[serde(default)]
    pub positive_elevation_gain: f64,
    #[serde(default)]
    pub negative_elevation_gain: f64,
    /// Start date/time
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub source: ActivitySource,
    /// Remote (Strava) activity ID for imported activities
    #[serde(default)]
    pub remote_id: Option<u64>,
}

impl Activity {
    /// Distance covered per second; used to order activities for budget consumption.
    pub fn efficiency_ratio(&self) -> f64 {
        self.distance / self.run_time_secs as f64
    }

    /// Whether this activity can be scored at all.
    pub fn is_scorable(&self) -> bool {
        self.run_time_secs > 0 && self.distance.is_finite() && self.distance >= 0.0
    }
}

/// Where an activity came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySource {
    #[default]
    Manual,
    Strava,
}

/// User-submitted activity, validated before it is stored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewActivity {
    pub discipline_id: u64,
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub distance: f64,
    /// Elapsed time as `HH:MM:SS` (or `MM:SS`)
    #[validate(custom(function = "validate_run_time"))]
    pub run_time: String,
    #[validate(range(min = 0.0))]
    pub average_speed: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub positive_elevation_gain: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub negative_elevation_gain: f64,
    pub start_date: DateTime<Utc>,
}

/// Longest effort accepted as a single activity (one week).
pub const MAX_RUN_TIME_SECS: u64 = 7 * 24 * 60 * 60;

fn validate_run_time(run_time: &str) -> Result<(), ValidationError> {
    match crate::time_utils::parse_run_time(run_time) {
        Some(secs) if secs > 0 && secs <= MAX_RUN_TIME_SECS => Ok(()),
        _ => Err(ValidationError::new("run_time")),
    }
}

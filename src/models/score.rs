// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Scoring results and ranking types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Points awarded for one discipline of a race.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisciplineScore {
    pub discipline_id: u64,
    pub points: f64,
    /// Contributing activities, in consumption order
    pub activity_ids: Vec<u64>,
    /// Activity time counted against the budget (seconds)
    pub duration_used_secs: u64,
    pub duration_budget_secs: u64,
}

/// Per-discipline breakdown plus grand total for one subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Keyed by discipline name
    pub per_discipline: BTreeMap<String, DisciplineScore>,
    pub total: f64,
}

/// An athlete's score in the race they compete in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteStats {
    pub athlete_id: u64,
    pub race_id: u64,
    pub breakdown: ScoreBreakdown,
}

/// Identifier of an entity to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectRef {
    Athlete(u64),
    Team(u64),
}

/// Scored entity with its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Subject {
    Athlete { id: u64, username: String },
    Team { id: u64, name: String },
}

impl Subject {
    pub fn id(&self) -> u64 {
        match self {
            Subject::Athlete { id, .. } | Subject::Team { id, .. } => *id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Subject::Athlete { username, .. } => username,
            Subject::Team { name, .. } => name,
        }
    }
}

/// One row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSubject {
    /// 1-based position
    pub rank: u32,
    pub subject: Subject,
    pub breakdown: ScoreBreakdown,
}

/// Which end of the point scale wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankOrder {
    /// Highest total ranks first
    #[default]
    Descending,
    /// Lowest total ranks first
    Ascending,
}

impl FromStr for RankOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desc" | "descending" => Ok(RankOrder::Descending),
            "asc" | "ascending" => Ok(RankOrder::Ascending),
            other => Err(format!("unknown rank order '{}'", other)),
        }
    }
}

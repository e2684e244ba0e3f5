// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod athlete;
pub mod race;
pub mod score;
pub mod team;

pub use activity::{Activity, ActivitySource, NewActivity};
pub use athlete::{Athlete, StravaToken};
pub use race::{Category, Discipline, Race, RaceDiscipline, DEFAULT_DURATION_SECS};
pub use score::{
    AthleteStats, DisciplineScore, RankOrder, RankedSubject, ScoreBreakdown, Subject, SubjectRef,
};
pub use team::{JoinCodeUpdate, NewTeam, Team};

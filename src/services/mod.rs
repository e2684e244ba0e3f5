// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod ranking;
pub mod strava;
pub mod team;

pub use activity::ActivityService;
pub use ranking::RankingService;
pub use strava::{ImportResult, StravaClient, StravaImporter};
pub use team::TeamService;

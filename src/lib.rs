// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! My24h: team fitness challenge backend
//!
//! This crate scores athletes and teams in duration-bounded, multi-discipline
//! races. Activities are logged by hand or imported from Strava, and each
//! discipline only counts up to its time budget in the race.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod scoring;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Db;
use services::{ActivityService, RankingService, StravaClient, StravaImporter, TeamService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub ranking_service: RankingService,
    pub team_service: TeamService,
    pub activity_service: ActivityService,
    pub strava_importer: StravaImporter,
}

impl AppState {
    /// Wire every service to one store.
    pub fn new(config: Config, db: Db) -> Self {
        let client = StravaClient::new(config.strava_api_url.clone());
        Self {
            ranking_service: RankingService::new(db.clone(), config.rank_order),
            team_service: TeamService::new(db.clone()),
            activity_service: ActivityService::new(db.clone()),
            strava_importer: StravaImporter::new(client, db.clone(), config.strava_page_size),
            config,
            db,
        }
    }
}

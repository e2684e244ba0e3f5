// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! My24h leaderboard report
//!
//! Loads a store snapshot, optionally imports Strava activities for linked
//! athletes, and prints every race's individual and per-category team
//! rankings as JSON.

use my24h::{
    config::Config, db::Db, models::RankedSubject, time_utils::format_utc_rfc3339, AppState,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Rankings for one race.
#[derive(Serialize)]
struct RaceReport {
    race_id: u64,
    race_name: String,
    individuals: Vec<RankedSubject>,
    teams: Vec<CategoryReport>,
}

#[derive(Serialize)]
struct CategoryReport {
    category_id: u64,
    category_name: String,
    ranking: Vec<RankedSubject>,
}

#[derive(Serialize)]
struct Report {
    generated_at: String,
    races: Vec<RaceReport>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        data_path = %config.data_path,
        order = ?config.rank_order,
        "Starting My24h report"
    );

    let db = Db::load_from_file(&config.data_path)?;
    let state = AppState::new(config.clone(), db);

    if config.strava_import {
        let results = state.strava_importer.import_linked_athletes().await;
        for (athlete_id, result) in results {
            if let Err(e) = result {
                tracing::warn!(athlete_id, error = %e, "Strava import failed");
            }
        }
        state.db.save_to_file(&config.data_path)?;
        tracing::info!(path = %config.data_path, "Snapshot saved after import");
    }

    let categories = state.db.categories();
    let mut races = Vec::new();

    for race in state.db.races() {
        let individuals = state.ranking_service.rank_race(race.id, None)?;

        let mut teams = Vec::new();
        for category in &categories {
            let ranking = state.ranking_service.rank_race(race.id, Some(category.id))?;
            if ranking.is_empty() {
                continue;
            }
            teams.push(CategoryReport {
                category_id: category.id,
                category_name: category.name.clone(),
                ranking,
            });
        }

        races.push(RaceReport {
            race_id: race.id,
            race_name: race.name,
            individuals,
            teams,
        });
    }

    let report = Report {
        generated_at: format_utc_rfc3339(chrono::Utc::now()),
        races,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Initialize structured JSON logging (to stderr, keeping stdout for the report).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("my24h=debug".parse().expect("valid directive"))
                .add_directive("info".parse().expect("valid directive")),
        )
        .with(format)
        .init();
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{TimeZone, Utc};
use my24h::config::Config;
use my24h::db::Db;
use my24h::error::AppError;
use my24h::models::NewActivity;
use my24h::AppState;
use tempfile::tempdir;

mod common;

#[test]
fn test_snapshot_round_trip_keeps_rankings_and_ids() {
    let state = common::create_test_state();
    state.team_service.join(2, 5, "fox-den").unwrap();
    let logged = state
        .activity_service
        .log_activity(
            5,
            NewActivity {
                discipline_id: 2,
                distance: 25.0,
                run_time: "1:00:00".to_string(),
                average_speed: None,
                positive_elevation_gain: 0.0,
                negative_elevation_gain: 0.0,
                start_date: Utc.with_ymd_and_hms(2024, 6, 1, 15, 0, 0).unwrap(),
            },
        )
        .unwrap();
    assert_eq!(logged.id, 11);
    let before = state.ranking_service.rank_race(1, Some(1)).unwrap();

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("snapshot.json");
    state.db.save_to_file(&path).unwrap();

    let reloaded = AppState::new(Config::default(), Db::load_from_file(&path).unwrap());
    let after = reloaded.ranking_service.rank_race(1, Some(1)).unwrap();
    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(&after) {
        assert_eq!(b.rank, a.rank);
        assert_eq!(b.subject, a.subject);
        common::assert_points(a.breakdown.total, b.breakdown.total);
    }

    // Foxes: frank's 90 running points plus erin's 25 km ride.
    let foxes = after.iter().find(|r| r.subject.id() == 2).unwrap();
    common::assert_points(foxes.breakdown.total, 90.0 + 50.0);

    let next = reloaded
        .activity_service
        .log_activity(
            5,
            NewActivity {
                discipline_id: 1,
                distance: 1.0,
                run_time: "600".to_string(),
                average_speed: None,
                positive_elevation_gain: 0.0,
                negative_elevation_gain: 0.0,
                start_date: Utc.with_ymd_and_hms(2024, 6, 1, 16, 0, 0).unwrap(),
            },
        )
        .unwrap();
    assert_eq!(next.id, 12);
}

#[test]
fn test_load_missing_or_corrupt_snapshot() {
    let dir = tempdir().expect("tempdir");

    let err = Db::load_from_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    let err = Db::load_from_json("{ not json").unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
}

#[test]
fn test_empty_snapshot_ranks_nothing() {
    let state = AppState::new(Config::default(), Db::load_from_json("{}").unwrap());

    assert!(state.db.races().is_empty());
    let err = state.ranking_service.rank_race(1, None).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

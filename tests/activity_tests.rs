// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{TimeZone, Utc};
use my24h::error::AppError;
use my24h::models::{ActivitySource, NewActivity, SubjectRef};

mod common;

fn run(distance: f64, run_time: &str) -> NewActivity {
    NewActivity {
        discipline_id: 1,
        distance,
        run_time: run_time.to_string(),
        average_speed: None,
        positive_elevation_gain: 0.0,
        negative_elevation_gain: 0.0,
        start_date: Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap(),
    }
}

#[test]
fn test_log_activity_derives_speed() {
    let state = common::create_test_state();

    let activity = state
        .activity_service
        .log_activity(5, run(10.0, "01:00:00"))
        .unwrap();

    assert_eq!(activity.id, 11);
    assert_eq!(activity.athlete_id, 5);
    assert_eq!(activity.run_time_secs, 3600);
    assert_eq!(activity.source, ActivitySource::Manual);
    common::assert_points(activity.average_speed, 10.0);
}

#[test]
fn test_log_activity_keeps_supplied_speed() {
    let state = common::create_test_state();

    let mut new_activity = run(10.0, "50:00");
    new_activity.average_speed = Some(13.5);
    let activity = state
        .activity_service
        .log_activity(5, new_activity)
        .unwrap();

    assert_eq!(activity.run_time_secs, 3000);
    assert_eq!(activity.average_speed, 13.5);
}

#[test]
fn test_log_activity_rejects_bad_input() {
    let state = common::create_test_state();

    for bad in [
        run(-1.0, "01:00:00"),
        run(5.0, "00:00:00"),
        run(5.0, "1:75:00"),
        run(5.0, "5124095576030432:00:00"),
        run(5.0, "18446744073709551615"),
        run(5.0, "200:00:00"),
    ] {
        let err = state.activity_service.log_activity(5, bad).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)), "got {:?}", err);
    }

    let mut unknown = run(5.0, "30:00");
    unknown.discipline_id = 99;
    let err = state.activity_service.log_activity(5, unknown).unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = state
        .activity_service
        .log_activity(404, run(5.0, "30:00"))
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_logged_activity_counts_towards_score() {
    let state = common::create_test_state();

    // bob has 1800 s of running left in his 3600 s budget.
    state
        .activity_service
        .log_activity(2, run(3.0, "00:30:00"))
        .unwrap();

    let breakdown = state
        .ranking_service
        .score_subject(SubjectRef::Athlete(2), 1)
        .unwrap();
    common::assert_points(breakdown.total, 110.0 + 30.0);
}

#[test]
fn test_delete_activity_owner_only() {
    let state = common::create_test_state();

    let err = state.activity_service.delete_activity(2, 1).unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert!(state.db.get_activity(1).is_some());

    state.activity_service.delete_activity(1, 1).unwrap();
    assert!(state.db.get_activity(1).is_none());

    let err = state.activity_service.delete_activity(1, 1).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_list_activities_newest_first() {
    let state = common::create_test_state();

    let ids: Vec<u64> = state
        .activity_service
        .list_activities(2)
        .unwrap()
        .iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, vec![5, 4, 3, 6]);

    assert!(state.activity_service.list_activities(5).unwrap().is_empty());
}

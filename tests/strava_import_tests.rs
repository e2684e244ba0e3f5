// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava import against a mock API server.

use chrono::{TimeZone, Utc};
use my24h::models::{ActivitySource, StravaToken, SubjectRef};
use my24h::services::ImportResult;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

/// 2024-06-01T00:00:00Z, start of the sample race.
const RACE_START: &str = "1717200000";

fn summary(id: u64, sport_type: &str, meters: f64, secs: u64, start: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Activity {}", id),
        "sport_type": sport_type,
        "start_date": start,
        "distance": meters,
        "moving_time": secs,
        "total_elevation_gain": 42.0,
        "average_speed": meters / secs as f64,
    })
}

async fn mount_page(server: &MockServer, token: &str, page: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .and(query_param("after", RACE_START))
        .and(query_param("per_page", "2"))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_gina_pages(server: &MockServer) {
    mount_page(
        server,
        "gina-token",
        "1",
        json!([
            summary(9001, "Run", 10_000.0, 3000, "2024-06-01T06:00:00Z"),
            summary(9002, "Swim", 1_500.0, 1800, "2024-06-01T07:00:00Z"),
        ]),
    )
    .await;
    mount_page(
        server,
        "gina-token",
        "2",
        json!([
            summary(9003, "Ride", 20_000.0, 3600, "2024-06-01T09:00:00Z"),
            summary(9004, "TrailRun", 5_000.0, 1800, "2024-06-03T09:00:00Z"),
        ]),
    )
    .await;
    mount_page(server, "gina-token", "3", json!([])).await;
}

#[tokio::test]
async fn test_import_maps_sports_and_pages() {
    let server = MockServer::start().await;
    mount_gina_pages(&server).await;
    let state = common::create_test_state_with_strava(&server.uri());

    let result = state.strava_importer.import_for_athlete(7).await.unwrap();

    // Swim is not part of the race and 9004 is after the race window.
    assert_eq!(
        result,
        ImportResult {
            imported: 2,
            skipped: 2
        }
    );

    let activities = state.activity_service.list_activities(7).unwrap();
    assert_eq!(activities.len(), 2);
    let run = activities
        .iter()
        .find(|a| a.remote_id == Some(9001))
        .unwrap();
    assert_eq!(run.discipline_id, 1);
    assert_eq!(run.source, ActivitySource::Strava);
    assert_eq!(run.run_time_secs, 3000);
    common::assert_points(run.distance, 10.0);
    common::assert_points(run.average_speed, 12.0);
    assert_eq!(run.positive_elevation_gain, 42.0);

    let breakdown = state
        .ranking_service
        .score_subject(SubjectRef::Athlete(7), 1)
        .unwrap();
    common::assert_points(breakdown.total, 100.0 + 40.0);
}

#[tokio::test]
async fn test_reimport_skips_duplicates() {
    let server = MockServer::start().await;
    mount_gina_pages(&server).await;
    let state = common::create_test_state_with_strava(&server.uri());

    state.strava_importer.import_for_athlete(7).await.unwrap();
    let again = state.strava_importer.import_for_athlete(7).await.unwrap();

    assert_eq!(
        again,
        ImportResult {
            imported: 0,
            skipped: 4
        }
    );
    assert_eq!(state.activity_service.list_activities(7).unwrap().len(), 2);
}

#[tokio::test]
async fn test_expired_token_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    let state = common::create_test_state_with_strava(&server.uri());

    let err = state.strava_importer.import_for_athlete(8).await.unwrap_err();
    assert!(err.is_strava_token_error());

    // No Strava account at all.
    let err = state.strava_importer.import_for_athlete(1).await.unwrap_err();
    assert!(err.is_strava_token_error());
}

#[tokio::test]
async fn test_rate_limit_and_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    let state = common::create_test_state_with_strava(&server.uri());

    let err = state.strava_importer.import_for_athlete(7).await.unwrap_err();
    assert!(err.is_rate_limited());
    assert!(!err.is_strava_token_error());

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Authorization Error"))
        .mount(&server)
        .await;
    let state = common::create_test_state_with_strava(&server.uri());

    let err = state.strava_importer.import_for_athlete(7).await.unwrap_err();
    assert!(err.is_strava_token_error());
}

#[tokio::test]
async fn test_link_strava_then_import() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "alice-token",
        "1",
        json!([summary(7001, "Ride", 36_000.0, 3600, "2024-06-01T20:00:00Z")]),
    )
    .await;
    let state = common::create_test_state_with_strava(&server.uri());

    let token = StravaToken {
        access_token: "alice-token".to_string(),
        expires_at: Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap(),
    };
    state.strava_importer.link_strava(1, 123_456, token).unwrap();
    assert_eq!(state.db.get_athlete(1).unwrap().strava_id, Some(123_456));

    let result = state.strava_importer.import_for_athlete(1).await.unwrap();
    assert_eq!(result.imported, 1);

    // 36 km of cycling on top of alice's 160 running points.
    let breakdown = state
        .ranking_service
        .score_subject(SubjectRef::Athlete(1), 1)
        .unwrap();
    common::assert_points(breakdown.total, 160.0 + 72.0);
}

#[tokio::test]
async fn test_import_linked_athletes_reports_each() {
    let server = MockServer::start().await;
    mount_gina_pages(&server).await;
    let state = common::create_test_state_with_strava(&server.uri());

    let mut results = state.strava_importer.import_linked_athletes().await;
    results.sort_by_key(|(id, _)| *id);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, 7);
    assert_eq!(results[0].1.as_ref().unwrap().imported, 2);
    assert_eq!(results[1].0, 8);
    assert!(results[1].1.as_ref().unwrap_err().is_strava_token_error());
}

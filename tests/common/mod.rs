// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use my24h::config::Config;
use my24h::db::Db;
use my24h::AppState;

/// Path of the sample snapshot shipped in `data/`.
#[allow(dead_code)]
pub const SNAPSHOT_PATH: &str = "data/snapshot.json";

/// Load the sample snapshot into a fresh store.
#[allow(dead_code)]
pub fn test_db() -> Db {
    Db::load_from_file(SNAPSHOT_PATH).expect("Failed to load snapshot - is data/ committed?")
}

/// Create a test state over the sample snapshot.
#[allow(dead_code)]
pub fn create_test_state() -> AppState {
    AppState::new(Config::default(), test_db())
}

/// Create a test state whose Strava client points at a mock server.
#[allow(dead_code)]
pub fn create_test_state_with_strava(strava_api_url: &str) -> AppState {
    let config = Config {
        strava_api_url: strava_api_url.to_string(),
        strava_page_size: 2,
        ..Config::default()
    };
    AppState::new(config, test_db())
}

/// Compare floating point scores.
#[allow(dead_code)]
pub fn assert_points(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} points, got {}",
        expected,
        actual
    );
}

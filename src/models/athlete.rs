//! Athlete model for storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered competitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Athlete {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Race entered as an individual
    #[serde(default)]
    pub race_id: Option<u64>,
    /// Team membership (at most one)
    #[serde(default)]
    pub team_id: Option<u64>,
    /// Linked Strava athlete ID
    #[serde(default)]
    pub strava_id: Option<u64>,
    /// Stored Strava access token
    #[serde(default)]
    pub strava_token: Option<StravaToken>,
}

/// Strava access token with its expiry.
///
/// Refreshing is handled outside this crate; an expired token is reported as
/// a Strava token error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StravaToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl StravaToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

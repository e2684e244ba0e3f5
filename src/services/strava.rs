// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client and activity importer.
//!
//! Handles:
//! - Paginated activity listing with a stored access token
//! - Mapping Strava sport types onto race disciplines
//! - Duplicate detection on re-import
//! - Rate limit and token error detection
//!
//! Token refresh is not done here: an athlete whose token is missing or
//! expired gets a token error and must reconnect.

use crate::db::Db;
use crate::error::AppError;
use crate::models::{Activity, ActivitySource, StravaToken};
use chrono::{DateTime, Utc};
use futures_util::{stream, StreamExt};
use serde::Deserialize;

/// Upper bound on pages fetched per athlete in one import.
const MAX_PAGES: u32 = 50;

/// Athletes imported concurrently by `import_linked_athletes`.
const MAX_CONCURRENT_IMPORTS: usize = 8;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
}

impl StravaClient {
    /// Create a client against the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// List the authenticated athlete's activities (paginated).
    pub async fn list_activities(
        &self,
        access_token: &str,
        after: i64, // Unix timestamp
        before: Option<i64>,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivitySummary>, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);

        let mut query = vec![
            ("after", after.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(before) = before {
            query.push(("before", before.to_string()));
        }

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&query)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // Rate limit - caller may retry later
            if status.as_u16() == 429 {
                tracing::warn!("Strava rate limit hit (429)");
                return Err(AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string()));
            }

            // Unauthorized - token expired or revoked
            if status.as_u16() == 401 {
                return Err(AppError::StravaApi(
                    AppError::STRAVA_TOKEN_ERROR.to_string(),
                ));
            }

            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

/// Summary activity from the list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivitySummary {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub sport_type: String,
    pub start_date: DateTime<Utc>,
    /// Meters
    pub distance: f64,
    /// Seconds
    pub moving_time: u64,
    /// Meters
    #[serde(default)]
    pub total_elevation_gain: f64,
    /// Meters per second
    #[serde(default)]
    pub average_speed: f64,
}

impl StravaActivitySummary {
    /// Convert to a stored activity (kilometres, km/h) for the given discipline.
    pub fn into_activity(self, athlete_id: u64, discipline_id: u64) -> Activity {
        Activity {
            id: 0,
            athlete_id,
            discipline_id,
            distance: self.distance / 1000.0,
            run_time_secs: self.moving_time,
            average_speed: self.average_speed * 3.6,
            positive_elevation_gain: self.total_elevation_gain,
            negative_elevation_gain: 0.0,
            start_date: self.start_date,
            source: ActivitySource::Strava,
            remote_id: Some(self.id),
        }
    }
}

/// Outcome of importing one athlete's activities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub imported: u32,
    pub skipped: u32,
}

/// Imports Strava activities into the store.
#[derive(Clone)]
pub struct StravaImporter {
    client: StravaClient,
    db: Db,
    page_size: u32,
}

impl StravaImporter {
    pub fn new(client: StravaClient, db: Db, page_size: u32) -> Self {
        Self {
            client,
            db,
            page_size: page_size.max(1),
        }
    }

    /// Link a Strava account (and its current access token) to an athlete.
    pub fn link_strava(
        &self,
        athlete_id: u64,
        strava_id: u64,
        token: StravaToken,
    ) -> Result<(), AppError> {
        self.db.update_athlete(athlete_id, |athlete| {
            athlete.strava_id = Some(strava_id);
            athlete.strava_token = Some(token);
        })?;
        tracing::info!(athlete_id, strava_id, "Strava account linked");
        Ok(())
    }

    /// Import an athlete's Strava activities that fall inside their race window.
    ///
    /// Sports not mapped to any of the race's disciplines, zero-duration
    /// activities and activities imported earlier are skipped.
    pub async fn import_for_athlete(&self, athlete_id: u64) -> Result<ImportResult, AppError> {
        let athlete = self
            .db
            .get_athlete(athlete_id)
            .ok_or_else(|| AppError::NotFound(format!("Athlete {}", athlete_id)))?;

        let token = match athlete.strava_token.as_ref() {
            Some(token) if !token.is_expired(Utc::now()) => token.access_token.clone(),
            Some(_) => {
                tracing::warn!(athlete_id, "Strava token expired, skipping import");
                return Err(AppError::StravaApi(
                    AppError::STRAVA_TOKEN_ERROR.to_string(),
                ));
            }
            None => {
                return Err(AppError::StravaApi(
                    AppError::STRAVA_TOKEN_ERROR.to_string(),
                ))
            }
        };

        let race_id = self.db.effective_race_id(&athlete).ok_or_else(|| {
            AppError::BadRequest(format!("Athlete {} is not entered in any race", athlete_id))
        })?;
        let race = self
            .db
            .get_race(race_id)
            .ok_or_else(|| AppError::NotFound(format!("Race {}", race_id)))?;
        let rules = self.db.race_disciplines(&race)?;

        let after = race.starts_at.map(|d| d.timestamp()).unwrap_or(0);
        let before = race.ends_at.map(|d| d.timestamp());

        let mut result = ImportResult::default();

        for page in 1..=MAX_PAGES {
            let summaries = self
                .client
                .list_activities(&token, after, before, page, self.page_size)
                .await?;
            let fetched = summaries.len();

            for summary in summaries {
                if self.db.has_remote_activity(athlete_id, summary.id) {
                    result.skipped += 1;
                    continue;
                }

                let Some(rule) = rules
                    .iter()
                    .find(|r| r.discipline.matches_sport_type(&summary.sport_type))
                else {
                    tracing::debug!(
                        athlete_id,
                        remote_id = summary.id,
                        name = %summary.name,
                        sport_type = %summary.sport_type,
                        "No discipline for sport type"
                    );
                    result.skipped += 1;
                    continue;
                };

                if summary.moving_time == 0 || !race.contains(summary.start_date) {
                    result.skipped += 1;
                    continue;
                }

                let discipline_id = rule.discipline.id;
                self.db
                    .insert_activity(summary.into_activity(athlete_id, discipline_id));
                result.imported += 1;
            }

            if fetched < self.page_size as usize {
                break;
            }
        }

        tracing::info!(
            athlete_id,
            race_id,
            imported = result.imported,
            skipped = result.skipped,
            "Strava import finished"
        );
        Ok(result)
    }

    /// Import every athlete with a linked Strava account.
    ///
    /// Failures are returned per athlete rather than aborting the batch.
    pub async fn import_linked_athletes(&self) -> Vec<(u64, Result<ImportResult, AppError>)> {
        let athlete_ids: Vec<u64> = self
            .db
            .athletes()
            .into_iter()
            .filter(|a| a.strava_token.is_some())
            .map(|a| a.id)
            .collect();

        stream::iter(athlete_ids)
            .map(|athlete_id| async move { (athlete_id, self.import_for_athlete(athlete_id).await) })
            .buffer_unordered(MAX_CONCURRENT_IMPORTS)
            .collect()
            .await
    }
}

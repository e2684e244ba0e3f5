// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity logging service.
//!
//! Handles manually logged activities:
//! 1. Validate the submitted effort
//! 2. Check the athlete and discipline exist
//! 3. Derive average speed when it was not supplied
//! 4. Store the activity

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{Activity, ActivitySource, NewActivity};
use crate::time_utils::parse_run_time;
use validator::Validate;

/// Create, list and delete an athlete's activities.
#[derive(Clone)]
pub struct ActivityService {
    db: Db,
}

impl ActivityService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Log a new activity for an athlete.
    pub fn log_activity(&self, athlete_id: u64, new_activity: NewActivity) -> Result<Activity> {
        new_activity.validate()?;

        if self.db.get_athlete(athlete_id).is_none() {
            return Err(AppError::NotFound(format!("Athlete {}", athlete_id)));
        }
        if self.db.get_discipline(new_activity.discipline_id).is_none() {
            return Err(AppError::BadRequest(format!(
                "Unknown discipline {}",
                new_activity.discipline_id
            )));
        }

        let run_time_secs = parse_run_time(&new_activity.run_time)
            .filter(|&secs| secs > 0)
            .ok_or_else(|| AppError::BadRequest("Invalid run time".to_string()))?;

        let average_speed = new_activity
            .average_speed
            .unwrap_or_else(|| average_speed(new_activity.distance, run_time_secs));

        let activity = self.db.insert_activity(Activity {
            id: 0,
            athlete_id,
            discipline_id: new_activity.discipline_id,
            distance: new_activity.distance,
            run_time_secs,
            average_speed,
            positive_elevation_gain: new_activity.positive_elevation_gain,
            negative_elevation_gain: new_activity.negative_elevation_gain,
            start_date: new_activity.start_date,
            source: ActivitySource::Manual,
            remote_id: None,
        });

        tracing::info!(
            athlete_id,
            activity_id = activity.id,
            discipline_id = activity.discipline_id,
            distance = activity.distance,
            run_time_secs,
            "Activity logged"
        );
        Ok(activity)
    }

    /// Delete one of the athlete's own activities.
    pub fn delete_activity(&self, athlete_id: u64, activity_id: u64) -> Result<()> {
        let activity = self
            .db
            .get_activity(activity_id)
            .ok_or_else(|| AppError::NotFound(format!("Activity {}", activity_id)))?;

        if activity.athlete_id != athlete_id {
            return Err(AppError::Forbidden(format!(
                "Activity {} does not belong to athlete {}",
                activity_id, athlete_id
            )));
        }

        self.db.delete_activity(activity_id);
        tracing::info!(athlete_id, activity_id, "Activity deleted");
        Ok(())
    }

    /// An athlete's activities, most recent first.
    pub fn list_activities(&self, athlete_id: u64) -> Result<Vec<Activity>> {
        if self.db.get_athlete(athlete_id).is_none() {
            return Err(AppError::NotFound(format!("Athlete {}", athlete_id)));
        }

        let mut activities = self.db.activities_for_athletes(&[athlete_id]);
        activities.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
        Ok(activities)
    }
}

/// Distance units per hour.
pub(crate) fn average_speed(distance: f64, run_time_secs: u64) -> f64 {
    if run_time_secs == 0 {
        return 0.0;
    }
    distance * 3600.0 / run_time_secs as f64
}

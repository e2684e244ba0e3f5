// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store with typed operations.
//!
//! Holds:
//! - Race configuration (disciplines, races, categories)
//! - Athletes and teams
//! - Activities
//!
//! Collections are `DashMap`s behind an `Arc`, so a `Db` is cheap to clone and
//! safe to share between tasks. State can be loaded from and saved to a JSON
//! snapshot file.

use crate::error::AppError;
use crate::models::{Activity, Athlete, Category, Discipline, Race, Team};
use crate::scoring::DisciplineRule;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Serialized form of the whole store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub disciplines: Vec<Discipline>,
    #[serde(default)]
    pub races: Vec<Race>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub athletes: Vec<Athlete>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

#[derive(Debug, Default)]
struct Collections {
    disciplines: DashMap<u64, Discipline>,
    races: DashMap<u64, Race>,
    categories: DashMap<u64, Category>,
    athletes: DashMap<u64, Athlete>,
    teams: DashMap<u64, Team>,
    activities: DashMap<u64, Activity>,
    next_team_id: AtomicU64,
    next_activity_id: AtomicU64,
}

/// Shared store handle.
#[derive(Debug, Clone)]
pub struct Db {
    inner: Arc<Collections>,
}

impl Default for Db {
    fn default() -> Self {
        Self::new()
    }
}

impl Db {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::from_snapshot(Snapshot::default())
    }

    /// Load a store from a JSON snapshot file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let json_data = fs::read_to_string(path.as_ref()).map_err(|e| {
            AppError::Database(format!(
                "Failed to read snapshot {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::load_from_json(&json_data)
    }

    /// Load a store from a JSON snapshot string.
    pub fn load_from_json(json_data: &str) -> Result<Self, AppError> {
        let snapshot: Snapshot = serde_json::from_str(json_data)
            .map_err(|e| AppError::Database(format!("Failed to parse snapshot: {}", e)))?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Build a store from an in-memory snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let db = Self {
            inner: Arc::default(),
        };
        let inner = &db.inner;

        let max_team_id = snapshot.teams.iter().map(|t| t.id).max().unwrap_or(0);
        let max_activity_id = snapshot.activities.iter().map(|a| a.id).max().unwrap_or(0);
        inner.next_team_id.store(max_team_id + 1, Ordering::SeqCst);
        inner
            .next_activity_id
            .store(max_activity_id + 1, Ordering::SeqCst);

        tracing::info!(
            disciplines = snapshot.disciplines.len(),
            races = snapshot.races.len(),
            athletes = snapshot.athletes.len(),
            teams = snapshot.teams.len(),
            activities = snapshot.activities.len(),
            "Loaded snapshot"
        );

        for d in snapshot.disciplines {
            inner.disciplines.insert(d.id, d);
        }
        for r in snapshot.races {
            inner.races.insert(r.id, r);
        }
        for c in snapshot.categories {
            inner.categories.insert(c.id, c);
        }
        for a in snapshot.athletes {
            inner.athletes.insert(a.id, a);
        }
        for t in snapshot.teams {
            inner.teams.insert(t.id, t);
        }
        for a in snapshot.activities {
            inner.activities.insert(a.id, a);
        }

        db
    }

    /// Dump the store, each collection sorted by ID.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            disciplines: sorted_values(&self.inner.disciplines, |d| d.id),
            races: sorted_values(&self.inner.races, |r| r.id),
            categories: sorted_values(&self.inner.categories, |c| c.id),
            athletes: sorted_values(&self.inner.athletes, |a| a.id),
            teams: sorted_values(&self.inner.teams, |t| t.id),
            activities: sorted_values(&self.inner.activities, |a| a.id),
        }
    }

    /// Write the store to a JSON snapshot file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Snapshot encode error: {}", e)))?;
        fs::write(path.as_ref(), json).map_err(|e| {
            AppError::Database(format!(
                "Failed to write snapshot {}: {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    // ─── Race Configuration ──────────────────────────────────────

    pub fn upsert_discipline(&self, discipline: Discipline) {
        self.inner.disciplines.insert(discipline.id, discipline);
    }

    pub fn get_discipline(&self, discipline_id: u64) -> Option<Discipline> {
        self.inner
            .disciplines
            .get(&discipline_id)
            .map(|d| d.value().clone())
    }

    pub fn upsert_race(&self, race: Race) {
        self.inner.races.insert(race.id, race);
    }

    pub fn get_race(&self, race_id: u64) -> Option<Race> {
        self.inner.races.get(&race_id).map(|r| r.value().clone())
    }

    pub fn races(&self) -> Vec<Race> {
        sorted_values(&self.inner.races, |r| r.id)
    }

    pub fn upsert_category(&self, category: Category) {
        self.inner.categories.insert(category.id, category);
    }

    pub fn get_category(&self, category_id: u64) -> Option<Category> {
        self.inner.categories.get(&category_id).map(|c| c.value().clone())
    }

    pub fn categories(&self) -> Vec<Category> {
        sorted_values(&self.inner.categories, |c| c.id)
    }

    /// Resolve a race's disciplines into scoring rules, in race order.
    ///
    /// A race referencing an unknown discipline, or listing the same
    /// discipline ID or name twice, is a data error.
    pub fn race_disciplines(&self, race: &Race) -> Result<Vec<DisciplineRule>, AppError> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        let mut rules = Vec::with_capacity(race.disciplines.len());

        for rd in &race.disciplines {
            let discipline = self.get_discipline(rd.discipline_id).ok_or_else(|| {
                AppError::Database(format!(
                    "Race {} references unknown discipline {}",
                    race.id, rd.discipline_id
                ))
            })?;
            if !ids.insert(discipline.id) || !names.insert(discipline.name.clone()) {
                return Err(AppError::Database(format!(
                    "Race {} lists discipline {} ({}) more than once",
                    race.id, discipline.id, discipline.name
                )));
            }
            rules.push(DisciplineRule {
                discipline,
                duration_secs: rd.duration_secs,
            });
        }

        Ok(rules)
    }

    // ─── Athletes ────────────────────────────────────────────────

    pub fn upsert_athlete(&self, athlete: Athlete) {
        self.inner.athletes.insert(athlete.id, athlete);
    }

    pub fn get_athlete(&self, athlete_id: u64) -> Option<Athlete> {
        self.inner.athletes.get(&athlete_id).map(|a| a.value().clone())
    }

    pub fn athletes(&self) -> Vec<Athlete> {
        sorted_values(&self.inner.athletes, |a| a.id)
    }

    /// Race an athlete competes in: the team's race for team members,
    /// otherwise their own.
    pub fn effective_race_id(&self, athlete: &Athlete) -> Option<u64> {
        match athlete.team_id {
            Some(team_id) => self.get_team(team_id).map(|t| t.race_id),
            None => athlete.race_id,
        }
    }

    /// Athletes entered individually in a race (team members excluded).
    pub fn athletes_in_race(&self, race_id: u64) -> Vec<Athlete> {
        let mut athletes: Vec<Athlete> = self
            .inner
            .athletes
            .iter()
            .filter(|a| a.race_id == Some(race_id) && a.team_id.is_none())
            .map(|a| a.value().clone())
            .collect();
        athletes.sort_by_key(|a| a.id);
        athletes
    }

    /// Apply a change to an athlete record in place.
    pub fn update_athlete<F>(&self, athlete_id: u64, f: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Athlete),
    {
        let mut athlete = self
            .inner
            .athletes
            .get_mut(&athlete_id)
            .ok_or_else(|| AppError::NotFound(format!("Athlete {}", athlete_id)))?;
        f(athlete.value_mut());
        Ok(())
    }

    // ─── Teams ───────────────────────────────────────────────────

    /// Allocate a fresh team ID.
    pub fn next_team_id(&self) -> u64 {
        self.inner.next_team_id.fetch_add(1, Ordering::SeqCst)
    }

    pub fn upsert_team(&self, team: Team) {
        self.inner.teams.insert(team.id, team);
    }

    pub fn get_team(&self, team_id: u64) -> Option<Team> {
        self.inner.teams.get(&team_id).map(|t| t.value().clone())
    }

    pub fn delete_team(&self, team_id: u64) -> Option<Team> {
        self.inner.teams.remove(&team_id).map(|(_, t)| t)
    }

    /// Teams of a race, optionally restricted to one category.
    pub fn teams_in_race(&self, race_id: u64, category_id: Option<u64>) -> Vec<Team> {
        let mut teams: Vec<Team> = self
            .inner
            .teams
            .iter()
            .filter(|t| t.race_id == race_id)
            .filter(|t| category_id.is_none_or(|c| t.category_id == c))
            .map(|t| t.value().clone())
            .collect();
        teams.sort_by_key(|t| t.id);
        teams
    }

    pub fn team_members(&self, team_id: u64) -> Vec<Athlete> {
        let mut members: Vec<Athlete> = self
            .inner
            .athletes
            .iter()
            .filter(|a| a.team_id == Some(team_id))
            .map(|a| a.value().clone())
            .collect();
        members.sort_by_key(|a| a.id);
        members
    }

    /// Run `f` with exclusive access to a team record.
    ///
    /// Concurrent calls for the same team are serialized, so membership checks
    /// and updates made inside `f` are atomic with respect to each other. `f`
    /// may read and write athletes but must not touch other teams.
    pub fn with_team_locked<T, F>(&self, team_id: u64, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Team) -> Result<T, AppError>,
    {
        let mut team = self
            .inner
            .teams
            .get_mut(&team_id)
            .ok_or_else(|| AppError::NotFound(format!("Team {}", team_id)))?;
        f(team.value_mut())
    }

    // ─── Activities ──────────────────────────────────────────────

    /// Store a new activity, assigning its ID. Returns the stored record.
    pub fn insert_activity(&self, mut activity: Activity) -> Activity {
        activity.id = self.inner.next_activity_id.fetch_add(1, Ordering::SeqCst);
        self.inner.activities.insert(activity.id, activity.clone());
        activity
    }

    pub fn get_activity(&self, activity_id: u64) -> Option<Activity> {
        self.inner.activities.get(&activity_id).map(|a| a.value().clone())
    }

    pub fn delete_activity(&self, activity_id: u64) -> Option<Activity> {
        self.inner.activities.remove(&activity_id).map(|(_, a)| a)
    }

    /// All activities owned by any of the given athletes, sorted by ID.
    pub fn activities_for_athletes(&self, athlete_ids: &[u64]) -> Vec<Activity> {
        let mut activities: Vec<Activity> = self
            .inner
            .activities
            .iter()
            .filter(|a| athlete_ids.contains(&a.athlete_id))
            .map(|a| a.value().clone())
            .collect();
        activities.sort_by_key(|a| a.id);
        activities
    }

    /// Whether a remote activity has already been imported for this athlete.
    pub fn has_remote_activity(&self, athlete_id: u64, remote_id: u64) -> bool {
        self.inner
            .activities
            .iter()
            .any(|a| a.athlete_id == athlete_id && a.remote_id == Some(remote_id))
    }
}

fn sorted_values<V: Clone>(map: &DashMap<u64, V>, key: impl Fn(&V) -> u64) -> Vec<V> {
    let mut values: Vec<V> = map.iter().map(|e| e.value().clone()).collect();
    values.sort_by_key(|v| key(v));
    values
}

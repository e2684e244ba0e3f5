// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ranking service.
//!
//! Resolves races, subjects and activity pools from the store and feeds them
//! through the scoring engine. Individual stats, individual rankings and team
//! rankings all go through the same path:
//! 1. Resolve the race and its discipline rules
//! 2. Collect the subject's activity pool (one athlete, or every team member)
//! 3. Drop activities outside the race window
//! 4. Score, then order subjects

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{
    Activity, Athlete, AthleteStats, Race, RankOrder, RankedSubject, ScoreBreakdown, Subject,
    SubjectRef, Team,
};
use crate::scoring::{self, DisciplineRule};

/// Scoring function applied to one subject's activity pool.
type Scorer = fn(&[DisciplineRule], &[Activity]) -> ScoreBreakdown;

/// Computes scores and leaderboards over the store.
#[derive(Clone)]
pub struct RankingService {
    db: Db,
    order: RankOrder,
}

impl RankingService {
    pub fn new(db: Db, order: RankOrder) -> Self {
        Self { db, order }
    }

    /// Score one athlete or team in a race.
    pub fn score_subject(&self, subject: SubjectRef, race_id: u64) -> Result<ScoreBreakdown> {
        let race = self.get_race(race_id)?;
        let rules = self.db.race_disciplines(&race)?;

        let pool = match subject {
            SubjectRef::Athlete(athlete_id) => {
                let athlete = self.get_athlete(athlete_id)?;
                if self.db.effective_race_id(&athlete) != Some(race_id) {
                    return Err(AppError::BadRequest(format!(
                        "Athlete {} is not entered in race {}",
                        athlete_id, race_id
                    )));
                }
                self.pool_for(&race, &[athlete])
            }
            SubjectRef::Team(team_id) => {
                let team = self.get_team(team_id)?;
                if team.race_id != race_id {
                    return Err(AppError::BadRequest(format!(
                        "Team {} is not entered in race {}",
                        team_id, race_id
                    )));
                }
                self.pool_for(&race, &self.db.team_members(team_id))
            }
        };

        let breakdown = scoring::score_activities(&rules, &pool);
        tracing::debug!(
            ?subject,
            race_id,
            activities = pool.len(),
            total = breakdown.total,
            "Scored subject"
        );
        Ok(breakdown)
    }

    /// Score an athlete in whichever race they compete in.
    pub fn athlete_stats(&self, athlete_id: u64) -> Result<AthleteStats> {
        let athlete = self.get_athlete(athlete_id)?;
        let race_id = self.db.effective_race_id(&athlete).ok_or_else(|| {
            AppError::BadRequest(format!("Athlete {} is not entered in any race", athlete_id))
        })?;

        let breakdown = self.score_subject(SubjectRef::Athlete(athlete_id), race_id)?;
        Ok(AthleteStats {
            athlete_id,
            race_id,
            breakdown,
        })
    }

    /// Leaderboard for a race.
    ///
    /// Without a category, ranks the athletes entered individually; with a
    /// category, ranks the race's teams in that category.
    pub fn rank_race(&self, race_id: u64, category_id: Option<u64>) -> Result<Vec<RankedSubject>> {
        self.rank_with(race_id, category_id, scoring::score_activities)
    }

    /// Elevation-challenge leaderboard, ranked like `rank_race`.
    pub fn rank_elevation(
        &self,
        race_id: u64,
        category_id: Option<u64>,
    ) -> Result<Vec<RankedSubject>> {
        self.rank_with(race_id, category_id, scoring::score_elevation)
    }

    fn rank_with(
        &self,
        race_id: u64,
        category_id: Option<u64>,
        scorer: Scorer,
    ) -> Result<Vec<RankedSubject>> {
        let race = self.get_race(race_id)?;
        let rules = self.db.race_disciplines(&race)?;

        let scored: Vec<(Subject, ScoreBreakdown)> = match category_id {
            None => self
                .db
                .athletes_in_race(race_id)
                .into_iter()
                .map(|athlete| {
                    let pool = self.pool_for(&race, std::slice::from_ref(&athlete));
                    let subject = Subject::Athlete {
                        id: athlete.id,
                        username: athlete.username,
                    };
                    (subject, scorer(&rules, &pool))
                })
                .collect(),
            Some(category_id) => {
                if self.db.get_category(category_id).is_none() {
                    return Err(AppError::NotFound(format!("Category {}", category_id)));
                }
                self.db
                    .teams_in_race(race_id, Some(category_id))
                    .into_iter()
                    .map(|team| {
                        let pool = self.pool_for(&race, &self.db.team_members(team.id));
                        let subject = Subject::Team {
                            id: team.id,
                            name: team.name,
                        };
                        (subject, scorer(&rules, &pool))
                    })
                    .collect()
            }
        };

        let ranked = scoring::rank_subjects(scored, self.order);
        tracing::info!(
            race_id,
            category_id,
            subjects = ranked.len(),
            order = ?self.order,
            "Ranked race"
        );
        Ok(ranked)
    }

    /// Activities of the given athletes that fall inside the race window.
    fn pool_for(&self, race: &Race, athletes: &[Athlete]) -> Vec<Activity> {
        let ids: Vec<u64> = athletes.iter().map(|a| a.id).collect();
        let mut pool = self.db.activities_for_athletes(&ids);
        pool.retain(|a| race.contains(a.start_date));
        pool
    }

    fn get_race(&self, race_id: u64) -> Result<Race> {
        self.db
            .get_race(race_id)
            .ok_or_else(|| AppError::NotFound(format!("Race {}", race_id)))
    }

    fn get_athlete(&self, athlete_id: u64) -> Result<Athlete> {
        self.db
            .get_athlete(athlete_id)
            .ok_or_else(|| AppError::NotFound(format!("Athlete {}", athlete_id)))
    }

    fn get_team(&self, team_id: u64) -> Result<Team> {
        self.db
            .get_team(team_id)
            .ok_or_else(|| AppError::NotFound(format!("Team {}", team_id)))
    }
}

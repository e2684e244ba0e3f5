// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team management: creation, joining by code, members and admins.
//!
//! Membership lives on the athlete (`Athlete::team_id`); every change that
//! depends on the current member list runs under the team lock so capacity
//! checks cannot be raced.

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{Athlete, JoinCodeUpdate, NewTeam, Team};
use validator::Validate;

/// Team membership operations.
#[derive(Clone)]
pub struct TeamService {
    db: Db,
}

impl TeamService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Create a team; the creator becomes its first member and admin.
    pub fn create_team(&self, new_team: NewTeam, creator_id: u64) -> Result<Team> {
        new_team.validate()?;

        if self.db.get_race(new_team.race_id).is_none() {
            return Err(AppError::NotFound(format!("Race {}", new_team.race_id)));
        }
        if self.db.get_category(new_team.category_id).is_none() {
            return Err(AppError::NotFound(format!(
                "Category {}",
                new_team.category_id
            )));
        }

        let creator = self.get_athlete(creator_id)?;
        if let Some(existing) = creator.team_id {
            return Err(AppError::Conflict(format!(
                "Athlete {} is already a member of team {}",
                creator_id, existing
            )));
        }

        let team = Team {
            id: self.db.next_team_id(),
            name: new_team.name.trim().to_string(),
            race_id: new_team.race_id,
            category_id: new_team.category_id,
            join_code: new_team.join_code.trim().to_string(),
            admins: vec![creator_id],
        };
        self.db.upsert_team(team.clone());

        let joined = self.db.with_team_locked(team.id, |_| {
            claim_membership(&self.db, creator_id, team.id)
        });
        if let Err(e) = joined {
            // Creator joined another team in the meantime.
            self.db.delete_team(team.id);
            return Err(e);
        }

        tracing::info!(
            team_id = team.id,
            creator_id,
            race_id = team.race_id,
            "Team created"
        );
        Ok(team)
    }

    /// Join a team with its code, subject to the category's capacity.
    pub fn join(&self, team_id: u64, athlete_id: u64, join_code: &str) -> Result<()> {
        self.db.with_team_locked(team_id, |team| {
            // Read under the lock so repeated joins by one athlete serialize.
            let athlete = self.get_athlete(athlete_id)?;
            if team.join_code != join_code {
                tracing::debug!(team_id, athlete_id, "Join rejected: wrong code");
                return Err(AppError::Forbidden("Wrong join code".to_string()));
            }
            if athlete.team_id == Some(team_id) {
                return Err(AppError::BadRequest(format!(
                    "Athlete {} is already a member of team {}",
                    athlete_id, team_id
                )));
            }

            let category = self.db.get_category(team.category_id).ok_or_else(|| {
                AppError::Database(format!(
                    "Team {} references unknown category {}",
                    team_id, team.category_id
                ))
            })?;
            let members = self.db.team_members(team_id).len();
            if members >= category.max_members as usize {
                return Err(AppError::Conflict(format!(
                    "Team {} has reached its maximum of {} members",
                    team_id, category.max_members
                )));
            }

            claim_membership(&self.db, athlete_id, team_id)
        })?;

        tracing::info!(team_id, athlete_id, "Athlete joined team");
        Ok(())
    }

    /// Remove an athlete from a team.
    ///
    /// Admins may remove anyone; any member may remove themselves. The last
    /// admin cannot leave while other members remain.
    pub fn remove_member(&self, team_id: u64, actor_id: u64, athlete_id: u64) -> Result<()> {
        self.db.with_team_locked(team_id, |team| {
            if actor_id != athlete_id && !team.is_admin(actor_id) {
                return Err(AppError::Forbidden(format!(
                    "Athlete {} cannot manage team {}",
                    actor_id, team_id
                )));
            }

            let members = self.db.team_members(team_id);
            if !members.iter().any(|m| m.id == athlete_id) {
                return Err(AppError::NotFound(format!(
                    "Athlete {} in team {}",
                    athlete_id, team_id
                )));
            }
            if team.admins == [athlete_id] && members.len() > 1 {
                return Err(AppError::Conflict(
                    "The last admin cannot leave; appoint another admin first".to_string(),
                ));
            }

            team.admins.retain(|&id| id != athlete_id);
            self.db.update_athlete(athlete_id, |a| a.team_id = None)
        })?;

        tracing::info!(team_id, actor_id, athlete_id, "Athlete removed from team");
        Ok(())
    }

    /// Change the join code (admins only).
    pub fn set_join_code(
        &self,
        team_id: u64,
        actor_id: u64,
        update: JoinCodeUpdate,
    ) -> Result<()> {
        update.validate()?;
        let join_code = update.join_code.trim();

        self.db.with_team_locked(team_id, |team| {
            require_admin(team, actor_id)?;
            team.join_code = join_code.to_string();
            Ok(())
        })?;

        tracing::info!(team_id, actor_id, "Join code changed");
        Ok(())
    }

    /// Grant admin rights to a member.
    pub fn add_admin(&self, team_id: u64, actor_id: u64, athlete_id: u64) -> Result<()> {
        self.db.with_team_locked(team_id, |team| {
            require_admin(team, actor_id)?;
            let athlete = self
                .db
                .get_athlete(athlete_id)
                .ok_or_else(|| AppError::NotFound(format!("Athlete {}", athlete_id)))?;
            if athlete.team_id != Some(team_id) {
                return Err(AppError::Forbidden(format!(
                    "Athlete {} is not a member of team {}",
                    athlete_id, team_id
                )));
            }
            if !team.is_admin(athlete_id) {
                team.admins.push(athlete_id);
            }
            Ok(())
        })?;

        tracing::info!(team_id, actor_id, athlete_id, "Admin added");
        Ok(())
    }

    /// Revoke admin rights. A team always keeps at least one admin.
    pub fn remove_admin(&self, team_id: u64, actor_id: u64, athlete_id: u64) -> Result<()> {
        self.db.with_team_locked(team_id, |team| {
            require_admin(team, actor_id)?;
            if !team.is_admin(athlete_id) {
                return Err(AppError::BadRequest(format!(
                    "Athlete {} is not an admin of team {}",
                    athlete_id, team_id
                )));
            }
            if team.admins.len() <= 1 {
                return Err(AppError::Conflict(
                    "A team must keep at least one admin".to_string(),
                ));
            }
            team.admins.retain(|&id| id != athlete_id);
            Ok(())
        })?;

        tracing::info!(team_id, actor_id, athlete_id, "Admin removed");
        Ok(())
    }

    /// Current members of a team.
    pub fn members(&self, team_id: u64) -> Result<Vec<Athlete>> {
        if self.db.get_team(team_id).is_none() {
            return Err(AppError::NotFound(format!("Team {}", team_id)));
        }
        Ok(self.db.team_members(team_id))
    }

    fn get_athlete(&self, athlete_id: u64) -> Result<Athlete> {
        self.db
            .get_athlete(athlete_id)
            .ok_or_else(|| AppError::NotFound(format!("Athlete {}", athlete_id)))
    }
}

fn require_admin(team: &Team, actor_id: u64) -> Result<()> {
    if team.is_admin(actor_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Athlete {} is not an admin of team {}",
            actor_id, team.id
        )))
    }
}

/// Point an athlete at a team unless they already belong to another one.
fn claim_membership(db: &Db, athlete_id: u64, team_id: u64) -> Result<()> {
    let mut result = Ok(());
    db.update_athlete(athlete_id, |athlete| match athlete.team_id {
        Some(other) if other != team_id => {
            result = Err(AppError::Conflict(format!(
                "Athlete {} is already a member of team {}",
                athlete_id, other
            )));
        }
        _ => athlete.team_id = Some(team_id),
    })?;
    result
}

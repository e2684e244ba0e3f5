// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Team model.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A team competing in one race and one category.
///
/// Members are the athletes whose `team_id` points at this team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
    pub race_id: u64,
    pub category_id: u64,
    /// Code an athlete must present to join
    pub join_code: String,
    /// Athlete IDs allowed to manage the team
    #[serde(default)]
    pub admins: Vec<u64>,
}

impl Team {
    pub fn is_admin(&self, athlete_id: u64) -> bool {
        self.admins.contains(&athlete_id)
    }
}

/// Request to create a team.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTeam {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    pub race_id: u64,
    pub category_id: u64,
    #[validate(custom(function = "validate_join_code"))]
    pub join_code: String,
}

/// Replacement join code for an existing team.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JoinCodeUpdate {
    #[validate(custom(function = "validate_join_code"))]
    pub join_code: String,
}

/// Join codes are 4 to 32 characters once surrounding whitespace is dropped.
fn validate_join_code(join_code: &str) -> Result<(), ValidationError> {
    let chars = join_code.trim().chars().count();
    if (4..=32).contains(&chars) {
        Ok(())
    } else {
        Err(ValidationError::new("join_code_length"))
    }
}

//! Daily mood/energy check-ins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;

/// Highest accepted energy level.
pub const MAX_ENERGY_LEVEL: u32 = 10;

/// Self-reported mood, each carrying a score from 1 to 5.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mood {
    Stressed,
    Tired,
    Neutral,
    Good,
    Great,
}

impl Mood {
    pub fn score(&self) -> u32 {
        match self {
            Mood::Stressed => 1,
            Mood::Tired => 2,
            Mood::Neutral => 3,
            Mood::Good => 4,
            Mood::Great => 5,
        }
    }

    /// Moods that count towards the burnout warning.
    pub fn is_strained(&self) -> bool {
        matches!(self, Mood::Stressed | Mood::Tired)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Stressed => "STRESSED",
            Mood::Tired => "TIRED",
            Mood::Neutral => "NEUTRAL",
            Mood::Good => "GOOD",
            Mood::Great => "GREAT",
        }
    }
}

impl FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "STRESSED" => Ok(Mood::Stressed),
            "TIRED" => Ok(Mood::Tired),
            "NEUTRAL" => Ok(Mood::Neutral),
            "GOOD" => Ok(Mood::Good),
            "GREAT" => Ok(Mood::Great),
            _ => Err(ValidationError::InvalidValue {
                field: "mood".into(),
                message: format!("unknown mood '{s}'"),
            }),
        }
    }
}

/// One check-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackLog {
    pub id: String,
    pub date: DateTime<Utc>,
    pub mood: Mood,
    pub energy_level: u32,
    pub tasks_completed: u32,
    pub comment: Option<String>,
}

impl FeedbackLog {
    /// Create a check-in stamped with the current time.
    ///
    /// # Errors
    /// Returns an error if `energy_level` is above [`MAX_ENERGY_LEVEL`].
    pub fn new(
        mood: Mood,
        energy_level: u32,
        tasks_completed: u32,
        comment: Option<String>,
    ) -> Result<Self, ValidationError> {
        if energy_level > MAX_ENERGY_LEVEL {
            return Err(ValidationError::InvalidValue {
                field: "energy_level".into(),
                message: format!("must be between 0 and {MAX_ENERGY_LEVEL}"),
            });
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            mood,
            energy_level,
            tasks_completed,
            comment: comment.filter(|c| !c.trim().is_empty()),
        })
    }
}

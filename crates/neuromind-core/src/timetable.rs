//! Weekly timetable entries: the fixed commitments the planner works around.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::ValidationError;

/// A recurring weekly commitment (a class, a shift, ...).
///
/// Only `day_of_week`, `start_time` and `end_time` matter for scheduling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimetableEntry {
    pub id: String,
    pub title: String,
    pub day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl TimetableEntry {
    /// Create a validated entry. Blank venue or details are dropped.
    ///
    /// # Errors
    /// Returns an error if the title is blank or the entry does not end after it starts.
    pub fn new(
        title: impl Into<String>,
        day_of_week: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
        venue: Option<String>,
        details: Option<String>,
    ) -> Result<Self, ValidationError> {
        let entry = Self {
            id: Uuid::new_v4().to_string(),
            title: title.into().trim().to_string(),
            day_of_week,
            start_time,
            end_time,
            venue: venue.filter(|v| !v.trim().is_empty()),
            details: details.filter(|d| !d.trim().is_empty()),
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Check the fields an entry must satisfy before it is stored.
    ///
    /// # Errors
    /// Returns an error if the title is blank or the entry does not end after it starts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Blank("title".into()));
        }
        if self.start_time >= self.end_time {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(())
    }

    /// Unchecked constructor for synthetic busy intervals.
    pub(crate) fn busy(day_of_week: Weekday, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            day_of_week,
            start_time,
            end_time,
            venue: None,
            details: None,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

/// Group entries by weekday (Monday first), each day ordered by start time.
pub fn entries_by_day(entries: &[TimetableEntry]) -> BTreeMap<u32, Vec<TimetableEntry>> {
    let mut by_day: BTreeMap<u32, Vec<TimetableEntry>> = BTreeMap::new();
    for entry in entries {
        by_day
            .entry(entry.day_of_week.num_days_from_monday())
            .or_default()
            .push(entry.clone());
    }
    for day in by_day.values_mut() {
        day.sort_by_key(|e| e.start_time);
    }
    by_day
}

/// Parse an `HH:MM` time of day.
///
/// # Errors
/// Returns an error if the string is not a valid 24-hour time.
pub fn parse_hhmm(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|e| ValidationError::InvalidValue {
        field: "time".into(),
        message: format!("'{value}' is not HH:MM ({e})"),
    })
}

/// Parse a weekday name or three-letter abbreviation.
///
/// # Errors
/// Returns an error for anything chrono does not recognise as a weekday.
pub fn parse_weekday(value: &str) -> Result<Weekday, ValidationError> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| ValidationError::InvalidValue {
            field: "day".into(),
            message: format!("'{value}' is not a weekday"),
        })
}

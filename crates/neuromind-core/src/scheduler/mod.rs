//! Planner for pending tasks around a weekly timetable.
//!
//! This module provides three pure operations sharing one active window:
//! - Free slot calculation for a weekday given the timetable
//! - Greedy first-fit packing of tasks into a day's free slots
//! - Bounded forward search for the next day with room for one task
//!
//! None of them fail. A task that does not fit is absent from the plan and
//! an exhausted horizon yields `None`.

mod free_slots;
mod packer;
mod search;
mod slot;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::task::Task;

pub use slot::{PlanEntry, ProposedSlot, TimeSlot};

/// A day's placements keyed by the interval each task was given.
pub type DailyPlan = BTreeMap<TimeSlot, Task>;

/// Scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Start of the active window
    pub day_start: NaiveTime,
    /// End of the active window
    pub day_end: NaiveTime,
    /// Number of days the forward search scans, today included.
    /// Capped at [`MAX_HORIZON_DAYS`].
    pub horizon_days: u32,
}

pub const DEFAULT_HORIZON_DAYS: u32 = 15;
/// Longest forward search, in days. Larger horizons are capped to this.
pub const MAX_HORIZON_DAYS: u32 = 366;

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            day_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            day_end: NaiveTime::from_hms_opt(23, 0, 0).unwrap_or(NaiveTime::MIN),
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

/// Planner over a fixed daily active window.
///
/// Holds only configuration; every call is a function of its arguments
/// (plus one read of the wall clock in [`Scheduler::find_next_available_slot`]).
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    /// Create a new scheduler with default config
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// The whole active window as one slot.
    pub fn active_window(&self) -> TimeSlot {
        TimeSlot::new(self.config.day_start, self.config.day_end)
    }
}

/// Flatten a plan into rows ordered by start time.
pub fn plan_entries(plan: &DailyPlan) -> Vec<PlanEntry> {
    plan.iter()
        .map(|(slot, task)| PlanEntry {
            slot: *slot,
            task: task.clone(),
        })
        .collect()
}

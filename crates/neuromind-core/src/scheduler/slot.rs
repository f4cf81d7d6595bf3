//! Time-of-day intervals used by the scheduler.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::task::Task;

/// A half-open `[start, end)` interval within a single day.
///
/// Callers must keep `start < end`; this is only checked in debug builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        debug_assert!(start < end, "time slot must end after it starts: {start} >= {end}");
        Self { start, end }
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Check if this slot can fit a task of given duration
    pub fn can_fit(&self, minutes: u32) -> bool {
        self.duration_minutes() >= i64::from(minutes)
    }

    /// The leading `minutes` of this slot. `minutes` must be in `1..=duration`.
    pub fn carve(&self, minutes: u32) -> TimeSlot {
        TimeSlot::new(self.start, self.start + Duration::minutes(i64::from(minutes)))
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// A proposed future placement for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedSlot {
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
}

/// One row of a day plan, for callers that need a flat, serializable list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEntry {
    pub slot: TimeSlot,
    pub task: Task,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn duration_and_fit() {
        let slot = TimeSlot::new(t(9, 0), t(10, 30));
        assert_eq!(slot.duration_minutes(), 90);
        assert!(slot.can_fit(90));
        assert!(!slot.can_fit(91));
    }

    #[test]
    fn carve_takes_leading_minutes() {
        let slot = TimeSlot::new(t(14, 0), t(17, 0));
        assert_eq!(slot.carve(90), TimeSlot::new(t(14, 0), t(15, 30)));
    }

    #[test]
    fn half_open_slots_touching_do_not_overlap() {
        let a = TimeSlot::new(t(9, 0), t(10, 0));
        let b = TimeSlot::new(t(10, 0), t(11, 0));
        let c = TimeSlot::new(t(9, 30), t(10, 30));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn ordered_by_start() {
        let mut slots = vec![
            TimeSlot::new(t(14, 0), t(15, 0)),
            TimeSlot::new(t(9, 0), t(10, 0)),
        ];
        slots.sort();
        assert_eq!(slots[0].start, t(9, 0));
        assert_eq!(slots[0].to_string(), "09:00-10:00");
    }
}

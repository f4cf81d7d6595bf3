//! Free slot calculation within the active window.

use chrono::Weekday;

use super::{Scheduler, TimeSlot};
use crate::timetable::TimetableEntry;

impl Scheduler {
    /// Gaps in the active window of `day` not covered by any timetable entry.
    ///
    /// `entries` may contain every day of the week; only those on `day` are
    /// used. Overlapping entries collapse, and entries reaching outside the
    /// window are clipped to it. The result is ascending and disjoint; an
    /// empty result means the day is fully booked.
    pub fn free_slots(&self, day: Weekday, entries: &[TimetableEntry]) -> Vec<TimeSlot> {
        let TimeSlot {
            start: day_start,
            end: day_end,
        } = self.active_window();

        let mut busy: Vec<&TimetableEntry> =
            entries.iter().filter(|e| e.day_of_week == day).collect();
        busy.sort_by_key(|e| e.start_time);

        let mut slots = Vec::new();
        let mut cursor = day_start;

        for entry in busy {
            // Nothing after the window closes can open a gap inside it.
            if entry.start_time >= day_end {
                break;
            }

            if entry.start_time > cursor {
                slots.push(TimeSlot::new(cursor, entry.start_time));
            }

            cursor = cursor.max(entry.end_time);
        }

        if cursor < day_end {
            slots.push(TimeSlot::new(cursor, day_end));
        }

        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::SchedulerConfig;
    use chrono::NaiveTime;
    use proptest::prelude::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn busy(day: Weekday, start: NaiveTime, end: NaiveTime) -> TimetableEntry {
        TimetableEntry::busy(day, start, end)
    }

    #[test]
    fn empty_day_is_whole_window() {
        let scheduler = Scheduler::new();
        let slots = scheduler.free_slots(Weekday::Mon, &[]);
        assert_eq!(slots, vec![TimeSlot::new(t(8, 0), t(23, 0))]);
    }

    #[test]
    fn single_class_splits_day() {
        let scheduler = Scheduler::new();
        let entries = vec![busy(Weekday::Mon, t(10, 0), t(11, 0))];
        let slots = scheduler.free_slots(Weekday::Mon, &entries);
        assert_eq!(
            slots,
            vec![
                TimeSlot::new(t(8, 0), t(10, 0)),
                TimeSlot::new(t(11, 0), t(23, 0)),
            ]
        );
    }

    #[test]
    fn other_days_are_ignored() {
        let scheduler = Scheduler::new();
        let entries = vec![busy(Weekday::Tue, t(10, 0), t(11, 0))];
        assert_eq!(scheduler.free_slots(Weekday::Mon, &entries).len(), 1);
    }

    #[test]
    fn unsorted_and_overlapping_entries_collapse() {
        let scheduler = Scheduler::new();
        let entries = vec![
            busy(Weekday::Wed, t(13, 0), t(14, 0)),
            busy(Weekday::Wed, t(9, 0), t(12, 0)),
            busy(Weekday::Wed, t(10, 0), t(11, 0)), // inside the previous one
            busy(Weekday::Wed, t(11, 30), t(13, 30)),
        ];
        let slots = scheduler.free_slots(Weekday::Wed, &entries);
        assert_eq!(
            slots,
            vec![
                TimeSlot::new(t(8, 0), t(9, 0)),
                TimeSlot::new(t(14, 0), t(23, 0)),
            ]
        );
    }

    #[test]
    fn entries_outside_window_are_clipped() {
        let scheduler = Scheduler::new();
        let entries = vec![
            busy(Weekday::Fri, t(6, 0), t(9, 0)),
            busy(Weekday::Fri, t(22, 0), t(23, 30)),
            busy(Weekday::Fri, t(23, 15), t(23, 45)),
        ];
        let slots = scheduler.free_slots(Weekday::Fri, &entries);
        assert_eq!(slots, vec![TimeSlot::new(t(9, 0), t(22, 0))]);
    }

    #[test]
    fn entry_starting_after_window_leaves_tail_intact() {
        let scheduler = Scheduler::new();
        let entries = vec![busy(Weekday::Sat, t(23, 30), t(23, 45))];
        let slots = scheduler.free_slots(Weekday::Sat, &entries);
        assert_eq!(slots, vec![TimeSlot::new(t(8, 0), t(23, 0))]);
    }

    #[test]
    fn fully_booked_day_has_no_slots() {
        let scheduler = Scheduler::new();
        let entries = vec![busy(Weekday::Sun, t(8, 0), t(23, 0))];
        assert!(scheduler.free_slots(Weekday::Sun, &entries).is_empty());
    }

    #[test]
    fn custom_window() {
        let scheduler = Scheduler::with_config(SchedulerConfig {
            day_start: t(9, 0),
            day_end: t(17, 0),
            horizon_days: 7,
        });
        let entries = vec![busy(Weekday::Mon, t(12, 0), t(13, 0))];
        let slots = scheduler.free_slots(Weekday::Mon, &entries);
        assert_eq!(
            slots,
            vec![
                TimeSlot::new(t(9, 0), t(12, 0)),
                TimeSlot::new(t(13, 0), t(17, 0)),
            ]
        );
    }

    #[test]
    fn repeated_calls_agree() {
        let scheduler = Scheduler::new();
        let entries = vec![
            busy(Weekday::Thu, t(10, 0), t(11, 0)),
            busy(Weekday::Thu, t(15, 0), t(16, 0)),
        ];
        assert_eq!(
            scheduler.free_slots(Weekday::Thu, &entries),
            scheduler.free_slots(Weekday::Thu, &entries)
        );
    }

    /// Non-overlapping busy intervals inside 08:00-23:00, as minute offsets.
    fn disjoint_busy() -> impl Strategy<Value = Vec<(u32, u32)>> {
        prop::collection::vec((0u32..900, 1u32..120), 0..12).prop_map(|raw| {
            let mut cuts: Vec<(u32, u32)> = raw
                .into_iter()
                .map(|(s, len)| (s, (s + len).min(900)))
                .filter(|(s, e)| s < e)
                .collect();
            cuts.sort();
            let mut out: Vec<(u32, u32)> = Vec::new();
            for (s, e) in cuts {
                if out.last().map_or(true, |&(_, prev_end)| s >= prev_end) {
                    out.push((s, e));
                }
            }
            out
        })
    }

    fn at(offset: u32) -> NaiveTime {
        t(8, 0) + chrono::Duration::minutes(i64::from(offset))
    }

    proptest! {
        #[test]
        fn free_and_busy_tile_the_window(intervals in disjoint_busy()) {
            let scheduler = Scheduler::new();
            let entries: Vec<_> = intervals
                .iter()
                .map(|&(s, e)| busy(Weekday::Mon, at(s), at(e)))
                .collect();
            let slots = scheduler.free_slots(Weekday::Mon, &entries);

            for pair in slots.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start);
                prop_assert!(pair[0].start < pair[1].start);
            }

            let free: i64 = slots.iter().map(|s| s.duration_minutes()).sum();
            let taken: i64 = intervals.iter().map(|&(s, e)| i64::from(e - s)).sum();
            prop_assert_eq!(free + taken, 15 * 60);

            for slot in &slots {
                prop_assert!(slot.start >= t(8, 0) && slot.end <= t(23, 0));
                for entry in &entries {
                    prop_assert!(!(slot.start < entry.end_time && entry.start_time < slot.end));
                }
            }
        }
    }
}

//! # Neuromind Core Library
//!
//! This library provides the planning logic behind Neuromind, a personal
//! task and timetable manager. All operations are available through the
//! standalone CLI binary, and any front end sits on top of the same core.
//!
//! ## Architecture
//!
//! - **Scheduler**: pure functions that find free time around a weekly
//!   timetable, pack pending tasks into a day, and search forward for the
//!   next slot that fits an overdue task
//! - **Derived views**: dashboard summary, task list, reschedule proposals
//!   and weekly insights, recomputed from snapshots
//! - **Storage**: SQLite planner store with change events, TOML configuration
//!
//! ## Key Components
//!
//! - [`Scheduler`]: free slots, day packing and forward search
//! - [`PlannerDb`]: task, timetable and feedback persistence
//! - [`Config`]: application configuration management

pub mod dashboard;
pub mod error;
pub mod events;
pub mod feedback;
pub mod insights;
pub mod reschedule;
pub mod scheduler;
pub mod storage;
pub mod task;
pub mod timetable;

pub use dashboard::{build_dashboard, DashboardSummary};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use feedback::{FeedbackLog, Mood};
pub use insights::{build_insights, Insights};
pub use reschedule::{accept_proposals, propose_reschedules, Proposals};
pub use scheduler::{DailyPlan, PlanEntry, ProposedSlot, Scheduler, SchedulerConfig, TimeSlot};
pub use storage::{Config, PlannerDb};
pub use task::list::{build_task_list, HierarchicalTask, TaskFilter};
pub use task::{Difficulty, Priority, Task};
pub use timetable::TimetableEntry;

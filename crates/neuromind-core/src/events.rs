use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every mutation of the planner store produces an Event.
/// Views subscribe and recompute their derived state when one arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TasksChanged {
        task_id: String,
        at: DateTime<Utc>,
    },
    TimetableChanged {
        entry_id: String,
        at: DateTime<Utc>,
    },
    FeedbackChanged {
        log_id: String,
        at: DateTime<Utc>,
    },
}

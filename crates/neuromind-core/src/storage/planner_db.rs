//! SQLite-based storage for tasks, timetable entries, and feedback logs.
//!
//! Every mutation publishes an [`Event`] so views can recompute derived
//! state; see [`PlannerDb::subscribe`].

use chrono::{DateTime, NaiveTime, SecondsFormat, Utc, Weekday};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tokio::sync::broadcast;

use super::data_dir;
use crate::error::{CoreError, DatabaseError};
use crate::events::Event;
use crate::feedback::FeedbackLog;
use crate::task::Task;
use crate::timetable::TimetableEntry;

const EVENT_CAPACITY: usize = 64;

const TASK_COLUMNS: &str = "id, title, description, due_date, is_recurring, recurrence_pattern,
    duration_minutes, difficulty, priority, is_completed, created_at, updated_at, parent_id";

// === Helper Functions ===

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        Box::new(DatabaseError::CorruptValue {
            column: column.to_string(),
            value: message,
        }),
    )
}

/// Parse datetime from RFC3339 string
fn parse_datetime(column: usize, value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, format!("{value}: {e}")))
}

/// Fixed-width UTC timestamps so that text ordering is chronological
fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_time(column: usize, value: &str) -> Result<NaiveTime, rusqlite::Error> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .map_err(|e| conversion_error(column, format!("{value}: {e}")))
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

fn parse_enum<T: std::str::FromStr>(column: usize, value: &str) -> Result<T, rusqlite::Error>
where
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| conversion_error(column, format!("{value}: {e}")))
}

/// Build a Task from a row selected with TASK_COLUMNS
fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let due_date: Option<String> = row.get(3)?;
    let difficulty: String = row.get(7)?;
    let priority: String = row.get(8)?;
    let created_at: String = row.get(10)?;
    let updated_at: String = row.get(11)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        due_date: due_date.map(|d| parse_datetime(3, &d)).transpose()?,
        is_recurring: row.get(4)?,
        recurrence_pattern: row.get(5)?,
        duration_minutes: row.get(6)?,
        difficulty: parse_enum(7, &difficulty)?,
        priority: parse_enum(8, &priority)?,
        is_completed: row.get(9)?,
        created_at: parse_datetime(10, &created_at)?,
        updated_at: parse_datetime(11, &updated_at)?,
        parent_id: row.get(12)?,
    })
}

fn row_to_timetable_entry(row: &rusqlite::Row) -> Result<TimetableEntry, rusqlite::Error> {
    let day_index: u32 = row.get(2)?;
    let day_of_week = WEEKDAYS
        .get(day_index as usize)
        .copied()
        .ok_or_else(|| conversion_error(2, format!("day index {day_index}")))?;
    let start: String = row.get(3)?;
    let end: String = row.get(4)?;

    Ok(TimetableEntry {
        id: row.get(0)?,
        title: row.get(1)?,
        day_of_week,
        start_time: parse_time(3, &start)?,
        end_time: parse_time(4, &end)?,
        venue: row.get(5)?,
        details: row.get(6)?,
    })
}

fn row_to_feedback(row: &rusqlite::Row) -> Result<FeedbackLog, rusqlite::Error> {
    let date: String = row.get(1)?;
    let mood: String = row.get(2)?;

    Ok(FeedbackLog {
        id: row.get(0)?,
        date: parse_datetime(1, &date)?,
        mood: parse_enum(2, &mood)?,
        energy_level: row.get(3)?,
        tasks_completed: row.get(4)?,
        comment: row.get(5)?,
    })
}

/// SQLite database backing the planner.
pub struct PlannerDb {
    conn: Connection,
    events: broadcast::Sender<Event>,
}

impl PlannerDb {
    /// Open the planner database at `~/.config/neuromind/neuromind.db`.
    ///
    /// Creates tables if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("neuromind.db");
        Self::open_at(&path)
    }

    /// Open the planner database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for tests).
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, CoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, CoreError> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let db = Self { conn, events };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id                 TEXT PRIMARY KEY,
                title              TEXT NOT NULL,
                description        TEXT,
                due_date           TEXT,
                is_recurring       INTEGER NOT NULL DEFAULT 0,
                recurrence_pattern TEXT,
                duration_minutes   INTEGER NOT NULL DEFAULT 60,
                difficulty         TEXT NOT NULL DEFAULT 'MEDIUM',
                priority           TEXT NOT NULL DEFAULT 'LOW',
                is_completed       INTEGER NOT NULL DEFAULT 0,
                created_at         TEXT NOT NULL,
                updated_at         TEXT NOT NULL,
                parent_id          TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_parent ON tasks(parent_id);

            CREATE TABLE IF NOT EXISTS timetable_entries (
                id          TEXT PRIMARY KEY,
                title       TEXT NOT NULL,
                day_of_week INTEGER NOT NULL,
                start_time  TEXT NOT NULL,
                end_time    TEXT NOT NULL,
                venue       TEXT,
                details     TEXT
            );

            CREATE TABLE IF NOT EXISTS feedback_logs (
                id              TEXT PRIMARY KEY,
                date            TEXT NOT NULL,
                mood            TEXT NOT NULL,
                energy_level    INTEGER NOT NULL,
                tasks_completed INTEGER NOT NULL,
                comment         TEXT
            );",
        )
    }

    /// Receive an [`Event`] for every later mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    fn publish(&self, event: Event) {
        // No subscribers is fine.
        if self.events.send(event).is_err() {
            tracing::trace!("store event dropped: no subscribers");
        }
    }

    // === Tasks ===

    /// Insert a task, replacing any task with the same id.
    pub fn insert_task(&self, task: &Task) -> Result<(), CoreError> {
        task.validate()?;
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO tasks ({TASK_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
            ),
            params![
                task.id,
                task.title,
                task.description,
                task.due_date.map(format_datetime),
                task.is_recurring,
                task.recurrence_pattern,
                task.duration_minutes,
                task.difficulty.as_str(),
                task.priority.as_str(),
                task.is_completed,
                format_datetime(task.created_at),
                format_datetime(task.updated_at),
                task.parent_id,
            ],
        )?;
        self.publish(Event::TasksChanged {
            task_id: task.id.clone(),
            at: Utc::now(),
        });
        Ok(())
    }

    /// Update an existing task. Returns false if no task has this id.
    pub fn update_task(&self, task: &Task) -> Result<bool, CoreError> {
        task.validate()?;
        let changed = self.conn.execute(
            "UPDATE tasks SET title = ?2, description = ?3, due_date = ?4, is_recurring = ?5,
                    recurrence_pattern = ?6, duration_minutes = ?7, difficulty = ?8,
                    priority = ?9, is_completed = ?10, updated_at = ?11, parent_id = ?12
             WHERE id = ?1",
            params![
                task.id,
                task.title,
                task.description,
                task.due_date.map(format_datetime),
                task.is_recurring,
                task.recurrence_pattern,
                task.duration_minutes,
                task.difficulty.as_str(),
                task.priority.as_str(),
                task.is_completed,
                format_datetime(task.updated_at),
                task.parent_id,
            ],
        )?;
        if changed > 0 {
            self.publish(Event::TasksChanged {
                task_id: task.id.clone(),
                at: Utc::now(),
            });
        }
        Ok(changed > 0)
    }

    /// Get a task by ID.
    pub fn get_task(&self, id: &str) -> Result<Option<Task>, CoreError> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// All tasks, newest first.
    pub fn list_tasks(&self) -> Result<Vec<Task>, CoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC"))?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Delete a task and every task below it, at any depth, in one transaction.
    ///
    /// Returns the number of rows removed.
    pub fn delete_task(&self, id: &str) -> Result<usize, CoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute(
            "DELETE FROM tasks WHERE id IN (
                WITH RECURSIVE subtree(id) AS (
                    SELECT id FROM tasks WHERE id = ?1
                    UNION
                    SELECT t.id FROM tasks t JOIN subtree s ON t.parent_id = s.id
                )
                SELECT id FROM subtree
             )",
            params![id],
        )?;
        tx.commit()?;

        if removed > 0 {
            self.publish(Event::TasksChanged {
                task_id: id.to_string(),
                at: Utc::now(),
            });
        }
        Ok(removed)
    }

    // === Timetable ===

    /// Insert an entry, replacing any entry with the same id.
    pub fn insert_timetable_entry(&self, entry: &TimetableEntry) -> Result<(), CoreError> {
        entry.validate()?;
        self.conn.execute(
            "INSERT OR REPLACE INTO timetable_entries
                (id, title, day_of_week, start_time, end_time, venue, details)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.id,
                entry.title,
                entry.day_of_week.num_days_from_monday(),
                format_time(entry.start_time),
                format_time(entry.end_time),
                entry.venue,
                entry.details,
            ],
        )?;
        self.publish(Event::TimetableChanged {
            entry_id: entry.id.clone(),
            at: Utc::now(),
        });
        Ok(())
    }

    /// All entries ordered by weekday (Monday first), then start time.
    pub fn list_timetable_entries(&self) -> Result<Vec<TimetableEntry>, CoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, day_of_week, start_time, end_time, venue, details
             FROM timetable_entries ORDER BY day_of_week, start_time",
        )?;
        let entries = stmt
            .query_map([], row_to_timetable_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn delete_timetable_entry(&self, id: &str) -> Result<bool, CoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM timetable_entries WHERE id = ?1", params![id])?;
        if removed > 0 {
            self.publish(Event::TimetableChanged {
                entry_id: id.to_string(),
                at: Utc::now(),
            });
        }
        Ok(removed > 0)
    }

    // === Feedback ===

    pub fn insert_feedback(&self, log: &FeedbackLog) -> Result<(), CoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO feedback_logs
                (id, date, mood, energy_level, tasks_completed, comment)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                log.id,
                format_datetime(log.date),
                log.mood.as_str(),
                log.energy_level,
                log.tasks_completed,
                log.comment,
            ],
        )?;
        self.publish(Event::FeedbackChanged {
            log_id: log.id.clone(),
            at: Utc::now(),
        });
        Ok(())
    }

    /// All check-ins, newest first.
    pub fn list_feedback(&self) -> Result<Vec<FeedbackLog>, CoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, mood, energy_level, tasks_completed, comment
             FROM feedback_logs ORDER BY date DESC",
        )?;
        let logs = stmt
            .query_map([], row_to_feedback)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::feedback::Mood;
    use crate::task::Priority;
    use chrono::Duration;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn make_test_task() -> Task {
        Task::new("Test task")
            .with_priority(Priority::High)
            .with_duration(45)
            .with_due_date(Utc::now() + Duration::days(1))
    }

    #[test]
    fn insert_and_get_task() {
        let db = PlannerDb::open_memory().unwrap();
        let task = make_test_task();
        db.insert_task(&task).unwrap();

        let retrieved = db.get_task(&task.id).unwrap().unwrap();
        assert_eq!(retrieved.title, "Test task");
        assert_eq!(retrieved.priority, Priority::High);
        assert_eq!(retrieved.duration_minutes, 45);
        assert_eq!(
            retrieved.due_date.map(|d| d.timestamp()),
            task.due_date.map(|d| d.timestamp())
        );
    }

    #[test]
    fn insert_rejects_invalid_task() {
        let db = PlannerDb::open_memory().unwrap();
        let task = Task::new("");
        assert!(matches!(db.insert_task(&task), Err(CoreError::Validation(_))));
    }

    #[test]
    fn list_tasks_newest_first() {
        let db = PlannerDb::open_memory().unwrap();
        let mut older = make_test_task();
        older.title = "older".into();
        older.created_at = Utc::now() - Duration::hours(1);
        let newer = make_test_task();

        db.insert_task(&older).unwrap();
        db.insert_task(&newer).unwrap();

        let tasks = db.list_tasks().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].title, "older");
    }

    #[test]
    fn update_task() {
        let db = PlannerDb::open_memory().unwrap();
        let mut task = make_test_task();
        db.insert_task(&task).unwrap();

        task.is_completed = true;
        assert!(db.update_task(&task).unwrap());
        assert!(db.get_task(&task.id).unwrap().unwrap().is_completed);

        let stranger = make_test_task();
        assert!(!db.update_task(&stranger).unwrap());
    }

    #[test]
    fn delete_task_removes_sub_tasks() {
        let db = PlannerDb::open_memory().unwrap();
        let parent = make_test_task();
        let child = Task::new("child").with_parent(parent.id.clone());
        let other = Task::new("other");
        db.insert_task(&parent).unwrap();
        db.insert_task(&child).unwrap();
        db.insert_task(&other).unwrap();

        assert_eq!(db.delete_task(&parent.id).unwrap(), 2);
        let remaining = db.list_tasks().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "other");
    }

    #[test]
    fn delete_task_removes_nested_sub_tasks() {
        let db = PlannerDb::open_memory().unwrap();
        let root = make_test_task();
        let child = Task::new("child").with_parent(root.id.clone());
        let grandchild = Task::new("grandchild").with_parent(child.id.clone());
        let other = Task::new("other");
        for task in [&root, &child, &grandchild, &other] {
            db.insert_task(task).unwrap();
        }

        assert_eq!(db.delete_task(&root.id).unwrap(), 3);
        let remaining = db.list_tasks().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "other");
        assert_eq!(db.delete_task(&root.id).unwrap(), 0);
    }

    #[test]
    fn timetable_ordered_by_day_then_start() {
        let db = PlannerDb::open_memory().unwrap();
        let entries = [
            TimetableEntry::new("Fri", Weekday::Fri, t(9, 0), t(10, 0), None, None).unwrap(),
            TimetableEntry::new("Mon late", Weekday::Mon, t(14, 0), t(15, 0), Some("B12".into()), None).unwrap(),
            TimetableEntry::new("Mon early", Weekday::Mon, t(9, 0), t(10, 0), None, None).unwrap(),
        ];
        for entry in &entries {
            db.insert_timetable_entry(entry).unwrap();
        }

        let listed = db.list_timetable_entries().unwrap();
        let titles: Vec<_> = listed.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Mon early", "Mon late", "Fri"]);
        assert_eq!(listed[1].venue.as_deref(), Some("B12"));
        assert_eq!(listed[2].day_of_week, Weekday::Fri);

        assert!(db.delete_timetable_entry(&entries[0].id).unwrap());
        assert!(!db.delete_timetable_entry(&entries[0].id).unwrap());
    }

    #[test]
    fn insert_rejects_inverted_timetable_entry() {
        let db = PlannerDb::open_memory().unwrap();
        let mut entry = TimetableEntry::new("Lab", Weekday::Mon, t(9, 0), t(10, 0), None, None).unwrap();
        entry.start_time = t(10, 0);
        entry.end_time = t(9, 0);

        assert!(matches!(
            db.insert_timetable_entry(&entry),
            Err(CoreError::Validation(ValidationError::InvalidTimeRange { .. }))
        ));
        entry.end_time = t(10, 0);
        assert!(db.insert_timetable_entry(&entry).is_err());
        assert!(db.list_timetable_entries().unwrap().is_empty());
    }

    #[test]
    fn insert_rejects_blank_timetable_title() {
        let db = PlannerDb::open_memory().unwrap();
        let mut entry = TimetableEntry::new("Lab", Weekday::Mon, t(9, 0), t(10, 0), None, None).unwrap();
        entry.title = "  ".into();
        assert!(matches!(
            db.insert_timetable_entry(&entry),
            Err(CoreError::Validation(ValidationError::Blank(_)))
        ));
    }

    #[test]
    fn feedback_newest_first() {
        let db = PlannerDb::open_memory().unwrap();
        let mut old = FeedbackLog::new(Mood::Great, 9, 4, None).unwrap();
        old.date = Utc::now() - Duration::days(1);
        let new = FeedbackLog::new(Mood::Tired, 3, 1, Some("long day".into())).unwrap();
        db.insert_feedback(&old).unwrap();
        db.insert_feedback(&new).unwrap();

        let logs = db.list_feedback().unwrap();
        assert_eq!(logs[0].mood, Mood::Tired);
        assert_eq!(logs[0].comment.as_deref(), Some("long day"));
        assert_eq!(logs[1].mood, Mood::Great);
    }

    #[test]
    fn mutations_publish_events() {
        let db = PlannerDb::open_memory().unwrap();
        let mut rx = db.subscribe();

        let task = make_test_task();
        db.insert_task(&task).unwrap();
        let entry = TimetableEntry::new("Lab", Weekday::Tue, t(9, 0), t(11, 0), None, None).unwrap();
        db.insert_timetable_entry(&entry).unwrap();
        db.insert_feedback(&FeedbackLog::new(Mood::Good, 7, 2, None).unwrap()).unwrap();

        assert!(matches!(rx.try_recv().unwrap(), Event::TasksChanged { task_id, .. } if task_id == task.id));
        assert!(matches!(rx.try_recv().unwrap(), Event::TimetableChanged { entry_id, .. } if entry_id == entry.id));
        assert!(matches!(rx.try_recv().unwrap(), Event::FeedbackChanged { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn open_at_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.db");
        {
            let db = PlannerDb::open_at(&path).unwrap();
            db.insert_task(&make_test_task()).unwrap();
        }
        let db = PlannerDb::open_at(&path).unwrap();
        assert_eq!(db.list_tasks().unwrap().len(), 1);
    }
}

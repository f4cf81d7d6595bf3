pub mod config;
pub mod dashboard;
pub mod feedback;
pub mod insights;
pub mod plan;
pub mod reschedule;
pub mod task;
pub mod timetable;

use neuromind_core::{Config, Scheduler};

/// Scheduler built from the on-disk configuration.
pub fn scheduler_from_config() -> Result<Scheduler, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    Ok(Scheduler::with_config(config.scheduler_config()?))
}

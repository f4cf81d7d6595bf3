mod config;
pub mod planner_db;

pub use config::{Config, SchedulerSettings, ThemeSetting, UiConfig};
pub use planner_db::PlannerDb;

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// `NEUROMIND_DATA_DIR` overrides the location. Otherwise this is
/// `~/.config/neuromind[-dev]/`, with `NEUROMIND_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("NEUROMIND_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("NEUROMIND_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("neuromind-dev")
            } else {
                base_dir.join("neuromind")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

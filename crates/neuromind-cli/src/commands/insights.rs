//! Weekly insights command for CLI.

use chrono::{Duration, Local};
use neuromind_core::{build_insights, PlannerDb};

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;
    let insights = build_insights(
        &db.list_tasks()?,
        &db.list_feedback()?,
        Local::now().date_naive(),
        &Local,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    println!("Week of {}", insights.week_start);
    for (offset, count) in insights.weekly_completions.iter().enumerate() {
        let day = insights.week_start + Duration::days(offset as i64);
        println!("  {} {count}", day.format("%a"));
    }
    println!("Wellness: {:.0}%", insights.wellness_score * 100.0);
    Ok(())
}

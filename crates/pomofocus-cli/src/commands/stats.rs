use std::path::Path;
use std::rc::Rc;

use clap::Subcommand;
use pomofocus_core::{format_minutes, Config, SessionLog, SystemClock};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Aggregate statistics as JSON
    Show,
    /// Human-readable summary with the recent daily history
    Summary,
    /// Every recorded session as JSON
    History,
}

pub fn run(
    db: Option<&Path>,
    config: &Config,
    action: StatsAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(db)?;
    let mut log = SessionLog::load(store, Rc::new(SystemClock));
    log.set_history_days(config.stats.history_days);

    match action {
        StatsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&log.aggregate())?);
        }
        StatsAction::Summary => {
            let stats = log.aggregate();
            println!("Total focus time:  {}", format_minutes(stats.total_focus_minutes));
            println!("Total pomodoros:   {}", stats.total_pomodoros);
            println!("Today's pomodoros: {}", stats.today_pomodoros);
            println!();
            if stats.daily.is_empty() {
                println!("No sessions recorded yet.");
            }
            for day in &stats.daily {
                println!(
                    "{:<14} {} pomodoros ({})",
                    day.label,
                    day.pomodoros,
                    format_minutes(day.focus_minutes)
                );
            }
        }
        StatsAction::History => {
            println!("{}", serde_json::to_string_pretty(log.sessions())?);
        }
    }
    Ok(())
}

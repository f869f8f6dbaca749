use chrono::NaiveDate;
use clap::Subcommand;
use jobquest_core::Tracker;

use super::{open, report, CmdResult};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Check in for today; extends the streak at most once per day
    Tick {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StreakAction, today: NaiveDate) -> CmdResult {
    let (config, db) = open()?;
    let tracker = Tracker::new(&db, config.engine());

    match action {
        StreakAction::Tick { json } => {
            let outcome = tracker.streak_tick(today)?;
            report(&config, &outcome, json)
        }
    }
}

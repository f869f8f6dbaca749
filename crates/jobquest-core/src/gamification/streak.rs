//! Daily activity streaks.
//!
//! Dates are civil dates with no time component. Callers normalize to the
//! user's local calendar day before calling in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How an action on `today` changes the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakDelta {
    /// No recorded activity before; the streak starts at 1.
    Fresh,
    /// Already active today.
    NoChange,
    /// Active yesterday; the streak grows by a day and earns the bonus.
    Increment,
    /// The chain broke; the streak restarts at 1.
    Reset,
}

impl StreakDelta {
    /// Streak length after applying this delta.
    pub fn apply(self, streak_days: u32) -> u32 {
        match self {
            StreakDelta::NoChange => streak_days,
            StreakDelta::Increment => streak_days.saturating_add(1),
            StreakDelta::Fresh | StreakDelta::Reset => 1,
        }
    }

    pub fn earns_bonus(self) -> bool {
        self == StreakDelta::Increment
    }
}

/// Compare the last active day with today.
///
/// A `last_activity` later than `today` is treated as a broken chain.
pub fn streak_delta(last_activity: Option<NaiveDate>, today: NaiveDate) -> StreakDelta {
    let Some(last) = last_activity else {
        return StreakDelta::Fresh;
    };
    match (today - last).num_days() {
        0 => StreakDelta::NoChange,
        1 => StreakDelta::Increment,
        _ => StreakDelta::Reset,
    }
}

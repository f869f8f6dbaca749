use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::rank::RankTable;

/// Per-user gamification progress.
///
/// `rank` is always the table's rank for `points`; the engine recomputes it
/// on every step and never stores one independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamificationState {
    pub points: u32,
    pub streak_days: u32,
    #[serde(default)]
    pub last_activity: Option<NaiveDate>,
    pub rank: String,
}

impl GamificationState {
    /// Zero points, no streak, lowest rank.
    pub fn initial(ranks: &RankTable) -> Self {
        Self {
            points: 0,
            streak_days: 0,
            last_activity: None,
            rank: ranks.lowest().name.clone(),
        }
    }

    /// State holding `points` with no activity recorded yet.
    pub fn with_points(ranks: &RankTable, points: u32) -> Self {
        Self {
            points,
            rank: ranks.rank_for(points).to_string(),
            ..Self::initial(ranks)
        }
    }

    pub fn is_consistent_with(&self, ranks: &RankTable) -> bool {
        self.rank == ranks.rank_for(self.points)
    }
}

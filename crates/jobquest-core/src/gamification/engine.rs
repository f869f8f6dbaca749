//! Gamification engine.
//!
//! Pure state transitions. Every entry point takes "today" explicitly and
//! returns a fresh [`GamificationState`]; the input snapshot is only
//! borrowed. Persisting the result and showing milestones is the caller's
//! job.
//!
//! ## Step order
//!
//! ```text
//! streak delta -> last_activity = today -> + action points -> rank
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::milestone::{detect_milestones, Milestone, MilestoneHistory, PointsHeuristic};
use super::points::{Action, PointsContext, PointsPolicy};
use super::rank::RankTable;
use super::state::GamificationState;
use super::streak::streak_delta;
use super::summary::{format_summary, RankSummary};
use crate::application::ApplicationRecord;

/// Result of one engine step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub state: GamificationState,
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GamificationEngine {
    ranks: RankTable,
    policy: PointsPolicy,
}

impl GamificationEngine {
    pub fn new(ranks: RankTable, policy: PointsPolicy) -> Self {
        Self { ranks, policy }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn ranks(&self) -> &RankTable {
        &self.ranks
    }

    pub fn policy(&self) -> &PointsPolicy {
        &self.policy
    }

    pub fn rank_for(&self, points: u32) -> &str {
        self.ranks.rank_for(points)
    }

    pub fn initial_state(&self) -> GamificationState {
        GamificationState::initial(&self.ranks)
    }

    /// First-ever state for a user, with points back-filled from the
    /// applications they already had.
    pub fn seeded_state(&self, existing: &[ApplicationRecord]) -> GamificationState {
        let points = self.policy.retroactive_points(existing);
        GamificationState::with_points(&self.ranks, points)
    }

    pub fn summary(&self, state: &GamificationState) -> RankSummary {
        format_summary(&self.ranks, state)
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Apply `action` on `today`.
    pub fn compute_new_state(
        &self,
        old: &GamificationState,
        action: &Action,
        today: NaiveDate,
    ) -> GamificationState {
        let delta = streak_delta(old.last_activity, today);

        let mut points = old.points;
        if delta.earns_bonus() {
            points = points.saturating_add(self.policy.streak_bonus);
        }
        let earned = self.policy.points_for(action, &PointsContext { streak: delta });
        points = points.saturating_add(earned);

        let new = GamificationState {
            points,
            streak_days: delta.apply(old.streak_days),
            last_activity: Some(today),
            rank: self.ranks.rank_for(points).to_string(),
        };

        debug!(
            action = action.name(),
            ?delta,
            earned,
            points = new.points,
            streak_days = new.streak_days,
            rank = %new.rank,
            "gamification step"
        );
        new
    }

    /// Milestones for `old -> new`, using the point-total heuristic.
    pub fn detect_milestones(
        &self,
        old: &GamificationState,
        new: &GamificationState,
        applications: &[ApplicationRecord],
    ) -> Vec<Milestone> {
        detect_milestones(old, new, applications, &PointsHeuristic::new(&self.policy))
    }

    /// Milestones for `old -> new` with a caller-supplied history source.
    pub fn detect_milestones_with(
        &self,
        old: &GamificationState,
        new: &GamificationState,
        applications: &[ApplicationRecord],
        history: &impl MilestoneHistory,
    ) -> Vec<Milestone> {
        detect_milestones(old, new, applications, history)
    }

    /// State step plus milestone detection against the post-action
    /// application list.
    pub fn apply(
        &self,
        old: &GamificationState,
        action: &Action,
        applications: &[ApplicationRecord],
        today: NaiveDate,
    ) -> Transition {
        let state = self.compute_new_state(old, action, today);
        let milestones = self.detect_milestones(old, &state, applications);
        Transition { state, milestones }
    }
}

//! Milestone detection.
//!
//! Milestones are transient: the detector diffs two state snapshots against
//! the live application list and returns whatever fired, in a fixed order.
//! Nothing here remembers which milestones were already shown. "Has the
//! user had an interview/offer before?" is answered by a [`MilestoneHistory`]
//! implementation; [`PointsHeuristic`] infers it from the old point total.

use serde::{Deserialize, Serialize};

use super::points::PointsPolicy;
use super::state::GamificationState;
use crate::application::ApplicationRecord;

/// Applications needed for the "ten applications" milestone.
pub const TEN_APPLICATIONS: usize = 10;

/// Streak length for the "five day streak" milestone.
pub const FIVE_DAY_STREAK: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    RankUp,
    FirstApplication,
    TenApplications,
    FirstInterview,
    FirstOffer,
    FiveDayStreak,
}

impl MilestoneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneKind::RankUp => "rank_up",
            MilestoneKind::FirstApplication => "first_application",
            MilestoneKind::TenApplications => "ten_applications",
            MilestoneKind::FirstInterview => "first_interview",
            MilestoneKind::FirstOffer => "first_offer",
            MilestoneKind::FiveDayStreak => "five_day_streak",
        }
    }

    pub fn tier(&self) -> MilestoneTier {
        match self {
            MilestoneKind::RankUp => MilestoneTier::RankUp,
            MilestoneKind::FirstInterview
            | MilestoneKind::FirstOffer
            | MilestoneKind::FiveDayStreak => MilestoneTier::Achievement,
            MilestoneKind::FirstApplication | MilestoneKind::TenApplications => {
                MilestoneTier::Standard
            }
        }
    }
}

/// Display emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MilestoneTier {
    Standard,
    Achievement,
    RankUp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    #[serde(rename = "type")]
    pub kind: MilestoneKind,
    pub tier: MilestoneTier,
    pub title: String,
    pub message: String,
}

impl Milestone {
    pub fn rank_up(rank: &str) -> Self {
        Self {
            kind: MilestoneKind::RankUp,
            tier: MilestoneKind::RankUp.tier(),
            title: format!("Rank Up: {rank}!"),
            message: format!("You've advanced to {rank}. Keep climbing!"),
        }
    }

    fn fixed(kind: MilestoneKind, title: &str, message: &str) -> Self {
        Self {
            kind,
            tier: kind.tier(),
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    pub fn first_application() -> Self {
        Self::fixed(
            MilestoneKind::FirstApplication,
            "First Step!",
            "You submitted your first application. Keep going!",
        )
    }

    pub fn ten_applications() -> Self {
        Self::fixed(
            MilestoneKind::TenApplications,
            "10 Applications!",
            "You've submitted 10 applications. Momentum is building!",
        )
    }

    pub fn first_interview() -> Self {
        Self::fixed(
            MilestoneKind::FirstInterview,
            "Interview Secured!",
            "Your first interview, great progress!",
        )
    }

    pub fn first_offer() -> Self {
        Self::fixed(
            MilestoneKind::FirstOffer,
            "Offer Received!",
            "You got your first offer. Congratulations!",
        )
    }

    pub fn five_day_streak() -> Self {
        Self::fixed(
            MilestoneKind::FiveDayStreak,
            "5-Day Streak!",
            "Five days of consistent progress. You're on fire!",
        )
    }
}

/// Answers whether a one-time event already happened before this step.
///
/// Swap in a flag-backed implementation to replace the point heuristic
/// without touching the detector.
pub trait MilestoneHistory {
    fn had_interview(&self, old: &GamificationState) -> bool;
    fn had_offer(&self, old: &GamificationState) -> bool;
}

/// Infers history from the old point total.
///
/// Misfires when points were adjusted by hand or when a retroactive seed
/// already crossed a threshold. Recrossing refires.
#[derive(Debug, Clone, Copy)]
pub struct PointsHeuristic<'a> {
    policy: &'a PointsPolicy,
}

impl<'a> PointsHeuristic<'a> {
    pub fn new(policy: &'a PointsPolicy) -> Self {
        Self { policy }
    }
}

impl MilestoneHistory for PointsHeuristic<'_> {
    fn had_interview(&self, old: &GamificationState) -> bool {
        old.points >= self.policy.interview_threshold()
    }

    fn had_offer(&self, old: &GamificationState) -> bool {
        old.points >= self.policy.offer_threshold()
    }
}

/// Every milestone triggered by the step `old -> new`, in display order.
pub fn detect_milestones(
    old: &GamificationState,
    new: &GamificationState,
    applications: &[ApplicationRecord],
    history: &impl MilestoneHistory,
) -> Vec<Milestone> {
    let mut milestones = Vec::new();

    if old.rank != new.rank {
        milestones.push(Milestone::rank_up(&new.rank));
    }

    if applications.len() == 1 && old.points == 0 {
        milestones.push(Milestone::first_application());
    }

    // Exact match: deleting down to 9 and adding a 10th fires again.
    if applications.len() == TEN_APPLICATIONS {
        milestones.push(Milestone::ten_applications());
    }

    let has_interview = applications.iter().any(|a| a.status.counts_as_interview());
    if has_interview && !history.had_interview(old) {
        milestones.push(Milestone::first_interview());
    }

    let has_offer = applications.iter().any(|a| a.status.counts_as_offer());
    if has_offer && !history.had_offer(old) {
        milestones.push(Milestone::first_offer());
    }

    if new.streak_days == FIVE_DAY_STREAK && old.streak_days < FIVE_DAY_STREAK {
        milestones.push(Milestone::five_day_streak());
    }

    milestones
}

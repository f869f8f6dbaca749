//! Point awards for user actions.

use serde::{Deserialize, Serialize};

use super::streak::StreakDelta;
use crate::application::{ApplicationRecord, ApplicationStatus};

/// Something the user did that may be worth points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    CreateApplication,
    UpdateStatus {
        old_status: ApplicationStatus,
        new_status: ApplicationStatus,
    },
    StreakBonus,
    BulkImport {
        count: usize,
    },
    /// Any tag this build does not know. Scores nothing.
    #[serde(other)]
    Unknown,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::CreateApplication => "create_application",
            Action::UpdateStatus { .. } => "update_status",
            Action::StreakBonus => "streak_bonus",
            Action::BulkImport { .. } => "bulk_import",
            Action::Unknown => "unknown",
        }
    }
}

/// What the calculator knows about the call besides the action itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsContext {
    pub streak: StreakDelta,
}

/// Point values per action. Defaults: 10 / 25 / 50 / 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsPolicy {
    #[serde(default = "default_application")]
    pub application: u32,
    #[serde(default = "default_interview")]
    pub interview: u32,
    #[serde(default = "default_offer")]
    pub offer: u32,
    #[serde(default = "default_streak_bonus")]
    pub streak_bonus: u32,
}

fn default_application() -> u32 {
    10
}
fn default_interview() -> u32 {
    25
}
fn default_offer() -> u32 {
    50
}
fn default_streak_bonus() -> u32 {
    5
}

impl Default for PointsPolicy {
    fn default() -> Self {
        Self {
            application: default_application(),
            interview: default_interview(),
            offer: default_offer(),
            streak_bonus: default_streak_bonus(),
        }
    }
}

impl PointsPolicy {
    /// Points earned by `action`.
    ///
    /// The streak bonus action only pays on the day the streak grows, so
    /// repeating it later the same day earns nothing.
    pub fn points_for(&self, action: &Action, ctx: &PointsContext) -> u32 {
        use ApplicationStatus::*;

        match action {
            Action::CreateApplication => self.application,
            Action::UpdateStatus {
                old_status,
                new_status,
            } => match (old_status, new_status) {
                (Applied, Interview) => self.interview,
                (Applied | Interview, Offered) => self.offer,
                _ => 0,
            },
            Action::StreakBonus if ctx.streak.earns_bonus() => self.streak_bonus,
            Action::StreakBonus | Action::BulkImport { .. } | Action::Unknown => 0,
        }
    }

    /// One-off back-calculation for users who had applications before their
    /// gamification state existed.
    pub fn retroactive_points(&self, applications: &[ApplicationRecord]) -> u32 {
        applications.iter().fold(0u32, |acc, app| {
            let mut points = self.application;
            if app.status.counts_as_interview() {
                points = points.saturating_add(self.interview);
            }
            if app.status.counts_as_offer() {
                points = points.saturating_add(self.offer);
            }
            acc.saturating_add(points)
        })
    }

    /// Old point total at or above which the user is assumed to have had an
    /// interview already.
    pub fn interview_threshold(&self) -> u32 {
        self.interview
    }

    /// Old point total at or above which the user is assumed to have had an
    /// offer already.
    pub fn offer_threshold(&self) -> u32 {
        self.application
            .saturating_add(self.interview)
            .saturating_add(self.offer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::NewApplication;
    use chrono::{NaiveDate, Utc};

    const NO_STREAK: PointsContext = PointsContext {
        streak: StreakDelta::NoChange,
    };

    fn change(old_status: ApplicationStatus, new_status: ApplicationStatus) -> Action {
        Action::UpdateStatus {
            old_status,
            new_status,
        }
    }

    #[test]
    fn policy_table() {
        use ApplicationStatus::*;
        let policy = PointsPolicy::default();
        assert_eq!(policy.points_for(&Action::CreateApplication, &NO_STREAK), 10);
        assert_eq!(policy.points_for(&change(Applied, Interview), &NO_STREAK), 25);
        assert_eq!(policy.points_for(&change(Applied, Offered), &NO_STREAK), 50);
        assert_eq!(policy.points_for(&change(Interview, Offered), &NO_STREAK), 50);
        assert_eq!(policy.points_for(&change(Offered, Accepted), &NO_STREAK), 0);
        assert_eq!(policy.points_for(&change(Interview, Rejected), &NO_STREAK), 0);
        assert_eq!(policy.points_for(&change(Rejected, Interview), &NO_STREAK), 0);
        assert_eq!(policy.points_for(&Action::BulkImport { count: 12 }, &NO_STREAK), 0);
        assert_eq!(policy.points_for(&Action::Unknown, &NO_STREAK), 0);
    }

    #[test]
    fn streak_bonus_only_on_increment() {
        let policy = PointsPolicy::default();
        let inc = PointsContext {
            streak: StreakDelta::Increment,
        };
        assert_eq!(policy.points_for(&Action::StreakBonus, &inc), 5);
        assert_eq!(policy.points_for(&Action::StreakBonus, &NO_STREAK), 0);
    }

    #[test]
    fn unknown_tag_deserializes_to_unknown() {
        let action: Action = serde_json::from_str(r#"{"action":"archive_everything"}"#).unwrap();
        assert_eq!(action, Action::Unknown);

        let action: Action = serde_json::from_str(
            r#"{"action":"update_status","old_status":"applied","new_status":"interview"}"#,
        )
        .unwrap();
        assert_eq!(action, change(ApplicationStatus::Applied, ApplicationStatus::Interview));
    }

    #[test]
    fn retroactive_points_per_stage() {
        use ApplicationStatus::*;
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let apps: Vec<_> = [Applied, Interview, Offered, Accepted, Rejected]
            .into_iter()
            .map(|s| {
                NewApplication::new("Acme", "Dev")
                    .with_status(s)
                    .into_record(today, Utc::now())
                    .unwrap()
            })
            .collect();
        // 5*10 + 3*25 + 2*50
        assert_eq!(PointsPolicy::default().retroactive_points(&apps), 225);
        assert_eq!(PointsPolicy::default().retroactive_points(&[]), 0);
    }

    #[test]
    fn heuristic_thresholds() {
        let policy = PointsPolicy::default();
        assert_eq!(policy.interview_threshold(), 25);
        assert_eq!(policy.offer_threshold(), 85);
    }
}

//! Display queue for milestones.
//!
//! One milestone is visible at a time. Further milestones wait in a FIFO
//! backlog and are promoted when the visible one is dismissed, either by the
//! user or because its display window ran out. The queue has no clock of its
//! own: callers pass `now`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::milestone::Milestone;

/// Default time a milestone stays on screen.
pub const DEFAULT_DISPLAY_SECS: i64 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveMilestone {
    pub milestone: Milestone,
    pub shown_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MilestoneQueue {
    active: Option<ActiveMilestone>,
    backlog: VecDeque<Milestone>,
    display_for: Duration,
}

impl Default for MilestoneQueue {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_DISPLAY_SECS))
    }
}

impl MilestoneQueue {
    pub fn new(display_for: Duration) -> Self {
        Self {
            active: None,
            backlog: VecDeque::new(),
            display_for,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn active(&self) -> Option<&Milestone> {
        self.active.as_ref().map(|a| &a.milestone)
    }

    pub fn pending(&self) -> impl Iterator<Item = &Milestone> {
        self.backlog.iter()
    }

    /// Visible plus waiting.
    pub fn len(&self) -> usize {
        self.backlog.len() + usize::from(self.active.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none() && self.backlog.is_empty()
    }

    pub fn display_for(&self) -> Duration {
        self.display_for
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Append milestones in order. If nothing is showing, the first one
    /// becomes visible immediately.
    pub fn enqueue(&mut self, milestones: impl IntoIterator<Item = Milestone>, now: DateTime<Utc>) {
        self.backlog.extend(milestones);
        if self.active.is_none() {
            self.promote(now);
        }
    }

    /// Dismiss the visible milestone and show the next one.
    pub fn dismiss(&mut self, now: DateTime<Utc>) -> Option<Milestone> {
        let dismissed = self.active.take().map(|a| a.milestone);
        self.promote(now);
        dismissed
    }

    /// Dismiss every milestone whose display window has elapsed by `now`.
    ///
    /// Each promoted milestone's window starts when the previous one expired,
    /// so a late call catches up as if the timer had fired on time.
    pub fn dismiss_expired(&mut self, now: DateTime<Utc>) -> Vec<Milestone> {
        let mut expired = Vec::new();
        while let Some(active) = &self.active {
            let deadline = active.shown_at + self.display_for;
            if now < deadline {
                break;
            }
            if let Some(m) = self.dismiss(deadline) {
                expired.push(m);
            }
        }
        expired
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.backlog.clear();
    }

    fn promote(&mut self, now: DateTime<Utc>) {
        self.active = self.backlog.pop_front().map(|milestone| ActiveMilestone {
            milestone,
            shown_at: now,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamification::milestone::MilestoneKind;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn first_enqueued_becomes_active() {
        let mut queue = MilestoneQueue::default();
        assert!(queue.is_empty());
        queue.enqueue(
            vec![Milestone::rank_up("Applicant"), Milestone::first_application()],
            t0(),
        );
        assert_eq!(queue.active().unwrap().kind, MilestoneKind::RankUp);
        assert_eq!(queue.pending().count(), 1);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn later_batches_wait_behind_active() {
        let mut queue = MilestoneQueue::default();
        queue.enqueue(vec![Milestone::first_application()], t0());
        queue.enqueue(vec![Milestone::first_interview()], t0());
        assert_eq!(queue.active().unwrap().kind, MilestoneKind::FirstApplication);

        let dismissed = queue.dismiss(t0()).unwrap();
        assert_eq!(dismissed.kind, MilestoneKind::FirstApplication);
        assert_eq!(queue.active().unwrap().kind, MilestoneKind::FirstInterview);

        queue.dismiss(t0());
        assert!(queue.is_empty());
        assert!(queue.dismiss(t0()).is_none());
    }

    #[test]
    fn expiry_promotes_next() {
        let mut queue = MilestoneQueue::default();
        queue.enqueue(
            vec![
                Milestone::first_application(),
                Milestone::ten_applications(),
                Milestone::first_offer(),
            ],
            t0(),
        );

        assert!(queue.dismiss_expired(t0() + Duration::seconds(3)).is_empty());

        let expired = queue.dismiss_expired(t0() + Duration::seconds(4));
        assert_eq!(expired.len(), 1);
        assert_eq!(queue.active().unwrap().kind, MilestoneKind::TenApplications);

        // 9s: the second expired at 8s, the third shows from 8s to 12s
        let expired = queue.dismiss_expired(t0() + Duration::seconds(9));
        assert_eq!(expired.len(), 1);
        assert_eq!(queue.active().unwrap().kind, MilestoneKind::FirstOffer);

        let expired = queue.dismiss_expired(t0() + Duration::seconds(60));
        assert_eq!(expired.len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let mut queue = MilestoneQueue::new(Duration::seconds(1));
        queue.enqueue(vec![Milestone::first_application(), Milestone::first_offer()], t0());
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
    }
}

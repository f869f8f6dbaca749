//! Integration tests for the tracker against an on-disk database.
//!
//! These walk a user through several days of activity, reopening the
//! database between steps, and feed the resulting milestones through the
//! display queue.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use jobquest_core::storage::DEFAULT_USER;
use jobquest_core::{
    ApplicationPatch, ApplicationStatus, Config, Database, MilestoneKind, MilestoneQueue,
    NewApplication, Tracker,
};
use tempfile::TempDir;

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, n).unwrap()
}

fn kinds(milestones: &[jobquest_core::Milestone]) -> Vec<MilestoneKind> {
    milestones.iter().map(|m| m.kind).collect()
}

#[test]
fn test_week_of_job_hunting() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("jobquest.db");
    let config = Config::default();

    // Day 1-5: one application a day. From day 2 on, each day also earns
    // the +5 streak bonus.
    let expected: [(u32, &[MilestoneKind]); 5] = [
        (10, &[MilestoneKind::FirstApplication]),
        (25, &[]),
        (40, &[]),
        (55, &[MilestoneKind::RankUp]),
        (70, &[MilestoneKind::FiveDayStreak]),
    ];
    let mut first_id = String::new();
    for (n, (points, milestones)) in (1..=5).zip(expected) {
        let db = Database::open_at(&path, DEFAULT_USER).unwrap();
        let tracker = Tracker::new(&db, config.engine());
        let outcome = tracker
            .create_application(NewApplication::new(format!("Company {n}"), "Engineer"), day(n))
            .unwrap();
        assert_eq!(outcome.state.streak_days, n, "day {n}");
        assert_eq!(outcome.state.points, points, "day {n}");
        assert_eq!(kinds(&outcome.milestones), milestones, "day {n}");
        if n == 1 {
            first_id = outcome.applications[0].id.clone();
        }
        if n == 4 {
            assert_eq!(outcome.state.rank, "Applicant");
        }
    }

    // Day 6: interview, then offer on the same application
    let db = Database::open_at(&path, DEFAULT_USER).unwrap();
    let tracker = Tracker::new(&db, config.engine());
    let interview = tracker
        .update_application(&first_id, &ApplicationPatch::status(ApplicationStatus::Interview), day(6))
        .unwrap();
    // 70 + 5 bonus + 25
    assert_eq!(interview.state.points, 100);
    assert_eq!(interview.state.streak_days, 6);
    // 70 points already reads as "had an interview" to the points heuristic
    assert!(interview.milestones.is_empty());

    // Same day: no second bonus
    let offer = tracker
        .update_application(&first_id, &ApplicationPatch::status(ApplicationStatus::Offered), day(6))
        .unwrap();
    assert_eq!(offer.state.points, 150);
    assert_eq!(offer.state.streak_days, 6);
    assert_eq!(offer.state.rank, "Interviewer");
    // 100 points is past the offer threshold (85), so only the rank-up fires
    assert_eq!(kinds(&offer.milestones), vec![MilestoneKind::RankUp]);

    // Same state is visible after reopening
    drop(tracker);
    drop(db);
    let db = Database::open_at(&path, DEFAULT_USER).unwrap();
    let tracker = Tracker::new(&db, config.engine());
    let summary = tracker.summary().unwrap();
    assert_eq!(summary.rank, "Interviewer");
    assert_eq!(summary.points, 150);
    assert_eq!(summary.streak, 6);
    assert_eq!(summary.next_rank.as_deref(), Some("Contender"));
    assert_eq!(summary.points_to_next, 200);
    assert_eq!(summary.progress_percent, 0);
}

#[test]
fn test_streak_bonus_alone_crosses_rank_threshold() {
    let dir = TempDir::new().unwrap();
    let db = Database::open_at(&dir.path().join("jobquest.db"), DEFAULT_USER).unwrap();
    let mut config = Config::default();
    config.set("points.application", "15").unwrap();
    let tracker = Tracker::new(&db, config.engine());

    let mut last_id = String::new();
    for company in ["Acme", "Beta", "Gamma"] {
        let outcome = tracker
            .create_application(NewApplication::new(company, "Dev"), day(1))
            .unwrap();
        last_id = outcome.applications[0].id.clone();
    }
    let before = tracker.load_or_seed_state().unwrap();
    assert_eq!(before.points, 45);
    assert_eq!(before.rank, "Newcomer");

    // A rejection scores nothing, but it is the next day's activity
    let outcome = tracker
        .update_application(&last_id, &ApplicationPatch::status(ApplicationStatus::Rejected), day(2))
        .unwrap();
    assert_eq!(outcome.state.points, 50);
    assert_eq!(outcome.state.streak_days, 2);
    assert_eq!(outcome.state.rank, "Applicant");
    assert_eq!(kinds(&outcome.milestones), vec![MilestoneKind::RankUp]);
    assert_eq!(outcome.milestones[0].title, "Rank Up: Applicant!");
}

#[test]
fn test_gap_resets_streak_without_losing_points() {
    let dir = TempDir::new().unwrap();
    let db = Database::open_at(&dir.path().join("jobquest.db"), DEFAULT_USER).unwrap();
    let tracker = Tracker::new(&db, Config::default().engine());

    tracker
        .create_application(NewApplication::new("Acme", "Dev"), day(1))
        .unwrap();
    // day 2: +5 for extending the streak, +5 for the check-in itself
    let tick = tracker.streak_tick(day(2)).unwrap();
    assert_eq!(tick.state.points, 20);
    let after_gap = tracker
        .create_application(NewApplication::new("Beta", "Dev"), day(9))
        .unwrap();
    assert_eq!(after_gap.state.streak_days, 1);
    assert_eq!(after_gap.state.points, 30);
    assert_eq!(after_gap.state.last_activity, Some(day(9)));
}

#[test]
fn test_users_share_a_file_but_not_state() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("jobquest.db");
    let config = Config::default();

    let alice_db = Database::open_at(&path, "alice").unwrap();
    let alice = Tracker::new(&alice_db, config.engine());
    alice
        .create_application(NewApplication::new("Acme", "Dev"), day(1))
        .unwrap();

    let bob_db = Database::open_at(&path, "bob").unwrap();
    let bob = Tracker::new(&bob_db, config.engine());
    assert!(bob.applications().unwrap().is_empty());
    assert_eq!(bob.load_or_seed_state().unwrap().points, 0);
    assert_eq!(alice.load_or_seed_state().unwrap().points, 10);
}

#[test]
fn test_custom_rank_table_from_config_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
[points]
application = 30

[[ranks]]
name = "Rookie"
threshold = 0

[[ranks]]
name = "Veteran"
threshold = 30
"#,
    )
    .unwrap();
    let config = Config::load_from(&config_path).unwrap();

    let db = Database::open_at(&dir.path().join("jobquest.db"), DEFAULT_USER).unwrap();
    let tracker = Tracker::new(&db, config.engine());
    let outcome = tracker
        .create_application(NewApplication::new("Acme", "Dev"), day(1))
        .unwrap();
    assert_eq!(outcome.state.rank, "Veteran");
    assert_eq!(
        kinds(&outcome.milestones),
        vec![MilestoneKind::RankUp, MilestoneKind::FirstApplication]
    );

    let summary = tracker.summary().unwrap();
    assert_eq!(summary.progress_percent, 100);
    assert_eq!(summary.next_rank, None);
}

#[test]
fn test_invalid_rank_table_in_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
[[ranks]]
name = "Rookie"
threshold = 10
"#,
    )
    .unwrap();
    assert!(Config::load_from(&config_path).is_err());
}

#[test]
fn test_milestones_drain_through_queue() {
    let db = Database::open_memory(DEFAULT_USER).unwrap();
    let tracker = Tracker::new(&db, Config::default().engine());
    let rows: Vec<_> = (0..9)
        .map(|i| NewApplication::new(format!("Company {i}"), "Dev"))
        .collect();
    tracker.import_applications(rows, day(1)).unwrap();

    // 10th application as an offer: ten_applications + first_interview + first_offer
    let outcome = tracker
        .create_application(
            NewApplication::new("Acme", "Dev").with_status(ApplicationStatus::Offered),
            day(1),
        )
        .unwrap();
    assert_eq!(
        kinds(&outcome.milestones),
        vec![
            MilestoneKind::TenApplications,
            MilestoneKind::FirstInterview,
            MilestoneKind::FirstOffer
        ]
    );

    let t0 = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();
    let mut queue = MilestoneQueue::new(Duration::seconds(4));
    queue.enqueue(outcome.milestones.clone(), t0);
    assert_eq!(queue.active().map(|m| m.kind), Some(MilestoneKind::TenApplications));

    let expired = queue.dismiss_expired(t0 + Duration::seconds(9));
    assert_eq!(
        kinds(&expired),
        vec![MilestoneKind::TenApplications, MilestoneKind::FirstInterview]
    );
    assert_eq!(queue.active().map(|m| m.kind), Some(MilestoneKind::FirstOffer));

    queue.dismiss(t0 + Duration::seconds(10));
    assert!(queue.is_empty());
}

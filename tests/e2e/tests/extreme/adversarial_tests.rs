//! # Adversarial Tests
//!
//! Double submits, forged tickets, failing collaborators, out-of-range
//! input and corrupted records.

use chrono::Duration;
use kioku_core::{
    CardTicket, Grade, InMemoryStore, LearnerProfile, ReviewScheduler, ScheduleState,
    ScheduleStore, SchedulerError, SessionStatus, StorageError, StudySession,
};
use kioku_e2e_tests::{FlakyStore, StudyHarness, TestClock, TestDataFactory};

const LEARNER: &str = "learner-1";

fn flaky_store() -> FlakyStore {
    FlakyStore::new(TestDataFactory::create_deck("Deck", 1, 3))
}

fn started(store: &FlakyStore, clock: &TestClock) -> StudySession {
    let mut session = StudySession::new(ReviewScheduler::default(), LEARNER, "Deck");
    session.start(store, store, store, clock.now()).unwrap();
    session
}

// ============================================================================
// STALE RATINGS
// ============================================================================

/// Test that a double-tapped answer only counts once
#[test]
fn test_double_submit_is_discarded() {
    let harness = StudyHarness::new(TestDataFactory::create_deck("Deck", 1, 3));
    let now = harness.clock.now();
    let mut session = harness.start("Deck");

    let (ticket, _) = session.current_card().unwrap();
    session.rate(ticket, Grade::Good, now, &harness.store, &harness.store).unwrap();
    let err = session
        .rate(ticket, Grade::Again, now, &harness.store, &harness.store)
        .unwrap_err();

    assert!(matches!(err, SchedulerError::StaleRating { item_id: 1, .. }));
    assert!(err.is_silent());
    assert_eq!(session.remaining(), 2);
    assert_eq!(session.current_card().unwrap().1.id, 2);
    assert_eq!(harness.state(1).unwrap().lapses, 0);
    assert_eq!(harness.store.points(&harness.learner).unwrap(), 10);
}

/// Test that a late answer arriving after the session finished is dropped
#[test]
fn test_rating_after_completion_is_stale() {
    let harness = StudyHarness::new(TestDataFactory::create_deck("Deck", 1, 1));
    let now = harness.clock.now();
    let mut session = harness.start("Deck");

    let (ticket, _) = session.current_card().unwrap();
    let report = session
        .rate(ticket, Grade::Good, now, &harness.store, &harness.store)
        .unwrap();
    assert_eq!(report.status, SessionStatus::Complete);

    let err = session
        .rate(ticket, Grade::Good, now, &harness.store, &harness.store)
        .unwrap_err();
    assert!(err.is_silent());
    assert_eq!(session.summary().reviewed, 1);
}

/// Test that tickets naming another card or version are rejected
#[test]
fn test_forged_tickets_are_rejected() {
    let harness = StudyHarness::new(TestDataFactory::create_deck("Deck", 1, 3));
    let now = harness.clock.now();
    let mut session = harness.start("Deck");
    let (ticket, _) = session.current_card().unwrap();

    let forged = [
        CardTicket { item_id: 2, ..ticket },
        CardTicket { version: ticket.version + 1, ..ticket },
        CardTicket { item_id: 999, version: 0 },
    ];
    for forged in forged {
        let err = session
            .rate(forged, Grade::Perfect, now, &harness.store, &harness.store)
            .unwrap_err();
        assert!(err.is_silent());
    }

    assert_eq!(session.remaining(), 3);
    assert!(harness.states().is_empty());
    session.rate(ticket, Grade::Good, now, &harness.store, &harness.store).unwrap();
}

/// Test that rating before the session started is a caller error, not a stale one
#[test]
fn test_rating_before_start() {
    let store = InMemoryStore::with_items(TestDataFactory::create_deck("Deck", 1, 1));
    let mut session = StudySession::new(ReviewScheduler::default(), LEARNER, "Deck");
    let ticket = CardTicket { item_id: 1, version: 0 };

    let err = session
        .rate(ticket, Grade::Good, TestClock::new().now(), &store, &store)
        .unwrap_err();
    assert!(matches!(err, SchedulerError::NoCurrentCard));
    assert!(!err.is_silent());
}

// ============================================================================
// FAILING COLLABORATORS
// ============================================================================

/// Test that a failed save keeps the card showing and can be retried
#[test]
fn test_save_failure_then_retry() {
    let store = flaky_store();
    let clock = TestClock::new();
    let mut session = started(&store, &clock);
    let (ticket, _) = session.current_card().unwrap();

    store.fail_saves(true);
    let err = session
        .rate(ticket, Grade::Good, clock.now(), &store, &store)
        .unwrap_err();
    assert!(matches!(err, SchedulerError::Storage(_)));
    assert!(!err.is_silent());
    assert_eq!(session.remaining(), 3);
    assert!(session.state(1).is_none());
    assert_eq!(store.inner.points(LEARNER).unwrap(), 0);

    store.fail_saves(false);
    let report = session
        .rate(ticket, Grade::Good, clock.now(), &store, &store)
        .unwrap();
    assert_eq!(report.outcome.state.half_life_hours, 72.0);
    assert_eq!(store.save_attempts(), 2);
    assert_eq!(session.remaining(), 2);
}

/// Test that a broken points ledger never blocks studying
#[test]
fn test_points_failure_is_not_fatal() {
    let store = flaky_store();
    let clock = TestClock::new();
    let mut session = started(&store, &clock);
    store.fail_points(true);

    while let Some((ticket, _)) = session.current_card() {
        let report = session
            .rate(ticket, Grade::Good, clock.now(), &store, &store)
            .unwrap();
        assert_eq!(report.points_awarded, 0);
    }

    assert_eq!(session.status(), SessionStatus::Complete);
    assert_eq!(session.summary().points, 0);
    assert_eq!(store.load_schedule_states(LEARNER).unwrap().len(), 3);
}

/// Test that a load failure leaves the session startable once storage recovers
#[test]
fn test_load_failure_then_restart() {
    let store = flaky_store();
    let now = TestClock::new().now();
    let mut session = StudySession::new(ReviewScheduler::default(), LEARNER, "Deck");

    store.fail_loads(true);
    let err = session.start(&store, &store, &store, now).unwrap_err();
    assert!(matches!(err, SchedulerError::Storage(_)));
    assert_eq!(session.status(), SessionStatus::NotStarted);

    store.fail_loads(false);
    assert_eq!(
        session.start(&store, &store, &store, now).unwrap(),
        SessionStatus::InProgress
    );
    assert!(matches!(
        session.start(&store, &store, &store, now),
        Err(SchedulerError::SessionAlreadyStarted)
    ));
}

// ============================================================================
// OUT-OF-RANGE INPUT
// ============================================================================

/// Test that ratings outside 1-5 are rejected
#[test]
fn test_invalid_ratings_rejected() {
    let scheduler = ReviewScheduler::default();
    let now = TestClock::new().now();
    let state = ScheduleState::new(1, now);

    for rating in [0, 6, -1, i32::MIN, i32::MAX] {
        let err = scheduler.apply_rating(&state, rating, now).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidGrade(r) if r == rating));
    }
    for rating in 1..=5 {
        assert!(scheduler.apply_rating(&state, rating, now).is_ok());
    }
}

/// Test that an unknown deck and an empty catalog finish at once
#[test]
fn test_empty_sessions_complete_immediately() {
    let store = InMemoryStore::with_items(TestDataFactory::create_deck("Deck", 1, 3));
    let now = TestClock::new().now();

    let mut unknown = StudySession::new(ReviewScheduler::default(), LEARNER, "Nope");
    assert_eq!(
        unknown.start(&store, &store, &store, now).unwrap(),
        SessionStatus::Complete
    );

    let empty = InMemoryStore::new();
    let mut session = StudySession::new(ReviewScheduler::default(), LEARNER, "Deck");
    assert_eq!(
        session.start(&empty, &empty, &empty, now).unwrap(),
        SessionStatus::Complete
    );
    assert!(session.current_card().is_none());
}

/// Test that a zero daily limit is refused and cannot empty later sessions
#[test]
fn test_zero_daily_limit_refused() {
    let store = InMemoryStore::with_items(TestDataFactory::create_deck("Deck", 1, 3));
    let now = TestClock::new().now();
    store.save_daily_limit(LEARNER, 2).unwrap();

    let err = store.save_daily_limit(LEARNER, 0).unwrap_err();
    assert!(matches!(err, StorageError::InvalidValue(_)));
    assert_eq!(store.load_daily_limit(LEARNER).unwrap(), 2);

    let mut session = StudySession::new(ReviewScheduler::default(), LEARNER, "Deck");
    assert_eq!(
        session.start(&store, &store, &store, now).unwrap(),
        SessionStatus::InProgress
    );
    assert_eq!(session.remaining(), 2);
}

// ============================================================================
// CORRUPTED RECORDS
// ============================================================================

/// Test that corrupted half-lives are pulled back inside the bounds
#[test]
fn test_corrupted_half_lives_are_clamped() {
    let scheduler = ReviewScheduler::default();
    let config = scheduler.config().clone();
    let now = TestClock::new().now();

    for bad in [f64::NAN, f64::INFINITY, 1e300, -5.0, 0.5] {
        let state = ScheduleState {
            half_life_hours: bad,
            ..TestDataFactory::create_reviewed_state(1, 1.0, 4, 10, now)
        };
        for grade in Grade::ALL {
            let next = scheduler.apply_review(&state, grade, now).state;
            assert!(
                next.half_life_hours >= config.min_half_life_hours
                    && next.half_life_hours <= config.max_half_life_hours,
                "half-life {} -> {} for {:?}",
                bad,
                next.half_life_hours,
                grade
            );
        }
    }
}

/// Test that a review stamped before the last one does not break the model
#[test]
fn test_clock_moving_backwards() {
    let scheduler = ReviewScheduler::default();
    let now = TestClock::new().now();
    let state = TestDataFactory::create_reviewed_state(1, 50.0, 2, 0, now);
    let earlier = now - Duration::hours(6);

    assert_eq!(state.recall_probability_at(earlier), 1.0);
    let outcome = scheduler.apply_review(&state, Grade::Good, earlier);
    assert!(outcome.state.half_life_hours > 50.0);
    assert!(outcome.state.next_due_at > earlier);
}

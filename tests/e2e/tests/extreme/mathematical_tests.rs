//! # Mathematical Tests
//!
//! Properties of the half-life model that must hold for any input, checked
//! over grids of half-lives, elapsed times and repetition counts.

use std::collections::HashMap;

use chrono::Duration;
use kioku_core::{
    hours_until_probability, plan_session, recall_probability, Grade, ItemId, ReviewScheduler,
    ScheduleState,
};
use kioku_e2e_tests::{TestClock, TestDataFactory};

const HALF_LIVES: [f64; 8] = [2.0, 4.0, 12.0, 72.0, 100.0, 1000.0, 10_000.0, 87_600.0];

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

// ============================================================================
// RECALL CURVE
// ============================================================================

/// Test that one half-life halves recall and each further one halves it again
#[test]
fn test_recall_halves_every_half_life() {
    for h in HALF_LIVES {
        assert_eq!(recall_probability(h, 0.0), 1.0);
        assert!(approx_eq(recall_probability(h, h), 0.5, 1e-12));
        assert!(approx_eq(recall_probability(h, 2.0 * h), 0.25, 1e-12));
        assert!(approx_eq(recall_probability(h, 3.0 * h), 0.125, 1e-12));
    }
}

/// Test that recall falls with time and rises with half-life
#[test]
fn test_recall_monotonicity() {
    for h in HALF_LIVES {
        let mut previous = 1.0;
        for t in (1..200).map(|i| f64::from(i) * 7.5) {
            let p = recall_probability(h, t);
            assert!(p <= previous, "h={} t={}", h, t);
            assert!((0.0..=1.0).contains(&p));
            previous = p;
        }
    }
    for pair in HALF_LIVES.windows(2) {
        assert!(recall_probability(pair[0], 50.0) < recall_probability(pair[1], 50.0));
    }
}

/// Test that the due offset is the exact inverse of the recall curve
#[test]
fn test_due_offset_inverts_recall() {
    for h in HALF_LIVES {
        for target in [0.5, 0.8, 0.9, 0.95] {
            let t = hours_until_probability(h, target);
            assert!(approx_eq(recall_probability(h, t), target, 1e-9));
        }
        assert!(approx_eq(hours_until_probability(h, 0.9), h * 0.152_003, 1e-3 * h));
    }
}

// ============================================================================
// UPDATE RULES
// ============================================================================

/// Test that damping only ever shrinks the growth multiplier
#[test]
fn test_damping_is_monotone() {
    let scheduler = ReviewScheduler::default();
    for grade in [Grade::Good, Grade::Easy, Grade::Perfect] {
        let base = scheduler.config().growth_multiplier(grade);
        assert_eq!(scheduler.effective_multiplier(grade, 0), base);
        assert_eq!(scheduler.effective_multiplier(grade, 1), base);

        let mut previous = base;
        for reps in 2..500 {
            let m = scheduler.effective_multiplier(grade, reps);
            assert!(m < previous);
            assert!(m > 1.0, "{} still grows at {} reps", grade, reps);
            previous = m;
        }
    }
}

/// Test that better grades never give a shorter half-life
#[test]
fn test_grade_ordering_of_outcomes() {
    let scheduler = ReviewScheduler::default();
    let now = TestClock::new().now();

    for h in HALF_LIVES {
        for reps in [0, 1, 3, 10, 50] {
            let state = TestDataFactory::create_reviewed_state(1, h, reps, 24, now);
            let preview = scheduler.preview(&state, now);
            let lives: Vec<f64> = preview.iter().map(|(_, o)| o.state.half_life_hours).collect();
            assert!(lives.windows(2).all(|w| w[0] <= w[1]), "h={} reps={}", h, reps);

            // Hard counts as a miss
            assert_eq!(preview.hard.state.half_life_hours, preview.again.state.half_life_hours);
            assert!(!preview.hard.passed);
        }
    }
}

/// Test that every update lands inside the half-life bounds
#[test]
fn test_updates_stay_in_bounds() {
    let scheduler = ReviewScheduler::default();
    let cfg = scheduler.config();
    let now = TestClock::new().now();

    for h in HALF_LIVES {
        for reps in [0, 1, 2, 5, 20, u32::MAX] {
            let state = TestDataFactory::create_reviewed_state(1, h, reps, 1, now);
            for grade in Grade::ALL {
                let outcome = scheduler.apply_review(&state, grade, now);
                let next = outcome.state.half_life_hours;
                assert!(next >= cfg.min_half_life_hours && next <= cfg.max_half_life_hours);
                if outcome.passed {
                    assert!(outcome.state.next_due_at > now);
                } else {
                    assert_eq!(outcome.state.next_due_at, now);
                }
            }
        }
    }
}

/// Test that a fail is exactly the decay factor with the floor applied
#[test]
fn test_fail_rule() {
    let scheduler = ReviewScheduler::default();
    let now = TestClock::new().now();
    for h in HALF_LIVES {
        let state = TestDataFactory::create_reviewed_state(1, h, 4, 10, now);
        let next = scheduler.apply_review(&state, Grade::Again, now).state;
        assert_eq!(next.half_life_hours, (h * 0.4).max(2.0));
        assert_eq!(next.lapses, state.lapses + 1);
    }
}

// ============================================================================
// SESSION ORDERING
// ============================================================================

/// Test the planner over a spread of histories: sorted, capped, due-only
#[test]
fn test_plan_is_sorted_capped_and_due_only() {
    let now = TestClock::new().now();
    let items = TestDataFactory::create_deck("Grid", 1, 60);
    let mut states: HashMap<ItemId, ScheduleState> = HashMap::new();
    for item in &items {
        let i = item.id;
        if i % 5 == 0 {
            continue;
        }
        let state = if i % 4 == 0 {
            TestDataFactory::create_future_state(i, 50.0, i64::from(i), now)
        } else {
            let hours_ago = i64::from(i % 7) * 12;
            TestDataFactory::create_reviewed_state(i, f64::from(i) * 3.0, 1, hours_ago, now)
        };
        states.insert(i, state);
    }

    for limit in [0, 1, 10, 25, 100] {
        let plan = plan_session(&items, &states, now, limit);
        assert!(plan.len() <= limit as usize);
        assert!(plan.windows(2).all(|w| w[0].probability <= w[1].probability));
        for candidate in &plan {
            match states.get(&candidate.item_id) {
                None => assert_eq!(candidate.probability, 0.0),
                Some(state) => assert!(state.is_due(now)),
            }
        }
    }

    let full = plan_session(&items, &states, now, 100);
    let new_count = items.iter().filter(|i| !states.contains_key(&i.id)).count();
    let due_count = states.values().filter(|s| s.is_due(now)).count();
    assert_eq!(full.len(), new_count + due_count);

    // One minute earlier nothing extra becomes due
    let earlier = plan_session(&items, &states, now - Duration::minutes(1), 100);
    assert!(earlier.len() <= full.len());
}

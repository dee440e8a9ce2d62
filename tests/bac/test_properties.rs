//! Invariants that hold for any profile and any event list

use approx::assert_relative_eq;
use bacsol::prelude::*;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap()
}

fn profiles() -> Vec<Profile> {
    vec![
        Profile::new(80.0, Gender::Male, 30.0, DrinkingFrequency::Occasionally).unwrap(),
        Profile::new(55.0, Gender::Female, 24.0, DrinkingFrequency::Rarely).unwrap(),
        Profile::new(110.0, Gender::Male, 52.0, DrinkingFrequency::Frequently).unwrap(),
    ]
}

fn drinks() -> Vec<DrinkEvent> {
    vec![
        DrinkEvent::new(500.0, 5.0, t0()).unwrap(),
        DrinkEvent::new(150.0, 12.5, t0() + Duration::minutes(20)).unwrap(),
        DrinkEvent::new(40.0, 40.0, t0() + Duration::minutes(70)).unwrap(),
        DrinkEvent::new(330.0, 5.0, t0() + Duration::minutes(200)).unwrap(),
    ]
}

fn foods() -> Vec<FoodEvent> {
    vec![FoodEvent::new(0.7, t0() - Duration::minutes(15)).unwrap()]
}

fn minutes(n: i64) -> DateTime<Utc> {
    t0() + Duration::minutes(n)
}

#[test]
fn bac_is_never_negative() {
    let engine = Engine::default();
    for profile in profiles() {
        for m in (-60..=16 * 60).step_by(7) {
            let bac = engine
                .compute_bac(&profile, &drinks(), &foods(), minutes(m))
                .unwrap();
            assert!(bac >= 0.0, "negative BAC {} at minute {}", bac, m);
        }
    }
}

#[test]
fn no_drinks_is_zero() {
    let engine = Engine::default();
    for profile in profiles() {
        for m in [0, 30, 600] {
            let bac = engine.compute_bac(&profile, &[], &foods(), minutes(m)).unwrap();
            assert_eq!(bac, 0.0);
        }
    }
}

#[test]
fn future_drinks_do_not_count() {
    let engine = Engine::default();
    let profile = &profiles()[0];
    let now = minutes(100);
    let past: Vec<DrinkEvent> = drinks()
        .into_iter()
        .filter(|d| d.consumed_at() <= now)
        .collect();
    assert_eq!(past.len(), 3);

    let all = engine.compute_bac(profile, &drinks(), &foods(), now).unwrap();
    let only_past = engine.compute_bac(profile, &past, &foods(), now).unwrap();
    assert_eq!(all, only_past);
}

#[test]
fn decays_once_drinking_stops() {
    let engine = Engine::default();
    let profile = &profiles()[1];
    let window = engine.options().absorption_window_hours;
    let last = drinks().last().unwrap().consumed_at();
    let absorbed = last + Duration::milliseconds((window * 3_600_000.0) as i64);

    let mut previous = f64::INFINITY;
    for m in (0..=12 * 60).step_by(5) {
        let bac = engine
            .compute_bac(profile, &drinks(), &foods(), absorbed + Duration::minutes(m))
            .unwrap();
        assert!(bac <= previous);
        previous = bac;
    }
    assert_eq!(previous, 0.0);
}

#[test]
fn threshold_projection_is_consistent() {
    let engine = Engine::default();
    let profile = &profiles()[0];
    let drink = vec![DrinkEvent::new(200.0, 40.0, t0()).unwrap()];
    let now = minutes(90);

    let bac = engine.compute_bac(profile, &drink, &[], now).unwrap();
    assert!(bac > engine.options().legal_limit);
    let hours = engine.compute_time_to_legal(bac, profile).unwrap();

    let later = now + Duration::milliseconds((hours.hours() * 3_600_000.0) as i64);
    let at_limit = engine.compute_bac(profile, &drink, &[], later).unwrap();
    assert_relative_eq!(at_limit, engine.options().legal_limit, epsilon = 1e-6);

    let to_zero = engine.compute_time_to_zero(bac, profile).unwrap();
    assert!(to_zero > hours);
}

#[test]
fn evaluation_is_deterministic() {
    let engine = Engine::default();
    let profile = &profiles()[2];
    let at = minutes(135);
    let first = engine.compute_bac(profile, &drinks(), &foods(), at).unwrap();
    // Interleave other evaluations, including later and earlier ones
    for m in [600, 5, 135, 1000] {
        engine
            .compute_bac(profile, &drinks(), &foods(), minutes(m))
            .unwrap();
    }
    let second = engine.compute_bac(profile, &drinks(), &foods(), at).unwrap();
    assert_eq!(first, second);
}

#[test]
fn series_length_and_bounds() {
    let engine = Engine::default();
    let profile = &profiles()[0];
    for (span, interval, expected) in [(60, 15, 5), (70, 15, 6), (360, 30, 13), (1, 5, 2)] {
        let series = engine
            .sample_series(profile, &drinks(), &foods(), t0(), minutes(span), interval)
            .unwrap();
        assert_eq!(series.len(), expected, "span {} interval {}", span, interval);
        assert_eq!(series.start(), Some(t0()));
        assert_eq!(series.end(), Some(minutes(span)));
        assert!(series
            .samples()
            .windows(2)
            .all(|w| w[0].time < w[1].time));
    }
}

#[test]
fn series_matches_pointwise_evaluation() {
    let engine = Engine::default();
    let profile = &profiles()[1];
    let series = engine
        .sample_series(profile, &drinks(), &foods(), t0(), minutes(480), 10)
        .unwrap();
    for sample in &series {
        let bac = engine
            .compute_bac(profile, &drinks(), &foods(), sample.time)
            .unwrap();
        assert_eq!(sample.bac, bac);
        assert_eq!(sample.danger_level, engine.classify_danger(bac));
    }
}

#[test]
fn parallel_series_matches_serial() {
    let engine = Engine::default();
    for profile in profiles() {
        let serial = engine
            .sample_series(&profile, &drinks(), &foods(), t0(), minutes(720), 1)
            .unwrap();
        let parallel = engine
            .sample_series_par(&profile, &drinks(), &foods(), t0(), minutes(720), 1)
            .unwrap();
        assert_eq!(serial, parallel);
    }
}

#[test]
fn danger_levels_are_ordered() {
    let engine = Engine::default();
    let mut previous = DangerLevel::Safe;
    for i in 0..300 {
        let level = engine.classify_danger(i as f64 * 0.01);
        assert!(level >= previous);
        previous = level;
    }
    assert_eq!(previous, DangerLevel::Critical);
}

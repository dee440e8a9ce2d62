//! Worked sessions with hand-computed expectations

use approx::assert_relative_eq;
use bacsol::prelude::*;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap()
}

fn male_80() -> Profile {
    Profile::new(80.0, Gender::Male, 30.0, DrinkingFrequency::Occasionally).unwrap()
}

#[test]
fn single_beer() {
    let engine = Engine::default();
    let drink = DrinkEvent::new(330.0, 5.0, t0()).unwrap();
    assert_relative_eq!(drink.alcohol_grams(), 13.0185, epsilon = 1e-9);

    let peak = 13.0185 / (80.0 * 0.68);
    assert_relative_eq!(peak, 0.2393, epsilon = 1e-4);

    let drinks = vec![drink];
    let bac = |m: i64| {
        engine
            .compute_bac(&male_80(), &drinks, &[], t0() + Duration::minutes(m))
            .unwrap()
    };

    assert_eq!(bac(0), 0.0);
    // A third of the way through absorption
    assert_relative_eq!(bac(15), peak / 3.0, epsilon = 1e-9);
    assert_relative_eq!(bac(45), peak, epsilon = 1e-9);
    // 75 minutes of elimination at 0.16 g/L/h
    assert_relative_eq!(bac(120), peak - 0.16 * 1.25, epsilon = 1e-9);
    assert_eq!(bac(180), 0.0);

    assert_eq!(engine.classify_danger(bac(45)), DangerLevel::Safe);
}

#[test]
fn food_lowers_the_peak() {
    let engine = Engine::default();
    let drinks = vec![DrinkEvent::new(330.0, 5.0, t0()).unwrap()];
    let empty = engine
        .compute_bac(&male_80(), &drinks, &[], t0() + Duration::minutes(45))
        .unwrap();

    // A meal two hours before is past its full effect at 0.5 + 0.5 * 1.5 = 1.25 h
    // and fading back out until the 4 h horizon
    let meal = vec![FoodEvent::new(0.5, t0() - Duration::hours(2)).unwrap()];
    let fed = engine
        .compute_bac(&male_80(), &drinks, &meal, t0() + Duration::minutes(45))
        .unwrap();
    assert!(fed < empty);

    let expected = 0.5 * (1.0 - (2.0 - 1.25) / (4.0 - 1.25)) + (2.0 - 1.25) / (4.0 - 1.25);
    assert_relative_eq!(fed / empty, expected, epsilon = 1e-9);

    // A meal eaten after the drink changes nothing
    let late_meal = vec![FoodEvent::new(0.5, t0() + Duration::minutes(10)).unwrap()];
    let late = engine
        .compute_bac(&male_80(), &drinks, &late_meal, t0() + Duration::minutes(45))
        .unwrap();
    assert_eq!(late, empty);
}

#[test]
fn evening_snapshot() {
    let engine = Engine::default();
    let session = Session::builder(male_80(), t0())
        .named_drink("IPA", 500.0, 6.5, t0())
        .repeat(2, Duration::minutes(40))
        .named_drink("Whisky", 40.0, 40.0, t0() + Duration::minutes(150))
        .build()
        .unwrap();
    assert_eq!(session.drinks().len(), 4);

    let now = t0() + Duration::hours(3);
    let snapshot = engine.snapshot(&session, now).unwrap();
    assert_eq!(snapshot.drink_count, 4);
    assert!(snapshot.bac > engine.options().legal_limit);
    assert!(snapshot.display_bac <= engine.options().display_ceiling);
    assert!(snapshot.time_to_legal.whole_minutes() > 0);
    assert!(snapshot.time_to_zero > snapshot.time_to_legal);

    let later = now + snapshot.time_to_zero.as_duration();
    let after = engine.snapshot(&session, later).unwrap();
    assert_eq!(after.bac, 0.0);
    assert!(after.time_to_zero.is_zero());
}

#[test]
fn live_activity_follows_the_session() {
    let engine = Engine::default();
    let session = Session::builder(male_80(), t0())
        .drink(500.0, 5.0, t0())
        .build()
        .unwrap();

    let state = ActivityState::default();
    let (state, update) = state.start("session-1", &engine.snapshot(&session, t0()).unwrap());
    assert!(matches!(update, Some(ActivityUpdate::Start { .. })));

    let mut state = state;
    let mut ended = false;
    for m in (30..=6 * 60).step_by(30) {
        let snapshot = engine
            .snapshot(&session, t0() + Duration::minutes(m))
            .unwrap();
        let (next, update) = state.update(&snapshot);
        if let Some(ActivityUpdate::End { id, .. }) = update {
            assert_eq!(id, "session-1");
            ended = true;
        }
        state = next;
    }
    assert!(ended);
    assert_eq!(state, ActivityState::Inactive);
}

#[test]
fn custom_options_from_json() {
    let options = EngineOptions::from_json(
        r#"{ "legal_limit": 0.2, "elimination": { "rarely": 0.1, "occasionally": 0.1, "regularly": 0.1, "frequently": 0.1 } }"#,
    )
    .unwrap();
    assert_eq!(options.absorption_window_hours, 0.75);

    let engine = Engine::new(options).unwrap();
    let hours = engine.compute_time_to_legal(0.4, &male_80()).unwrap();
    assert_relative_eq!(hours.hours(), 2.0, epsilon = 1e-12);
    assert_eq!(hours.to_string(), "2h 0m");
}

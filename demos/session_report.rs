//! Session report example
//!
//! Builds an evening session, prints a snapshot every half hour and drives a
//! live activity from those snapshots.
//!
//! Run with: `cargo run --example session_report`
//! Set `RUST_LOG=bacsol=debug` to see the engine's debug output.

use anyhow::Result;
use bacsol::data::parser::write_drink_log;
use bacsol::prelude::*;
use chrono::{Duration, TimeZone, Utc};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== bacsol session report ===\n");

    let start = Utc.with_ymd_and_hms(2024, 6, 1, 19, 0, 0).unwrap();
    let profile = Profile::new(72.0, Gender::Female, 31.0, DrinkingFrequency::Occasionally)?;
    let session = Session::builder(profile, start)
        .named_food("Burger", 0.6, start)
        .named_drink("Lager", 500.0, 5.0, start + Duration::minutes(30))
        .repeat(1, Duration::minutes(45))
        .named_drink("Gin & tonic", 200.0, 10.0, start + Duration::hours(2))
        .build()?;

    println!("{}", session);

    let engine = Engine::default();
    let mut activity = ActivityState::default();

    for step in 0..=16 {
        let now = start + Duration::minutes(30 * step);
        let snapshot = engine.snapshot(&session, now)?;
        println!("{}  {}", now.format("%H:%M"), snapshot);

        let (next, update) = if step == 1 {
            activity.start("evening", &snapshot)
        } else {
            activity.update(&snapshot)
        };
        if let Some(ActivityUpdate::End { id, .. }) = &update {
            println!("      live activity '{}' ended", id);
        }
        activity = next;
    }

    let series = engine.sample_series(
        session.profile(),
        session.drinks(),
        session.foods(),
        start,
        start + Duration::hours(8),
        5,
    )?;
    if let Some(peak) = series.peak() {
        println!(
            "\nPeak {:.2} g/L at {} ({})",
            peak.bac,
            peak.time.format("%H:%M"),
            peak.danger_level
        );
    }
    println!(
        "Above the legal limit for {}",
        Hours::new(series.time_above(engine.options().legal_limit))
    );

    println!("\nDrink log:");
    write_drink_log(&session, std::io::stdout())?;

    Ok(())
}

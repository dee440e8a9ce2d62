//! Reading and writing sessions as JSON and CSV drink logs

use bacsol::data::parser::{
    read_drink_log_from_reader, read_session_json, write_drink_log, write_session_json,
};
use bacsol::prelude::*;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap()
}

const SESSION_JSON: &str = r#"{
    "profile": { "weight_kg": 68.0, "gender": "female", "age": 29, "drinking_frequency": "regularly" },
    "start_time": "2024-06-01T20:00:00Z",
    "drinks": [
        { "volume_ml": 150.0, "alcohol_percentage": 13.0, "consumed_at": "2024-06-01T21:00:00Z", "name": "Rioja" },
        { "volume_ml": 330.0, "alcohol_percentage": 5.0, "consumed_at": "2024-06-01T20:15:00Z" }
    ],
    "foods": [
        { "absorption_factor": 0.6, "consumed_at": "2024-06-01T19:30:00Z" }
    ]
}"#;

const DRINK_LOG: &str = "\
# Friday evening
KIND,TIME,VOLUME_ML,PERCENTAGE,FACTOR,NAME
food,2024-06-01T19:30:00Z,.,.,0.6,Pasta
drink,2024-06-01T21:00:00Z,150,13,.,Rioja
drink,2024-06-01T20:15:00Z,330,5,.,.
";

#[test]
fn session_from_json() {
    let session = Session::from_json(SESSION_JSON).unwrap();
    assert_eq!(session.profile().gender(), Gender::Female);
    assert_eq!(session.drinks().len(), 2);
    // Drinks are sorted on load
    assert_eq!(session.drinks()[0].consumed_at(), t0() + Duration::minutes(15));
    assert_eq!(session.drinks()[1].name(), Some("Rioja"));
    assert!(session.is_active());
}

#[test]
fn invalid_json_values_are_rejected() {
    let negative_weight = SESSION_JSON.replace("68.0", "-68.0");
    match Session::from_json(&negative_weight) {
        Err(BacError::InvalidInput { param, .. }) => assert_eq!(param, "weight_kg"),
        other => panic!("unexpected result: {:?}", other),
    }

    let bad_factor = SESSION_JSON.replace("0.6", "1.6");
    assert!(matches!(
        Session::from_json(&bad_factor),
        Err(BacError::InvalidInput { .. })
    ));

    let truncated = &SESSION_JSON[..SESSION_JSON.len() / 2];
    assert!(matches!(Session::from_json(truncated), Err(BacError::Json(_))));
}

#[test]
fn session_json_file() {
    let session = Session::from_json(SESSION_JSON).unwrap();
    let path = std::env::temp_dir().join(format!("bacsol-session-{}.json", std::process::id()));
    write_session_json(&session, &path).unwrap();
    let loaded = read_session_json(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, session);
}

#[test]
fn drink_log_matches_json() {
    let log = read_drink_log_from_reader(DRINK_LOG.as_bytes()).unwrap();
    assert_eq!(log.drinks.len(), 2);
    assert_eq!(log.foods.len(), 1);
    assert_eq!(log.foods[0].name(), Some("Pasta"));
    assert_eq!(log.drinks[1].name(), Some("Rioja"));

    let json = Session::from_json(SESSION_JSON).unwrap();
    let session = log.into_session(*json.profile(), Some(t0())).unwrap();
    assert_eq!(session.drinks(), json.drinks());

    let engine = Engine::default();
    let at = t0() + Duration::hours(2);
    let from_log = engine.snapshot(&session, at).unwrap();
    let from_json = engine.snapshot(&json, at).unwrap();
    assert_eq!(from_log.bac, from_json.bac);
}

#[test]
fn drink_log_is_written_in_time_order() {
    let session = Session::from_json(SESSION_JSON).unwrap();
    let mut buffer = Vec::new();
    write_drink_log(&session, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    let kinds: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(kinds, vec!["food", "drink", "drink"]);

    let reread = read_drink_log_from_reader(text.as_bytes()).unwrap();
    assert_eq!(reread.drinks, session.drinks().to_vec());
}

#[test]
fn drink_log_errors_name_the_line() {
    let missing = "KIND,TIME,VOLUME_ML,PERCENTAGE,FACTOR,NAME\n\
                   drink,2024-06-01T21:00:00Z,150,.,.,.\n";
    match read_drink_log_from_reader(missing.as_bytes()) {
        Err(BacError::Csv(message)) => {
            assert_eq!(message, "PERCENTAGE is missing on line 2")
        }
        other => panic!("unexpected result: {:?}", other),
    }

    let unknown = "KIND,TIME,VOLUME_ML,PERCENTAGE,FACTOR,NAME\n\
                   snack,2024-06-01T21:00:00Z,.,.,0.5,.\n";
    assert!(read_drink_log_from_reader(unknown.as_bytes()).is_err());

    let bad_time = "KIND,TIME,VOLUME_ML,PERCENTAGE,FACTOR,NAME\n\
                    drink,yesterday,150,13,.,.\n";
    assert!(matches!(
        read_drink_log_from_reader(bad_time.as_bytes()),
        Err(BacError::InvalidTimestamp(_))
    ));
}

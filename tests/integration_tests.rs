use serial_test::serial;
use std::fs;
use tempfile::tempdir;

use brightr::schedule::parse_time_of_day;
use brightr::{Config, Log, Schedule};

fn create_test_config_file(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("brightr").join("config.json");

    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(&config_path, content).unwrap();

    (temp_dir, config_path)
}

#[test]
#[serial]
fn test_integration_schedule_resolution_over_a_day() {
    let config_content = r#"{
        "schedule": [
            {"time": "07:00", "brightness": 70},
            {"time": "22:00", "brightness": 30}
        ]
    }"#;

    let (_temp_dir, config_path) = create_test_config_file(config_content);
    let config = Config::load_from_path(&config_path).unwrap();

    let resolve = |t: &str| {
        config
            .schedule
            .resolve(parse_time_of_day(t).unwrap())
            .unwrap()
    };

    // Early morning still carries yesterday's late-night setting
    assert_eq!(resolve("03:00"), 30);
    assert_eq!(resolve("06:59"), 30);
    assert_eq!(resolve("07:00"), 70);
    assert_eq!(resolve("12:00"), 70);
    assert_eq!(resolve("21:59"), 70);
    assert_eq!(resolve("22:00"), 30);
    assert_eq!(resolve("23:59"), 30);
}

#[test]
#[serial]
fn test_integration_add_persists_across_reload() {
    let config_content = r#"{
        "schedule": [
            {"time": "07:00", "brightness": 70}
        ]
    }"#;

    let (_temp_dir, config_path) = create_test_config_file(config_content);
    let mut config = Config::load_from_path(&config_path).unwrap();

    let noon = parse_time_of_day("12:00").unwrap();
    config.schedule.add_or_replace(noon, 85).unwrap();
    config.save_to_path(&config_path).unwrap();

    let reloaded = Config::load_from_path(&config_path).unwrap();
    assert_eq!(reloaded.schedule.len(), 2);
    assert_eq!(reloaded.schedule.resolve(noon), Ok(85));
}

#[test]
#[serial]
fn test_integration_remove_persists_across_reload() {
    let config_content = r#"{
        "schedule": [
            {"time": "07:00", "brightness": 70},
            {"time": "12:00", "brightness": 85}
        ]
    }"#;

    let (_temp_dir, config_path) = create_test_config_file(config_content);
    let mut config = Config::load_from_path(&config_path).unwrap();

    let noon = parse_time_of_day("12:00").unwrap();
    assert_eq!(config.schedule.remove(noon), Some(85));
    config.save_to_path(&config_path).unwrap();

    let reloaded = Config::load_from_path(&config_path).unwrap();
    assert_eq!(reloaded.schedule.len(), 1);
    // noon falls through to the morning entry now
    assert_eq!(reloaded.schedule.resolve(noon), Ok(70));
}

#[test]
#[serial]
fn test_integration_empty_schedule_is_loadable_but_unresolvable() {
    let (_temp_dir, config_path) = create_test_config_file(r#"{"schedule": []}"#);

    let config = Config::load_from_path(&config_path).unwrap();
    assert!(config.schedule.is_empty());
    assert!(
        config
            .schedule
            .resolve(parse_time_of_day("12:00").unwrap())
            .is_err()
    );
}

#[test]
#[serial]
fn test_integration_invalid_entry_rejected_at_load() {
    let config_content = r#"{
        "schedule": [
            {"time": "07:00", "brightness": 70},
            {"time": "26:00", "brightness": 50}
        ]
    }"#;

    let (_temp_dir, config_path) = create_test_config_file(config_content);
    assert!(Config::load_from_path(&config_path).is_err());
}

#[test]
#[serial]
fn test_integration_default_config_round_trip() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("brightr").join("config.json");

    Log::set_enabled(false);
    Config::create_default_config(&config_path).unwrap();
    Log::set_enabled(true);

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.schedule, Schedule::default_table());

    // The generated file uses the documented wire format
    let raw = fs::read_to_string(&config_path).unwrap();
    assert!(raw.contains(r#""time": "07:00""#));
    assert!(raw.contains(r#""brightness": 70"#));
}

#[test]
#[serial]
fn test_integration_entry_order_in_file_does_not_matter() {
    let shuffled = r#"{
        "schedule": [
            {"time": "22:00", "brightness": 30},
            {"time": "07:00", "brightness": 70},
            {"time": "12:00", "brightness": 80}
        ]
    }"#;

    let (_temp_dir, config_path) = create_test_config_file(shuffled);
    let config = Config::load_from_path(&config_path).unwrap();

    let times: Vec<String> = config
        .schedule
        .entries()
        .map(|e| e.time.format("%H:%M").to_string())
        .collect();
    assert_eq!(times, vec!["07:00", "12:00", "22:00"]);
}

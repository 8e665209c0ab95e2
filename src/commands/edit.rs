//! Schedule inspection and editing commands: show, add, remove.
//!
//! These commands mutate the persisted configuration only after the
//! mutation has been validated in memory, so a rejected edit leaves the
//! file untouched.

use anyhow::Result;
use chrono::Local;

use crate::config::Config;
use crate::logger::Log;
use crate::schedule::{format_time_of_day, parse_time_of_day};

/// Handle the `show` command: print the schedule and the active level.
pub fn handle_show() -> Result<()> {
    Log::log_version();

    let config = Config::load()?;

    if config.schedule.is_empty() {
        Log::log_decorated("No brightness schedule configured");
        Log::log_end();
        return Ok(());
    }

    let now = Local::now().time();
    let active = config.schedule.resolve(now)?;

    Log::log_decorated("Current brightness schedule:");
    for entry in config.schedule.entries() {
        Log::log_indented(&format!(
            "{} → {:>3}%",
            format_time_of_day(entry.time),
            entry.brightness
        ));
    }
    Log::log_decorated(&format!("Active now: {}%", active));

    Log::log_end();
    Ok(())
}

/// Handle the `add` command: insert or update an entry and persist.
pub fn handle_add(time_str: &str, brightness: u8) -> Result<()> {
    Log::log_version();

    let time = parse_time_of_day(time_str)?;
    let mut config = Config::load()?;

    let previous = config.schedule.add_or_replace(time, brightness)?;
    config.save()?;

    match previous {
        Some(old) => Log::log_decorated(&format!(
            "Updated entry at {}: {}% → {}%",
            format_time_of_day(time),
            old,
            brightness
        )),
        None => Log::log_decorated(&format!(
            "Added schedule entry: {} → {}%",
            format_time_of_day(time),
            brightness
        )),
    }

    Log::log_end();
    Ok(())
}

/// Handle the `remove` command: drop an entry if present and persist.
///
/// An absent time is reported but is not an error.
pub fn handle_remove(time_str: &str) -> Result<()> {
    Log::log_version();

    let time = parse_time_of_day(time_str)?;
    let mut config = Config::load()?;

    match config.schedule.remove(time) {
        Some(brightness) => {
            config.save()?;
            Log::log_decorated(&format!(
                "Removed schedule entry {} → {}%",
                format_time_of_day(time),
                brightness
            ));
        }
        None => {
            Log::log_decorated(&format!(
                "No schedule entry at {}",
                format_time_of_day(time)
            ));
        }
    }

    Log::log_end();
    Ok(())
}

//! Time-keyed brightness schedule and its resolution logic.
//!
//! This module owns the core data model: a table mapping wall-clock times
//! to brightness levels, and the lookup that decides which level should be
//! in effect at a given moment. Resolution is a step function over the day
//! with one deliberate wrinkle: before the first entry of the day fires,
//! the previous day's final setting is still in effect (wraparound).
//!
//! Everything here is pure data manipulation. Loading, persistence, and
//! actuation live elsewhere; they hand a validated [`Schedule`] to the
//! daemon loop, which calls [`Schedule::resolve`] once per tick.

use std::collections::BTreeMap;
use std::ops::Bound;

use chrono::{NaiveTime, Timelike};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::constants::MAXIMUM_BRIGHTNESS;

/// Errors produced by schedule construction and resolution.
///
/// Malformed input is rejected at the boundary (CLI parsing, config
/// deserialization, mutation); by the time `resolve` runs, the schedule
/// is known to be valid and only emptiness can fail it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// Brightness outside the 0-100 range.
    #[error("brightness {0} is out of range (0-100)")]
    InvalidBrightness(u8),
    /// A time string that does not parse as 24-hour "HH:MM".
    #[error("invalid time of day '{0}' (expected 24-hour HH:MM)")]
    InvalidTime(String),
    /// Resolution was attempted against a schedule with no entries.
    #[error("schedule has no entries")]
    EmptySchedule,
}

/// A single (time-of-day, brightness) pair.
///
/// Serialized as `{"time": "HH:MM", "brightness": <0-100>}`, the format
/// the persisted configuration uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub brightness: u8,
}

/// The time → brightness lookup table.
///
/// Entries are keyed by time-of-day at minute resolution; inserting at an
/// existing time replaces the previous brightness rather than duplicating.
/// The backing `BTreeMap` keeps entries sorted, which is exactly what
/// resolution needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    entries: BTreeMap<NaiveTime, u8>,
}

impl Schedule {
    /// Create an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schedule from a list of entries, validating each one.
    ///
    /// Later entries win when two share a time, matching the replace
    /// semantics of [`Schedule::add_or_replace`].
    pub fn from_entries(
        entries: impl IntoIterator<Item = ScheduleEntry>,
    ) -> Result<Self, ScheduleError> {
        let mut schedule = Self::new();
        for entry in entries {
            schedule.add_or_replace(entry.time, entry.brightness)?;
        }
        Ok(schedule)
    }

    /// The built-in table used when no configuration exists.
    pub fn default_table() -> Self {
        let entries = crate::constants::DEFAULT_SCHEDULE
            .iter()
            .map(|(time, brightness)| ScheduleEntry {
                time: parse_time_of_day(time).expect("built-in schedule times are valid"),
                brightness: *brightness,
            });
        Self::from_entries(entries).expect("built-in schedule levels are valid")
    }

    /// Resolve the brightness that should be in effect at `now`.
    ///
    /// Selects the latest entry whose time is ≤ `now`. When `now` is
    /// earlier than every entry, the last entry of the day applies
    /// instead: yesterday's final setting carries over past midnight
    /// until the first entry of today fires.
    ///
    /// The result is always one of the entries' levels, never
    /// interpolated, and the same `(schedule, now)` pair always resolves
    /// to the same value.
    pub fn resolve(&self, now: NaiveTime) -> Result<u8, ScheduleError> {
        let last = *self
            .entries
            .values()
            .next_back()
            .ok_or(ScheduleError::EmptySchedule)?;

        Ok(self
            .entries
            .range(..=now)
            .next_back()
            .map(|(_, brightness)| *brightness)
            .unwrap_or(last))
    }

    /// Insert an entry, replacing any existing entry at the same time.
    ///
    /// Returns the previous brightness at that time when one existed, so
    /// callers can report "added" vs "updated". Rejects out-of-range
    /// levels without touching the table.
    pub fn add_or_replace(
        &mut self,
        time: NaiveTime,
        brightness: u8,
    ) -> Result<Option<u8>, ScheduleError> {
        if brightness > MAXIMUM_BRIGHTNESS {
            return Err(ScheduleError::InvalidBrightness(brightness));
        }
        Ok(self.entries.insert(truncate_to_minute(time), brightness))
    }

    /// Remove the entry at `time`, returning its brightness if present.
    ///
    /// Removing an absent time is not an error; `None` lets the caller
    /// report it.
    pub fn remove(&mut self, time: NaiveTime) -> Option<u8> {
        self.entries.remove(&truncate_to_minute(time))
    }

    /// The next entry strictly after `now`, wrapping to the earliest
    /// entry when `now` is past the last one. `None` for an empty table.
    ///
    /// Only used for operator-facing "next change at ..." output; the
    /// polling loop itself runs on a fixed interval.
    pub fn next_change(&self, now: NaiveTime) -> Option<ScheduleEntry> {
        self.entries
            .range((Bound::Excluded(now), Bound::Unbounded))
            .next()
            .or_else(|| self.entries.iter().next())
            .map(|(time, brightness)| ScheduleEntry {
                time: *time,
                brightness: *brightness,
            })
    }

    /// Entries in ascending time order.
    pub fn entries(&self) -> impl Iterator<Item = ScheduleEntry> + '_ {
        self.entries.iter().map(|(time, brightness)| ScheduleEntry {
            time: *time,
            brightness: *brightness,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries())
    }
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<ScheduleEntry>::deserialize(deserializer)?;
        Schedule::from_entries(entries).map_err(D::Error::custom)
    }
}

/// Parse a 24-hour "HH:MM" string into a time-of-day.
pub fn parse_time_of_day(input: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(input, "%H:%M")
        .map_err(|_| ScheduleError::InvalidTime(input.to_string()))
}

/// Format a time-of-day back into the zero-padded "HH:MM" form.
pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

// Entries have minute resolution; strip seconds so lookups and removals
// by a parsed "HH:MM" always hit.
fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).expect("hour/minute came from a valid time")
}

mod hhmm {
    //! Serde adapter for the "HH:MM" wire form of schedule times.

    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(D::Error::custom)
    }
}

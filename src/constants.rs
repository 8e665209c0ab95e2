//! Application constants and default values for brightr.
//!
//! This module contains the configuration defaults, validation limits,
//! and operational constants used throughout the application.

use crate::config::BackendKind;

// ═══ Application Configuration Defaults ═══
// These values are used when config options are not specified by the user

pub const DEFAULT_BACKEND: BackendKind = BackendKind::Auto; // Auto-detect backend
pub const DEFAULT_POLL_INTERVAL: u64 = 60; // seconds between schedule checks

/// Brightness applied when the schedule is empty.
///
/// This is daemon policy, not part of the resolver contract: `resolve`
/// reports an empty schedule as an error and the loop substitutes this.
pub const FALLBACK_BRIGHTNESS: u8 = 70;

/// The built-in schedule written on first run and used when no
/// configuration exists. Times are zero-padded 24-hour "HH:MM".
pub const DEFAULT_SCHEDULE: &[(&str, u8)] = &[
    ("07:00", 70), // morning
    ("12:00", 80), // midday
    ("17:00", 70), // evening
    ("20:00", 50), // night
    ("22:00", 30), // late night
];

// ═══ Validation Limits ═══
// These limits ensure user inputs are within reasonable and safe ranges

pub const MINIMUM_BRIGHTNESS: u8 = 0; // Fully dimmed
pub const MAXIMUM_BRIGHTNESS: u8 = 100; // Full brightness

pub const MINIMUM_POLL_INTERVAL: u64 = 10; // seconds (prevents busy-polling the backend)
pub const MAXIMUM_POLL_INTERVAL: u64 = 3600; // seconds (the schedule has minute resolution)

// ═══ Operational Timing Constants ═══
// Internal timing values for application operation

pub const SLEEP_DETECTION_THRESHOLD_SECS: u64 = 300; // 5 minutes - detect system sleep/resume
pub const CHECK_INTERVAL_SECS: u64 = 1; // How often to check the running flag during sleep
pub const APP_LAUNCH_WAIT_SECS: u64 = 3; // Settle time after launching a helper app

// ═══ Retry and Recovery Constants ═══
// Actuation is best-effort; these bound how hard we push a failing backend

pub const MAX_CONSECUTIVE_FAILURES: u32 = 5; // Failures before widening the poll interval
pub const FAILURE_BACKOFF_MULTIPLIER: u32 = 5; // Interval multiplier once the limit is hit
pub const STOP_WAIT_TIMEOUT_SECS: u64 = 5; // How long `stop` waits for the daemon to exit

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1; // General failure

//! The long-running scheduler loop.
//!
//! [`Daemon`] owns everything the loop needs for its lifetime: the loaded
//! configuration, the actuation backend, signal handling state, and the
//! locked PID file. The loop itself is deliberately simple: once per poll
//! interval, resolve the schedule against the current wall-clock time and
//! forward the result to the backend when it differs from the last level
//! applied.
//!
//! Actuation failures are retried on the next tick; after several
//! consecutive failures the wait widens, since a monitor that is
//! unplugged or asleep will fail every attempt. A reload signal swaps in
//! a freshly loaded configuration between ticks, and a large gap between
//! ticks (system sleep/resume) forces one reapplication.

use anyhow::{Context, Result};
use chrono::Local;
use fs2::FileExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

use crate::backend::{self, BrightnessBackend};
use crate::config::Config;
use crate::constants::*;
use crate::logger::Log;
use crate::process;
use crate::schedule::format_time_of_day;
use crate::signals::{SignalMessage, SignalState, setup_signal_handler};

/// The scheduler session: configuration, backend, signals, and the held
/// PID-file lock. Constructed by the `run` command and consumed by
/// [`Daemon::run`].
pub struct Daemon {
    config: Config,
    backend: Box<dyn BrightnessBackend>,
    signals: SignalState,
    lock_file: File,
    lock_path: PathBuf,
}

impl Daemon {
    /// Acquire the single-instance lock and assemble the session.
    ///
    /// The PID file doubles as the lock: the daemon holds an exclusive
    /// flock on it for its whole lifetime and writes its PID into it for
    /// `stop` and `status`.
    pub fn new(config: Config) -> Result<Self> {
        let lock_path = process::pid_file_path();
        let mut lock_file = File::create(&lock_path)
            .with_context(|| format!("Failed to create PID file at {}", lock_path.display()))?;

        if lock_file.try_lock_exclusive().is_err() {
            anyhow::bail!(
                "Another instance of brightr is already running.\n\
                • Stop it with 'brightr stop' before starting a new one."
            );
        }

        write!(lock_file, "{}", std::process::id()).context("Failed to record PID")?;
        lock_file.flush()?;

        Log::log_decorated("Lock acquired, starting scheduler...");

        let signals = setup_signal_handler()?;
        let backend = backend::create_backend(config.backend())?;

        Ok(Self {
            config,
            backend,
            signals,
            lock_file,
            lock_path,
        })
    }

    /// Run the polling loop until a termination signal arrives.
    pub fn run(mut self) -> Result<()> {
        let mut last_applied: Option<u8> = None;
        let mut fail_count: u32 = 0;
        let mut last_tick = Instant::now();

        while self.signals.running.load(Ordering::SeqCst) {
            // Detect large gaps between ticks (system sleep/resume) and
            // force one reapplication
            let tick = Instant::now();
            let gap = tick.duration_since(last_tick);
            if gap > Duration::from_secs(SLEEP_DETECTION_THRESHOLD_SECS) {
                Log::log_block_start(&format!(
                    "Large time jump detected ({} minutes). System may have resumed from sleep.",
                    gap.as_secs() / 60
                ));
                last_applied = None;
            }
            last_tick = tick;

            let now = Local::now().time();
            let target = match self.config.schedule.resolve(now) {
                Ok(level) => level,
                Err(_) => {
                    // resolve only fails on an empty schedule
                    Log::log_warning(&format!(
                        "Schedule is empty, using default brightness of {}%",
                        FALLBACK_BRIGHTNESS
                    ));
                    FALLBACK_BRIGHTNESS
                }
            };

            // Apply on change, and keep retrying after a failed attempt
            if last_applied != Some(target) || fail_count > 0 {
                match last_applied {
                    Some(previous) => Log::log_block_start(&format!(
                        "Setting brightness to {}% (was {}%)",
                        target, previous
                    )),
                    None => Log::log_block_start(&format!("Setting brightness to {}%", target)),
                }

                match self.backend.set_brightness(target) {
                    Ok(()) => {
                        last_applied = Some(target);
                        fail_count = 0;
                        if let Some(next) = self.config.schedule.next_change(now) {
                            Log::log_decorated(&format!(
                                "Next change at {} → {}%",
                                format_time_of_day(next.time),
                                next.brightness
                            ));
                        }
                    }
                    Err(e) => {
                        fail_count += 1;
                        Log::log_warning(&format!(
                            "Failed to set brightness (attempt {}/{}): {}",
                            fail_count, MAX_CONSECUTIVE_FAILURES, e
                        ));
                    }
                }
            }

            let mut sleep_secs = self.config.poll_interval();
            if fail_count >= MAX_CONSECUTIVE_FAILURES {
                Log::log_error(
                    "Too many consecutive failures. Monitor may be disconnected. Waiting longer...",
                );
                sleep_secs *= u64::from(FAILURE_BACKOFF_MULTIPLIER);
                // Drop back under the limit to try again soon
                fail_count = MAX_CONSECUTIVE_FAILURES / 2;
            }

            self.sleep_and_drain(Duration::from_secs(sleep_secs), &mut last_applied);
        }

        self.cleanup();
        Ok(())
    }

    /// Sleep in short chunks, waking early for signals.
    ///
    /// Reload swaps the configuration and returns immediately so the new
    /// schedule resolves on the next tick; shutdown returns so the loop
    /// condition can observe the cleared running flag.
    fn sleep_and_drain(&mut self, duration: Duration, last_applied: &mut Option<u8>) {
        let check_interval = Duration::from_secs(CHECK_INTERVAL_SECS);
        let mut slept = Duration::ZERO;

        while slept < duration && self.signals.running.load(Ordering::SeqCst) {
            while let Ok(message) = self.signals.receiver.try_recv() {
                match message {
                    SignalMessage::Reload => {
                        if self.reload_config() {
                            *last_applied = None;
                            return;
                        }
                    }
                    SignalMessage::Shutdown => return,
                }
            }

            let chunk = check_interval.min(duration - slept);
            thread::sleep(chunk);
            slept += chunk;
        }
    }

    /// Reload the configuration file, keeping the old one on failure.
    fn reload_config(&mut self) -> bool {
        match Config::load() {
            Ok(new_config) => {
                self.config = new_config;
                Log::log_decorated("Configuration reloaded");
                self.config.log_config();
                true
            }
            Err(e) => {
                Log::log_warning(&format!(
                    "Reload failed, keeping previous configuration: {:#}",
                    e
                ));
                false
            }
        }
    }

    /// Release the lock and remove the PID file.
    fn cleanup(self) {
        Log::log_block_start("Shutting down brightr...");

        drop(self.lock_file);
        if let Err(e) = fs::remove_file(&self.lock_path) {
            Log::log_decorated(&format!("Warning: Failed to remove PID file: {}", e));
        }

        Log::log_decorated("Cleanup complete");
        Log::log_end();
    }
}

//! Actuation backend abstraction for brightness control.
//!
//! Monitor brightness can only be changed through external mechanisms: the
//! Lunar app, the MonitorControl app, or the `brightness` command-line
//! tool. Each is wrapped as one strategy behind the [`BrightnessBackend`]
//! trait, and auto-detection assembles the available strategies into an
//! ordered chain that falls through on failure at the call site.
//!
//! All strategies are best-effort. They shell out to `osascript` or a CLI
//! tool and can fail for reasons outside our control (app not frontmost,
//! monitor unplugged, accessibility permissions revoked); the daemon loop
//! treats a failure as retryable, never fatal.
//!
//! Selection priority in auto mode: Lunar → MonitorControl → brightness
//! tool.

use anyhow::{Context, Result};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use crate::config::BackendKind;
use crate::constants::APP_LAUNCH_WAIT_SECS;
use crate::logger::Log;

pub mod brightness_tool;
pub mod lunar;
pub mod monitorcontrol;

pub use brightness_tool::BrightnessToolBackend;
pub use lunar::LunarBackend;
pub use monitorcontrol::MonitorControlBackend;

/// A strategy that can apply a brightness level to the external monitor.
///
/// The contract is deliberately thin: apply a level in [0,100] and report
/// success or failure. No readback, no partial progress.
pub trait BrightnessBackend {
    /// Apply a brightness level (0-100) to the external monitor.
    fn set_brightness(&mut self, level: u8) -> Result<()>;

    /// Human-readable backend name for logging.
    fn backend_name(&self) -> &'static str;
}

/// Build the backend selected by the configuration.
///
/// An explicit choice is honored without probing; auto mode probes and
/// chains everything that looks usable.
pub fn create_backend(kind: BackendKind) -> Result<Box<dyn BrightnessBackend>> {
    match kind {
        BackendKind::Lunar => Ok(Box::new(LunarBackend::new())),
        BackendKind::MonitorControl => Ok(Box::new(MonitorControlBackend::new())),
        BackendKind::BrightnessTool => Ok(Box::new(BrightnessToolBackend::new())),
        BackendKind::Auto => detect_backend(),
    }
}

/// Probe for available strategies and chain them in priority order.
pub fn detect_backend() -> Result<Box<dyn BrightnessBackend>> {
    let mut backends: Vec<Box<dyn BrightnessBackend>> = Vec::new();

    if LunarBackend::is_available() {
        backends.push(Box::new(LunarBackend::new()));
    }
    if MonitorControlBackend::is_available() {
        backends.push(Box::new(MonitorControlBackend::new()));
    }
    if BrightnessToolBackend::is_available() {
        backends.push(Box::new(BrightnessToolBackend::new()));
    }

    if backends.is_empty() {
        anyhow::bail!(
            "No brightness backend is available.\n\
            \n\
            Install one of:\n\
              • Lunar: brew install --cask lunar\n\
              • MonitorControl: brew install --cask monitorcontrol\n\
              • brightness: brew install brightness"
        );
    }

    Log::log_decorated(&format!(
        "Using {} backend{}",
        backends[0].backend_name(),
        if backends.len() > 1 {
            format!(" ({} fallback(s) available)", backends.len() - 1)
        } else {
            String::new()
        }
    ));

    if backends.len() == 1 {
        Ok(backends.pop().expect("chain has exactly one backend"))
    } else {
        Ok(Box::new(BackendChain { backends }))
    }
}

/// Ordered fallback chain over multiple strategies.
///
/// `set_brightness` tries each strategy in turn and succeeds on the first
/// one that does; the chain only fails when every strategy has failed.
pub struct BackendChain {
    backends: Vec<Box<dyn BrightnessBackend>>,
}

impl BrightnessBackend for BackendChain {
    fn set_brightness(&mut self, level: u8) -> Result<()> {
        let mut last_error = None;

        for backend in &mut self.backends {
            match backend.set_brightness(level) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    Log::log_warning(&format!(
                        "{} backend failed, trying next: {}",
                        backend.backend_name(),
                        e
                    ));
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .expect("chain is never constructed empty")
            .context("All brightness backends failed"))
    }

    fn backend_name(&self) -> &'static str {
        "auto"
    }
}

/// Run an AppleScript snippet via osascript and return trimmed stdout.
pub(crate) fn run_osascript(script: &str) -> Result<String> {
    let output = Command::new("osascript")
        .arg("-e")
        .arg(script)
        .output()
        .context("Failed to run osascript")?;

    if !output.status.success() {
        anyhow::bail!(
            "osascript failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Check whether a command exists on PATH.
pub(crate) fn command_exists(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Make sure a helper app is running, launching it when needed.
///
/// Uses `pgrep -x` for the liveness check and `open -a` to launch, then
/// waits for the app to finish starting so the first scripting command
/// doesn't race its launch.
pub(crate) fn ensure_app_running(app_name: &str) -> Result<()> {
    let running = Command::new("pgrep")
        .arg("-x")
        .arg(app_name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false);

    if running {
        return Ok(());
    }

    Log::log_decorated(&format!("Starting {} app...", app_name));
    let status = Command::new("open")
        .arg("-a")
        .arg(app_name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("Failed to launch {}", app_name))?;

    if !status.success() {
        anyhow::bail!("{} could not be launched", app_name);
    }

    thread::sleep(Duration::from_secs(APP_LAUNCH_WAIT_SECS));
    Ok(())
}

//! Lunar.app brightness strategy.
//!
//! Lunar exposes a scripting dictionary, so the primary path is a single
//! direct AppleScript command. Some Lunar versions only expose the
//! brightness slider through System Events; the secondary path drives
//! that slider when the direct command is rejected.

use anyhow::{Context, Result};
use std::path::Path;

use super::{BrightnessBackend, ensure_app_running, run_osascript};

const LUNAR_APP_PATH: &str = "/Applications/Lunar.app";

pub struct LunarBackend;

impl LunarBackend {
    pub fn new() -> Self {
        Self
    }

    /// Lunar is considered available when installed in the default
    /// location.
    pub fn is_available() -> bool {
        Path::new(LUNAR_APP_PATH).exists()
    }
}

impl Default for LunarBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl BrightnessBackend for LunarBackend {
    fn set_brightness(&mut self, level: u8) -> Result<()> {
        ensure_app_running("Lunar")?;

        let direct = format!(r#"tell application "Lunar" to set brightness to {}"#, level);
        if run_osascript(&direct).is_ok() {
            return Ok(());
        }

        // Older Lunar builds reject the direct command; fall back to the
        // first slider of the main window via System Events.
        let slider = format!(
            r#"tell application "System Events"
    tell process "Lunar"
        set value of slider 1 of window 1 to {}
    end tell
end tell"#,
            level
        );
        run_osascript(&slider)
            .map(|_| ())
            .context("Lunar rejected both the direct command and the slider fallback")
    }

    fn backend_name(&self) -> &'static str {
        "Lunar"
    }
}

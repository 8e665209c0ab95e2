//! MonitorControl brightness strategy.
//!
//! MonitorControl has no scripting dictionary; the only automation
//! surface is its menu-bar popover. The script opens the popover, sets
//! the first slider of the first display group (values 0.0-1.0), and
//! closes the popover again. Requires accessibility permissions for the
//! calling process.

use anyhow::{Context, Result};
use std::path::Path;

use super::{BrightnessBackend, ensure_app_running, run_osascript};

const MONITORCONTROL_APP_PATH: &str = "/Applications/MonitorControl.app";

pub struct MonitorControlBackend;

impl MonitorControlBackend {
    pub fn new() -> Self {
        Self
    }

    pub fn is_available() -> bool {
        Path::new(MONITORCONTROL_APP_PATH).exists()
    }
}

impl Default for MonitorControlBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl BrightnessBackend for MonitorControlBackend {
    fn set_brightness(&mut self, level: u8) -> Result<()> {
        ensure_app_running("MonitorControl")?;

        // The slider takes 0.0-1.0; the popover must be open while the
        // value is set and closed afterwards to commit it.
        let script = format!(
            r#"tell application "System Events"
    tell process "MonitorControl"
        click menu bar item 1 of menu bar 1
        delay 0.5
        set value of slider 1 of group 1 of window 1 to {:.2}
        click menu bar item 1 of menu bar 1
    end tell
end tell"#,
            f64::from(level) / 100.0
        );

        run_osascript(&script)
            .map(|_| ())
            .context("MonitorControl slider could not be driven")
    }

    fn backend_name(&self) -> &'static str {
        "MonitorControl"
    }
}

//! brightness(1) command-line strategy.
//!
//! The `brightness` tool takes a 0.0-1.0 fraction. It mostly reaches
//! built-in panels, which makes it the last resort in the auto chain,
//! but it is the most reliable option when it does apply.

use anyhow::{Context, Result};
use std::process::Command;

use super::{BrightnessBackend, command_exists};

pub struct BrightnessToolBackend;

impl BrightnessToolBackend {
    pub fn new() -> Self {
        Self
    }

    pub fn is_available() -> bool {
        command_exists("brightness")
    }
}

impl Default for BrightnessToolBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl BrightnessBackend for BrightnessToolBackend {
    fn set_brightness(&mut self, level: u8) -> Result<()> {
        let fraction = f64::from(level) / 100.0;

        let output = Command::new("brightness")
            .arg(format!("{:.2}", fraction))
            .output()
            .context("Failed to run the brightness tool")?;

        if !output.status.success() {
            anyhow::bail!(
                "brightness tool failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "brightness tool"
    }
}

//! Implementation of the `test` command for one-shot brightness changes.
//!
//! Applies a level immediately through the configured backend, outside
//! the daemon loop. Useful for checking that actuation works at all
//! before trusting the schedule to it.

use anyhow::Result;

use crate::backend;
use crate::config::Config;
use crate::constants::{EXIT_FAILURE, MAXIMUM_BRIGHTNESS};
use crate::logger::Log;
use crate::schedule::ScheduleError;

/// Handle the `test` command: validate, apply once, report.
pub fn handle_test(brightness: u8) -> Result<()> {
    Log::log_version();

    // Same boundary rule the schedule enforces
    if brightness > MAXIMUM_BRIGHTNESS {
        return Err(ScheduleError::InvalidBrightness(brightness).into());
    }

    let config = Config::load()?;
    let mut backend = backend::create_backend(config.backend())?;

    Log::log_block_start(&format!("Testing brightness: {}%", brightness));

    match backend.set_brightness(brightness) {
        Ok(()) => {
            Log::log_decorated(&format!("Successfully set brightness to {}%", brightness));
            Log::log_end();
            Ok(())
        }
        Err(e) => {
            Log::log_error(&format!(
                "Failed to set brightness to {}%: {:#}",
                brightness, e
            ));
            Log::log_end();
            std::process::exit(EXIT_FAILURE);
        }
    }
}

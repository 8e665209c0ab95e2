//! Command-line interface definition.
//!
//! The CLI only constructs and inspects schedules and drives the daemon;
//! all real argument validation (time format, brightness range) happens
//! at the schedule boundary so the config loader and the CLI reject bad
//! input identically.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "brightr",
    version,
    about = "Time-of-day brightness scheduler for external monitors",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the scheduler daemon in the background
    Start,
    /// Stop the running scheduler daemon
    Stop,
    /// Check whether the scheduler daemon is running
    Status,
    /// Run the scheduler loop in the foreground
    Run,
    /// Show the configured brightness schedule
    Show,
    /// Add or update a schedule entry
    Add {
        /// Time in 24-hour format (HH:MM)
        time: String,
        /// Brightness level (0-100)
        brightness: u8,
    },
    /// Remove a schedule entry
    Remove {
        /// Time in 24-hour format (HH:MM)
        time: String,
    },
    /// Apply a brightness level once, without the daemon
    Test {
        /// Brightness level (0-100)
        brightness: u8,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_subcommand_parses_time_and_level() {
        let cli = Cli::try_parse_from(["brightr", "add", "07:30", "65"]).unwrap();
        match cli.command {
            Command::Add { time, brightness } => {
                assert_eq!(time, "07:30");
                assert_eq!(brightness, 65);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_brightness_must_be_numeric() {
        assert!(Cli::try_parse_from(["brightr", "add", "07:30", "bright"]).is_err());
        assert!(Cli::try_parse_from(["brightr", "test", "300"]).is_err());
    }

    #[test]
    fn test_no_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["brightr"]).is_err());
    }
}

//! Daemon control commands: start, stop, status, run.

use anyhow::Result;

use crate::config::Config;
use crate::daemon::Daemon;
use crate::logger::Log;
use crate::process;

/// Handle the `start` command: spawn a detached daemon process.
pub fn handle_start() -> Result<()> {
    Log::log_version();

    if let Some(pid) = process::daemon_pid() {
        Log::log_decorated(&format!("Scheduler is already running (PID: {})", pid));
        Log::log_end();
        return Ok(());
    }

    let pid = process::spawn_daemon()?;
    Log::log_decorated(&format!("Scheduler started in background (PID: {})", pid));
    Log::log_end();
    Ok(())
}

/// Handle the `stop` command: terminate the running daemon.
pub fn handle_stop() -> Result<()> {
    Log::log_version();

    if process::stop_daemon()? {
        Log::log_decorated("Scheduler stopped");
    } else {
        Log::log_decorated("No running scheduler found");
    }

    Log::log_end();
    Ok(())
}

/// Handle the `status` command: report daemon liveness.
pub fn handle_status() -> Result<()> {
    Log::log_version();

    match process::daemon_pid() {
        Some(pid) => Log::log_decorated(&format!("Scheduler is running (PID: {})", pid)),
        None => Log::log_decorated("Scheduler is not running"),
    }

    Log::log_end();
    Ok(())
}

/// Handle the `run` command: the foreground daemon loop.
///
/// This is what `start` spawns, and what a service manager should invoke
/// directly.
pub fn handle_run() -> Result<()> {
    Log::log_version();

    let config = Config::load()?;
    config.log_config();

    Daemon::new(config)?.run()
}

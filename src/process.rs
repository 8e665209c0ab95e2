//! Daemon process supervision through a PID file.
//!
//! The running daemon holds an exclusive lock on a PID file under the
//! runtime directory and writes its PID into it. This module is the other
//! side of that protocol: `start` spawns a detached `run` process, `stop`
//! signals the recorded PID, and `status` checks liveness. Stale files
//! left behind by a crash are detected and cleaned up.

use anyhow::{Context, Result};
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;
use std::{env, fs, thread};

use crate::constants::STOP_WAIT_TIMEOUT_SECS;
use crate::logger::Log;

/// Path of the PID/lock file the daemon holds while running.
pub fn pid_file_path() -> PathBuf {
    let runtime_dir = env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join("brightr.pid")
}

/// Check whether a process with the given PID exists.
///
/// Signal 0 probes for existence without delivering anything.
pub fn is_pid_alive(pid: i32) -> bool {
    kill(Pid::from_raw(pid), None).is_ok()
}

/// PID of the running daemon, if any.
///
/// Reads the PID file and verifies the process is actually alive; a file
/// pointing at a dead PID is removed so later `start` calls don't refuse
/// to run against a crashed instance.
pub fn daemon_pid() -> Option<i32> {
    let path = pid_file_path();
    let content = fs::read_to_string(&path).ok()?;
    let pid: i32 = content.trim().parse().ok()?;

    if is_pid_alive(pid) {
        Some(pid)
    } else {
        // Stale file from an unclean shutdown
        if fs::remove_file(&path).is_ok() {
            Log::log_decorated("Removed stale PID file");
        }
        None
    }
}

/// Spawn a detached `brightr run` process for the daemon loop.
///
/// Output is discarded; the child acquires the PID-file lock itself, so
/// racing `start` invocations are resolved by the lock, not here.
pub fn spawn_daemon() -> Result<u32> {
    let exe = env::current_exe().context("Failed to determine path to the brightr binary")?;

    let child = Command::new(exe)
        .arg("run")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("Failed to spawn the scheduler daemon")?;

    Ok(child.id())
}

/// Stop the running daemon, waiting briefly for it to exit.
///
/// Returns `Ok(true)` when a daemon was found and terminated, `Ok(false)`
/// when none was running.
pub fn stop_daemon() -> Result<bool> {
    let Some(pid) = daemon_pid() else {
        return Ok(false);
    };

    Log::log_decorated(&format!("Terminating scheduler daemon (PID: {})...", pid));
    kill(Pid::from_raw(pid), Signal::SIGTERM)
        .with_context(|| format!("Failed to signal PID {}", pid))?;

    // The daemon removes its own PID file during cleanup; give it a
    // bounded window to finish.
    let deadline = STOP_WAIT_TIMEOUT_SECS * 10;
    for _ in 0..deadline {
        if !is_pid_alive(pid) {
            return Ok(true);
        }
        thread::sleep(Duration::from_millis(100));
    }

    anyhow::bail!(
        "Daemon (PID {}) did not exit within {} seconds",
        pid,
        STOP_WAIT_TIMEOUT_SECS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_pid_is_alive() {
        assert!(is_pid_alive(std::process::id() as i32));
    }

    #[test]
    fn test_nonexistent_pid_is_not_alive() {
        // PIDs near the Linux default max are vanishingly unlikely to exist
        assert!(!is_pid_alive(i32::MAX - 1));
    }

    #[test]
    fn test_pid_file_path_uses_runtime_dir() {
        let path = pid_file_path();
        assert!(path.ends_with("brightr.pid"));
    }
}

//! Signal handling for the scheduler daemon.
//!
//! A dedicated thread listens for process signals and translates them into
//! messages the main loop drains between ticks. Termination signals also
//! flip the shared running flag so chunked sleeps wake up promptly.

use anyhow::Result;
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR2},
    iterator::Signals,
};
use std::{
    sync::atomic::{AtomicBool, Ordering},
    sync::{Arc, mpsc},
    thread,
};

use crate::logger::Log;

/// Messages delivered from the signal thread to the daemon loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalMessage {
    /// Reload the configuration file (SIGUSR2).
    Reload,
    /// Shut down (SIGTERM, SIGINT, SIGHUP).
    Shutdown,
}

/// Signal handling state shared between the signal thread and the loop.
pub struct SignalState {
    /// Cleared when a termination signal arrives.
    pub running: Arc<AtomicBool>,
    /// Receiver end of the signal message channel.
    pub receiver: mpsc::Receiver<SignalMessage>,
}

/// Install the signal handler thread.
pub fn setup_signal_handler() -> Result<SignalState> {
    let running = Arc::new(AtomicBool::new(true));
    let (sender, receiver) = mpsc::channel();

    let mut signals = Signals::new([SIGTERM, SIGINT, SIGHUP, SIGUSR2])?;
    let flag = running.clone();

    thread::spawn(move || {
        for signal in signals.forever() {
            match signal {
                SIGUSR2 => {
                    Log::log_block_start("Reload signal received");
                    let _ = sender.send(SignalMessage::Reload);
                }
                _ => {
                    Log::log_pipe();
                    Log::log_info(&format!("Shutdown signal received: {}", signal));
                    flag.store(false, Ordering::SeqCst);
                    let _ = sender.send(SignalMessage::Shutdown);
                }
            }
        }
    });

    Ok(SignalState { running, receiver })
}

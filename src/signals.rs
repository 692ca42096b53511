//! Signal handling for duskr.
//!
//! A dedicated thread owns the signal iterator and forwards every delivery as
//! a [`SignalMessage`] over an mpsc channel. The scheduler blocks on that
//! channel's `recv_timeout` while waiting for the next event, so a signal
//! interrupts any wait immediately instead of after the current sleep.

use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR2},
    iterator::Signals,
};

/// Unified signal message type for all signal-based communication
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalMessage {
    /// Configuration reload signal (SIGUSR2)
    Reload,
    /// Shutdown signal (SIGTERM, SIGINT, SIGHUP)
    Shutdown,
}

/// Signal handling state shared between threads
pub struct SignalState {
    /// Atomic flag indicating if the application should keep running
    pub running: Arc<AtomicBool>,
    /// Channel receiver for unified signal messages
    pub signal_receiver: std::sync::mpsc::Receiver<SignalMessage>,
    /// Channel sender for unified signal messages (also used by tests)
    pub signal_sender: std::sync::mpsc::Sender<SignalMessage>,
}

impl SignalState {
    /// A signal state with no OS signal thread behind it.
    ///
    /// Messages only arrive through `signal_sender`. Used by tests and by any
    /// embedding that drives the scheduler itself.
    pub fn detached() -> Self {
        let (signal_sender, signal_receiver) = std::sync::mpsc::channel();
        Self {
            running: Arc::new(AtomicBool::new(true)),
            signal_receiver,
            signal_sender,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request a shutdown as if SIGTERM had arrived.
    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.signal_sender.send(SignalMessage::Shutdown);
    }
}

/// Register the signal handler thread and return the shared state.
///
/// SIGINT, SIGTERM and SIGHUP all map to [`SignalMessage::Shutdown`] and
/// clear the running flag; SIGUSR2 maps to [`SignalMessage::Reload`].
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let running = Arc::new(AtomicBool::new(true));
    let (signal_sender, signal_receiver) = std::sync::mpsc::channel::<SignalMessage>();

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR2])
        .context("failed to register signal handlers")?;

    let running_clone = running.clone();
    let signal_sender_clone = signal_sender.clone();

    thread::spawn(move || {
        for sig in signals.forever() {
            match sig {
                SIGUSR2 => {
                    if debug_enabled {
                        log_pipe!();
                        log_debug!("Received SIGUSR2, reloading configuration");
                    }
                    let _ = signal_sender_clone.send(SignalMessage::Reload);
                }
                SIGINT | SIGTERM | SIGHUP => {
                    if debug_enabled {
                        log_pipe!();
                        log_debug!("Received {}", signal_name(sig));
                    }
                    running_clone.store(false, Ordering::SeqCst);
                    let _ = signal_sender_clone.send(SignalMessage::Shutdown);
                }
                _ => {}
            }
        }
    });

    Ok(SignalState {
        running,
        signal_receiver,
        signal_sender,
    })
}

fn signal_name(sig: i32) -> &'static str {
    match sig {
        SIGINT => "SIGINT",
        SIGTERM => "SIGTERM",
        SIGHUP => "SIGHUP",
        SIGUSR2 => "SIGUSR2",
        _ => "signal",
    }
}

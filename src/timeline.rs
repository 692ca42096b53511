//! Ordered queue of timed lighting events and the blocking wait over it.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::device::{Device, DeviceAdapter};
use crate::lamp::LampState;
use crate::signals::{SignalMessage, SignalState};

/// A lamp state change scheduled for an absolute instant.
#[derive(Debug, Clone)]
pub struct TimeEvent {
    pub name: String,
    pub time: DateTime<Utc>,
    pub state: LampState,
    pub fade: Duration,
}

impl TimeEvent {
    pub fn new(
        name: impl Into<String>,
        time: DateTime<Utc>,
        state: LampState,
        fade: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            time,
            state,
            fade,
        }
    }

    /// Apply this event's lamp state to the managed group.
    pub fn trigger(
        &self,
        adapter: &mut dyn DeviceAdapter,
        group: &[Device],
        settle: Duration,
    ) -> Result<()> {
        log_block_start!(
            "{} at {}",
            self.name,
            self.time.with_timezone(&chrono::Local).format("%H:%M:%S")
        );
        self.state.apply(adapter, group, self.fade, settle)
    }
}

/// Outcome of a blocking wait on the timeline.
#[derive(Debug)]
pub enum WaitOutcome {
    /// The earliest event's time arrived; the event has been removed.
    Due(TimeEvent),
    /// The timeout elapsed before any event came due.
    TimedOut,
    /// The timeline holds no events.
    Empty,
    /// A signal interrupted the wait; the timeline is unchanged.
    Signal(SignalMessage),
}

/// Time-ordered event queue.
///
/// Events are kept sorted by their scheduled instant. Insertion order is
/// preserved among events sharing the same instant, so a same-time pair pops
/// in the order it was pushed.
#[derive(Debug, Default)]
pub struct Timeline {
    events: Vec<TimeEvent>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event at its sorted position, after any equal-time events.
    pub fn insert(&mut self, event: TimeEvent) {
        let idx = self.events.partition_point(|e| e.time <= event.time);
        self.events.insert(idx, event);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn next_time(&self) -> Option<DateTime<Utc>> {
        self.events.first().map(|e| e.time)
    }

    /// Block until the earliest event comes due, the timeout elapses, or a
    /// signal arrives.
    ///
    /// The wait sleeps on the signal channel rather than the clock, so a
    /// shutdown or reload delivered mid-wait returns immediately as
    /// [`WaitOutcome::Signal`]. With `timeout: None` the wait is unbounded.
    /// An already-due event returns without sleeping, and an empty timeline
    /// returns [`WaitOutcome::Empty`] at once regardless of the timeout.
    pub fn pop(&mut self, signals: &SignalState, timeout: Option<Duration>) -> WaitOutcome {
        if self.events.is_empty() {
            return WaitOutcome::Empty;
        }

        let deadline = timeout.map(|t| Utc::now() + chrono::Duration::from_std(t).unwrap_or(chrono::Duration::zero()));

        loop {
            let now = Utc::now();
            let due_at = self.events[0].time;

            if due_at <= now {
                return WaitOutcome::Due(self.events.remove(0));
            }

            let mut wake_at = due_at;
            if let Some(deadline) = deadline {
                if deadline <= now {
                    return WaitOutcome::TimedOut;
                }
                wake_at = wake_at.min(deadline);
            }

            let wait = (wake_at - now).to_std().unwrap_or(Duration::ZERO);
            match signals.signal_receiver.recv_timeout(wait) {
                Ok(message) => return WaitOutcome::Signal(message),
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                    // No signal thread; fall back to a plain sleep
                    std::thread::sleep(wait);
                }
            }
        }
    }

    /// Log the queued events as an indented block.
    pub fn log_queue(&self) {
        log_block_start!("Queued {} event(s)", self.events.len());
        for event in &self.events {
            log_indented!(
                "{} at {}",
                event.name,
                event.time.with_timezone(&chrono::Local).format("%H:%M:%S")
            );
        }
    }
}

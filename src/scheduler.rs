//! The main scheduling loop.
//!
//! The scheduler owns the timeline and drives one long-running loop: wait for
//! the earliest queued event, trigger it, refill the queue when it drains,
//! and react to signals delivered mid-wait. Device state captured on entry is
//! restored on the way out, whatever caused the exit.

use anyhow::Result;

use crate::config::Config;
use crate::device::{Device, DeviceAdapter};
use crate::schedule::fill_timeline;
use crate::signals::{SignalMessage, SignalState};
use crate::snapshot::StateSnapshot;
use crate::sunset::SunsetOracle;
use crate::timeline::{Timeline, WaitOutcome};

pub struct Scheduler<'a> {
    timeline: Timeline,
    oracle: SunsetOracle,
    config: Config,
    signals: &'a SignalState,
}

impl<'a> Scheduler<'a> {
    pub fn new(oracle: SunsetOracle, config: Config, signals: &'a SignalState) -> Self {
        Self {
            timeline: Timeline::new(),
            oracle,
            config,
            signals,
        }
    }

    /// Run until shutdown, then restore the group's captured state.
    ///
    /// A failing trigger is logged and skipped so one unreachable lamp does
    /// not end the evening; only snapshot capture and the final restore
    /// propagate errors.
    pub fn run(&mut self, adapter: &mut dyn DeviceAdapter, group: &[Device]) -> Result<()> {
        let snapshot = StateSnapshot::capture(adapter, group)?;

        while self.signals.is_running() {
            match self.timeline.pop(self.signals, None) {
                WaitOutcome::Due(event) => {
                    if let Err(err) = event.trigger(adapter, group, self.config.settle()) {
                        log_pipe!();
                        log_warning!("Failed to trigger '{}': {err:#}", event.name);
                    }
                }
                WaitOutcome::Empty => {
                    fill_timeline(&mut self.timeline, &self.oracle, &self.config);
                }
                WaitOutcome::TimedOut => {}
                WaitOutcome::Signal(SignalMessage::Shutdown) => break,
                WaitOutcome::Signal(SignalMessage::Reload) => self.reload(),
            }
        }

        log_block_start!("Shutting down");
        snapshot.restore(adapter, group)
    }

    /// Re-read the configuration and rebuild the queue against it.
    ///
    /// A config that fails to load or validate keeps the running one.
    fn reload(&mut self) {
        log_block_start!("Reloading configuration");
        match Config::load() {
            Ok(config) => {
                self.config = config;
                self.config.log_config();
                self.timeline.clear();
            }
            Err(err) => {
                log_pipe!();
                log_warning!("Config reload failed, keeping current settings: {err:#}");
            }
        }
    }
}

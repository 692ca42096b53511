//! End-to-end scheduler tests against the in-memory adapter.

use std::cell::RefCell;
use std::collections::VecDeque;

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use duskr::config::Config;
use duskr::device::{DeviceAdapter, assemble_group};
use duskr::lamp::Color;
use duskr::logger::Log;
use duskr::scheduler::Scheduler;
use duskr::signals::{SignalMessage, SignalState};
use duskr::sim::{SimCommand, SimulatedAdapter};
use duskr::sunset::{SunsetOracle, SunsetProvider};
use duskr::utils::utc_from_local;

const WARM: Color = (8402, 0, 65535, 3500);
const DIM: Color = (8402, 0, 49151, 2000);

/// Provider returning a fixed instant regardless of the requested date.
struct FixedSunset(DateTime<Utc>);

impl SunsetProvider for FixedSunset {
    fn sunset(&self, _latitude: f64, _longitude: f64, _date: NaiveDate) -> Result<DateTime<Utc>> {
        Ok(self.0)
    }
}

/// Provider serving a scripted sequence of sunsets, then a fallback.
///
/// Lets a test hand the scheduler one already-past evening (triggered
/// immediately) and park the next refill in the future, where the queued
/// shutdown signal ends the wait.
struct SunsetSequence {
    scripted: RefCell<VecDeque<DateTime<Utc>>>,
    fallback: DateTime<Utc>,
}

impl SunsetSequence {
    /// A sunset pinned to 19:00 local on a past date, so the derived
    /// evening (18:30), nighttime (21:00), and lights-off (midnight)
    /// events keep their schedule order no matter when the test runs.
    fn past_evening_then_future() -> Self {
        let date = chrono::Local::now().date_naive() - Duration::days(3);
        let past = utc_from_local(date, NaiveTime::from_hms_opt(19, 0, 0).unwrap());
        Self {
            // next_sunset probes today and then tomorrow when today's
            // sunset has already passed
            scripted: RefCell::new(VecDeque::from([past, past])),
            fallback: Utc::now() + Duration::hours(6),
        }
    }
}

impl SunsetProvider for SunsetSequence {
    fn sunset(&self, _latitude: f64, _longitude: f64, _date: NaiveDate) -> Result<DateTime<Utc>> {
        Ok(self
            .scripted
            .borrow_mut()
            .pop_front()
            .unwrap_or(self.fallback))
    }
}

fn quiet_config() -> Config {
    Log::set_enabled(false);
    Config {
        fade_seconds: Some(0),
        settle_ms: Some(0),
        ..Default::default()
    }
}

fn shutdown_queued() -> SignalState {
    let signals = SignalState::detached();
    signals.signal_sender.send(SignalMessage::Shutdown).unwrap();
    signals
}

/// A full run over an evening that already happened: refill, trigger all
/// three events immediately, block on the next refill, shut down on the
/// queued signal, restore the initial state.
#[test]
fn runs_a_past_evening_and_restores_state() {
    let config = quiet_config();
    let mut adapter = SimulatedAdapter::new();
    adapter.add_lamp("Desk Lamp", None, false, (0, 0, 30000, 2700));
    let group = adapter.discover_by_label("Desk Lamp").unwrap();

    let oracle = SunsetOracle::new(Box::new(SunsetSequence::past_evening_then_future()));
    let signals = shutdown_queued();

    Scheduler::new(oracle, config, &signals)
        .run(&mut adapter, &group)
        .unwrap();

    let commands = adapter.commands();
    assert!(commands.len() >= 6, "expected six trigger commands plus restore");

    // Evening: power on, then warm color
    assert!(matches!(commands[0], SimCommand::SetPower { on: true, .. }));
    assert!(matches!(commands[1], SimCommand::SetColor { color: WARM, .. }));

    // Nighttime: still on, dim color
    assert!(matches!(commands[2], SimCommand::SetPower { on: true, .. }));
    assert!(matches!(commands[3], SimCommand::SetColor { color: DIM, .. }));

    // Lights off: color first, then power off
    assert!(matches!(commands[4], SimCommand::SetColor { .. }));
    assert!(matches!(commands[5], SimCommand::SetPower { on: false, .. }));

    // Restore brings the lamp back to its pre-run state
    assert!(!adapter.power(&group[0]).unwrap());
    assert_eq!(adapter.color(&group[0]).unwrap(), (0, 0, 30000, 2700));
}

/// With the next sunset hours away, nothing is due; the queued shutdown
/// interrupts the wait and no lamp commands go out at all.
#[test]
fn shutdown_during_wait_leaves_lamps_untouched() {
    let config = quiet_config();
    let mut adapter = SimulatedAdapter::new();
    adapter.add_lamp("Desk Lamp", None, true, WARM);
    let group = adapter.discover_by_label("Desk Lamp").unwrap();

    let oracle = SunsetOracle::new(Box::new(FixedSunset(Utc::now() + Duration::hours(6))));
    let signals = shutdown_queued();

    Scheduler::new(oracle, config, &signals)
        .run(&mut adapter, &group)
        .unwrap();

    // No triggers fired and the state already matched the snapshot
    assert!(adapter.commands().is_empty());
}

/// The scheduler runs against the whole assembled group, so one trigger
/// commands every lamp that matched the labels.
#[test]
fn triggers_address_the_full_group() {
    let config = quiet_config();
    let mut adapter = SimulatedAdapter::new();
    adapter.add_lamp("Desk Lamp", Some("Living Room"), false, WARM);
    adapter.add_lamp("Floor Lamp", Some("Living Room"), false, WARM);
    let group = assemble_group(&mut adapter, &["Living Room".to_string()]).unwrap();

    let oracle = SunsetOracle::new(Box::new(SunsetSequence::past_evening_then_future()));
    let signals = shutdown_queued();

    Scheduler::new(oracle, config, &signals)
        .run(&mut adapter, &group)
        .unwrap();

    match &adapter.commands()[0] {
        SimCommand::SetPower { targets, on: true, .. } => assert_eq!(targets.len(), 2),
        other => panic!("expected a power command, got {other:?}"),
    }
}

/// Cleared running flag ends the loop even with no signal message queued.
#[test]
fn cleared_running_flag_stops_the_loop() {
    let config = quiet_config();
    let mut adapter = SimulatedAdapter::new();
    adapter.add_lamp("Desk Lamp", None, false, WARM);
    let group = adapter.discover_by_label("Desk Lamp").unwrap();

    let oracle = SunsetOracle::new(Box::new(FixedSunset(Utc::now() + Duration::hours(6))));
    let signals = SignalState::detached();
    signals.request_shutdown();

    Scheduler::new(oracle, config, &signals)
        .run(&mut adapter, &group)
        .unwrap();

    assert!(adapter.commands().is_empty());
}

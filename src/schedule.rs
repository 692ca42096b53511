//! Daily event schedule construction.
//!
//! One refill produces exactly three events for the upcoming evening:
//!
//! - **Evening**: warm lights on, offset from civil sunset
//! - **Nighttime**: dim night color, at a fixed local wall-clock time
//! - **Lights Off**: power off, a fixed delay after nighttime

use chrono::{DateTime, Local, Utc};

use crate::config::Config;
use crate::lamp::LampState;
use crate::sunset::SunsetOracle;
use crate::timeline::{TimeEvent, Timeline};
use crate::utils::utc_from_local;

/// Build the three events for the evening anchored at `sunset`.
///
/// Nighttime and lights-off are derived from the sunset's local calendar
/// date, so the set always describes one coherent evening even when sunset
/// lands near local midnight in UTC terms.
pub fn build_day_events(sunset: DateTime<Utc>, config: &Config) -> Vec<TimeEvent> {
    let evening_at = sunset + config.sunset_offset();
    let local_date = sunset.with_timezone(&Local).date_naive();
    let nighttime_at = utc_from_local(local_date, config.nighttime());
    let lights_off_at = nighttime_at + config.lights_off_delay();

    vec![
        TimeEvent::new(
            "Evening Lights",
            evening_at,
            LampState::new("Evening Lights", true, config.evening_color()),
            config.fade(),
        ),
        TimeEvent::new(
            "Nighttime Lights",
            nighttime_at,
            LampState::new("Nighttime Lights", true, config.night_color()),
            config.fade(),
        ),
        TimeEvent::new(
            "Lights Off",
            lights_off_at,
            LampState::new("Lights Off", false, config.night_color()),
            config.fade(),
        ),
    ]
}

/// Refill the timeline with the events for the next evening.
pub fn fill_timeline(timeline: &mut Timeline, oracle: &SunsetOracle, config: &Config) {
    let sunset = oracle.next_sunset(config.latitude(), config.longitude());
    log_block_start!(
        "Next sunset at {}",
        sunset.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
    );

    for event in build_day_events(sunset, config) {
        timeline.insert(event);
    }
    timeline.log_queue();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::Log;
    use crate::signals::SignalState;
    use crate::sunset::MockSunsetProvider;
    use crate::timeline::WaitOutcome;
    use chrono::{Duration, TimeZone};

    #[test]
    fn events_anchor_to_sunset_and_nighttime() {
        let config = Config::default();
        let sunset = Utc.with_ymd_and_hms(2025, 6, 15, 19, 0, 0).unwrap();

        let events = build_day_events(sunset, &config);
        assert_eq!(events.len(), 3);

        let evening = &events[0];
        assert_eq!(evening.name, "Evening Lights");
        assert_eq!(
            evening.time,
            Utc.with_ymd_and_hms(2025, 6, 15, 18, 30, 0).unwrap()
        );
        assert!(evening.state.power);
        assert_eq!(evening.state.color, (8402, 0, 65535, 3500));

        let nighttime = &events[1];
        assert_eq!(nighttime.name, "Nighttime Lights");
        let local = nighttime.time.with_timezone(&Local);
        assert_eq!(local.format("%H:%M:%S").to_string(), "21:00:00");
        assert_eq!(nighttime.state.color, (8402, 0, 49151, 2000));

        let lights_off = &events[2];
        assert_eq!(lights_off.name, "Lights Off");
        assert_eq!(lights_off.time, nighttime.time + Duration::minutes(180));
        assert!(!lights_off.state.power);
    }

    #[test]
    fn offset_and_delay_come_from_config() {
        let config = Config {
            sunset_offset_minutes: Some(45),
            lights_off_delay_minutes: Some(60),
            ..Default::default()
        };
        let sunset = Utc.with_ymd_and_hms(2025, 6, 15, 19, 0, 0).unwrap();

        let events = build_day_events(sunset, &config);
        assert_eq!(events[0].time, sunset + Duration::minutes(45));
        assert_eq!(events[2].time, events[1].time + Duration::minutes(60));
    }

    #[test]
    fn refill_queues_three_ordered_events() {
        Log::set_enabled(false);
        let config = Config::default();

        // Keep the sunset in the future so the queue stays put
        let sunset = Utc::now() + Duration::hours(6);
        let mut mock = MockSunsetProvider::new();
        mock.expect_sunset().returning(move |_, _, _| Ok(sunset));
        let oracle = SunsetOracle::new(Box::new(mock));

        let mut timeline = Timeline::new();
        fill_timeline(&mut timeline, &oracle, &config);

        assert_eq!(timeline.len(), 3);
        let earliest = build_day_events(sunset, &config)
            .iter()
            .map(|e| e.time)
            .min();
        assert_eq!(timeline.next_time(), earliest);
    }

    #[test]
    fn refilled_events_pop_in_schedule_order() {
        Log::set_enabled(false);
        let signals = SignalState::detached();
        let config = Config::default();

        // An evening fully in the past pops immediately, in order. Pinning
        // the sunset to 19:00 local keeps evening (18:30) ahead of
        // nighttime (21:00) regardless of when the test runs.
        let date = Local::now().date_naive() - Duration::days(3);
        let sunset = utc_from_local(date, chrono::NaiveTime::from_hms_opt(19, 0, 0).unwrap());
        let mut timeline = Timeline::new();
        for event in build_day_events(sunset, &config) {
            timeline.insert(event);
        }

        let mut names = Vec::new();
        while let WaitOutcome::Due(event) = timeline.pop(&signals, None) {
            names.push(event.name);
        }
        assert_eq!(names, ["Evening Lights", "Nighttime Lights", "Lights Off"]);
    }
}

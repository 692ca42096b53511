//! Sunset time lookup with a deterministic fallback.
//!
//! Civil sunset comes from the free sunrise-sunset.org JSON API. The oracle
//! never lets a lookup failure stop the scheduler: any error, including an
//! unreachable network, falls back to 18:00 local time for the requested
//! date, and the failure is logged as a warning.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::constants::{FALLBACK_SUNSET_HOUR, HTTP_TIMEOUT_SECS, SUNRISE_SUNSET_BASE_URL};
use crate::utils::utc_from_local;

/// Source of civil sunset times.
#[cfg_attr(test, mockall::automock)]
pub trait SunsetProvider {
    /// Sunset on `date` at the given coordinates, as a UTC instant.
    fn sunset(&self, latitude: f64, longitude: f64, date: NaiveDate) -> Result<DateTime<Utc>>;
}

#[derive(Debug, Deserialize)]
struct ApiResults {
    #[allow(dead_code)]
    sunrise: DateTime<FixedOffset>,
    sunset: DateTime<FixedOffset>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    results: ApiResults,
    status: String,
}

/// [`SunsetProvider`] backed by the sunrise-sunset.org service.
pub struct SunriseSunsetApi {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl SunriseSunsetApi {
    pub fn new() -> Result<Self> {
        Self::with_base_url(SUNRISE_SUNSET_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl SunsetProvider for SunriseSunsetApi {
    fn sunset(&self, latitude: f64, longitude: f64, date: NaiveDate) -> Result<DateTime<Utc>> {
        // formatted=0 requests ISO 8601 timestamps instead of 12-hour strings
        let url = format!(
            "{}/json?lat={latitude}&lng={longitude}&date={date}&formatted=0",
            self.base_url
        );

        let body = self
            .client
            .get(&url)
            .send()
            .context("sunset request failed")?
            .error_for_status()
            .context("sunset request rejected")?
            .text()
            .context("failed to read sunset response")?;

        let response: ApiResponse =
            serde_json::from_str(&body).context("failed to parse sunset response")?;
        if response.status != "OK" {
            return Err(anyhow!("sunset service returned status {}", response.status));
        }

        Ok(response.results.sunset.with_timezone(&Utc))
    }
}

/// Sunset lookups with caching-free, infallible semantics.
pub struct SunsetOracle {
    provider: Box<dyn SunsetProvider>,
}

impl SunsetOracle {
    pub fn new(provider: Box<dyn SunsetProvider>) -> Self {
        Self { provider }
    }

    /// Sunset on `date`, or 18:00 local time on `date` when the provider
    /// fails. Never errors.
    pub fn get_sunset(&self, latitude: f64, longitude: f64, date: NaiveDate) -> DateTime<Utc> {
        match self.provider.sunset(latitude, longitude, date) {
            Ok(sunset) => sunset,
            Err(err) => {
                let fallback = utc_from_local(
                    date,
                    NaiveTime::from_hms_opt(FALLBACK_SUNSET_HOUR, 0, 0)
                        .unwrap_or(NaiveTime::MIN),
                );
                log_pipe!();
                log_warning!("Sunset lookup failed: {err:#}");
                log_indented!(
                    "Falling back to {}:00 local time",
                    FALLBACK_SUNSET_HOUR
                );
                fallback
            }
        }
    }

    /// The next sunset at or after now: today's if it has not passed yet,
    /// otherwise tomorrow's.
    ///
    /// "Today" is the local calendar date, not the UTC one. In western time
    /// zones the two diverge during the evening, and the local date is the
    /// one whose sunset the user means.
    pub fn next_sunset(&self, latitude: f64, longitude: f64) -> DateTime<Utc> {
        self.next_sunset_from(latitude, longitude, Utc::now())
    }

    pub fn next_sunset_from(
        &self,
        latitude: f64,
        longitude: f64,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        let today = now.with_timezone(&chrono::Local).date_naive();
        let sunset = self.get_sunset(latitude, longitude, today);
        if sunset >= now {
            sunset
        } else {
            self.get_sunset(latitude, longitude, today + Duration::days(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::Log;
    use chrono::TimeZone;

    fn oracle_with(mock: MockSunsetProvider) -> SunsetOracle {
        SunsetOracle::new(Box::new(mock))
    }

    #[test]
    fn returns_provider_sunset_when_available() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 6, 16, 0, 52, 0).unwrap();

        let mut mock = MockSunsetProvider::new();
        mock.expect_sunset().return_once(move |_, _, _| Ok(expected));

        let sunset = oracle_with(mock).get_sunset(45.42178, -75.69119, date);
        assert_eq!(sunset, expected);
    }

    #[test]
    fn falls_back_to_six_pm_local_on_error() {
        Log::set_enabled(false);
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

        let mut mock = MockSunsetProvider::new();
        mock.expect_sunset()
            .returning(|_, _, _| Err(anyhow!("network down")));

        let sunset = oracle_with(mock).get_sunset(45.42178, -75.69119, date);
        let local = sunset.with_timezone(&chrono::Local);
        assert_eq!(local.date_naive(), date);
        assert_eq!(local.time(), NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    }

    #[test]
    fn fallback_is_idempotent_for_a_date() {
        Log::set_enabled(false);
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

        let mut mock = MockSunsetProvider::new();
        mock.expect_sunset()
            .returning(|_, _, _| Err(anyhow!("network down")));
        let oracle = oracle_with(mock);

        let first = oracle.get_sunset(45.0, -75.0, date);
        let second = oracle.get_sunset(45.0, -75.0, date);
        assert_eq!(first, second);
    }

    #[test]
    fn next_sunset_prefers_today_until_it_passes() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let today = now.with_timezone(&chrono::Local).date_naive();
        let todays_sunset = now + Duration::hours(8);

        let mut mock = MockSunsetProvider::new();
        mock.expect_sunset()
            .withf(move |_, _, date| *date == today)
            .returning(move |_, _, _| Ok(todays_sunset));

        let sunset = oracle_with(mock).next_sunset_from(45.0, -75.0, now);
        assert_eq!(sunset, todays_sunset);
    }

    #[test]
    fn next_sunset_rolls_to_tomorrow_after_todays() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let today = now.with_timezone(&chrono::Local).date_naive();
        let todays_sunset = now - Duration::hours(2);
        let tomorrows_sunset = now + Duration::hours(22);

        let mut mock = MockSunsetProvider::new();
        mock.expect_sunset().returning(move |_, _, date| {
            if date == today {
                Ok(todays_sunset)
            } else {
                Ok(tomorrows_sunset)
            }
        });

        let sunset = oracle_with(mock).next_sunset_from(45.0, -75.0, now);
        assert_eq!(sunset, tomorrows_sunset);
    }
}

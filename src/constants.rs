//! Application constants and default values for duskr.
//!
//! This module contains the configuration defaults, validation limits, and
//! operational constants used throughout the application.

// ═══ Application Configuration Defaults ═══
// These values are used when config options are not specified by the user

pub const DEFAULT_LATITUDE: f64 = 45.42178; // Ottawa
pub const DEFAULT_LONGITUDE: f64 = -75.69119;
pub const DEFAULT_SUNSET_OFFSET_MINUTES: i64 = -30; // start evening lights a bit before sunset
pub const DEFAULT_NIGHTTIME: &str = "21:00:00"; // local wall-clock time for night lights
pub const DEFAULT_LIGHTS_OFF_DELAY_MINUTES: i64 = 180; // nighttime + 3h = midnight
pub const DEFAULT_FADE_SECONDS: u64 = 300; // device-side transition length
pub const DEFAULT_SETTLE_MS: u64 = 250; // pause between dependent power/color commands

// Colors are opaque HSBK tuples (hue, saturation, brightness, kelvin)
pub const DEFAULT_EVENING_COLOR: [u16; 4] = [8402, 0, 65535, 3500]; // neutral warm
pub const DEFAULT_NIGHT_COLOR: [u16; 4] = [8402, 0, 49151, 2000]; // dim warm 2000K

// ═══ Sunset Data Source ═══
// Free service, documented at https://sunrise-sunset.org/api.
// Be nice and only call it once per day.

pub const SUNRISE_SUNSET_BASE_URL: &str = "https://api.sunrise-sunset.org";
pub const HTTP_TIMEOUT_SECS: u64 = 10;
pub const FALLBACK_SUNSET_HOUR: u32 = 18; // 18:00 local when the service is unreachable

// ═══ Validation Limits ═══
// These limits ensure user inputs are within reasonable and safe ranges

pub const MINIMUM_LATITUDE: f64 = -90.0;
pub const MAXIMUM_LATITUDE: f64 = 90.0;
pub const MINIMUM_LONGITUDE: f64 = -180.0;
pub const MAXIMUM_LONGITUDE: f64 = 180.0;

// Sunset offset limits (minutes relative to sunset; negative = before)
pub const MINIMUM_SUNSET_OFFSET_MINUTES: i64 = -240;
pub const MAXIMUM_SUNSET_OFFSET_MINUTES: i64 = 240;

// Fade duration limits
pub const MAXIMUM_FADE_SECONDS: u64 = 3600; // 1 hour max

// Settle delay limits
pub const MAXIMUM_SETTLE_MS: u64 = 5000;

// Lights-off delay limits (minutes after nighttime)
pub const MINIMUM_LIGHTS_OFF_DELAY_MINUTES: i64 = 0;
pub const MAXIMUM_LIGHTS_OFF_DELAY_MINUTES: i64 = 720; // 12 hours max

// ═══ Process Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1;

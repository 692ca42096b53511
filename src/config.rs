//! Configuration loading, validation, and defaults.
//!
//! Configuration lives at `~/.config/duskr/duskr.toml`. Every field is
//! optional; a missing field falls back to the compiled-in default, and a
//! missing file is written out as a commented template on first run so users
//! have something to edit.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::NaiveTime;
use serde::Deserialize;

use crate::constants::*;
use crate::lamp::Color;

/// Default configuration template written on first run.
const DEFAULT_CONFIG: &str = r#"#[duskr config]
# All fields are optional; the commented values are the defaults.

# Coordinates used for the sunset lookup
#latitude = 45.42178
#longitude = -75.69119

# Minutes relative to sunset for the evening event (negative = before sunset)
#sunset_offset_minutes = -30

# Local wall-clock time for the nighttime event
#nighttime = "21:00:00"

# Minutes after nighttime for the lights-off event
#lights_off_delay_minutes = 180

# Device-side fade length for scheduled transitions, in seconds
#fade_seconds = 300

# Pause between dependent power/color commands, in milliseconds
#settle_ms = 250

# Colors as [hue, saturation, brightness, kelvin]
#evening_color = [8402, 0, 65535, 3500]
#night_color = [8402, 0, 49151, 2000]
"#;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sunset_offset_minutes: Option<i64>,
    pub nighttime: Option<String>,
    pub lights_off_delay_minutes: Option<i64>,
    pub fade_seconds: Option<u64>,
    pub settle_ms: Option<u64>,
    pub evening_color: Option<[u16; 4]>,
    pub night_color: Option<[u16; 4]>,
}

impl Config {
    /// Load the configuration, creating a default file on first run.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).context("failed to create config directory")?;
            }
            fs::write(&path, DEFAULT_CONFIG).context("failed to write default config")?;
            log_block_start!("Created default config at {}", path.display());
        }
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(config_dir.join("duskr").join("duskr.toml"))
    }

    /// Validate all present fields against the compiled-in limits.
    pub fn validate(&self) -> Result<()> {
        if let Some(lat) = self.latitude {
            if !(MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&lat) {
                return Err(anyhow!(
                    "latitude must be between {MINIMUM_LATITUDE} and {MAXIMUM_LATITUDE}, got {lat}"
                ));
            }
        }
        if let Some(lon) = self.longitude {
            if !(MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&lon) {
                return Err(anyhow!(
                    "longitude must be between {MINIMUM_LONGITUDE} and {MAXIMUM_LONGITUDE}, got {lon}"
                ));
            }
        }
        if let Some(offset) = self.sunset_offset_minutes {
            if !(MINIMUM_SUNSET_OFFSET_MINUTES..=MAXIMUM_SUNSET_OFFSET_MINUTES).contains(&offset) {
                return Err(anyhow!(
                    "sunset_offset_minutes must be between {MINIMUM_SUNSET_OFFSET_MINUTES} and {MAXIMUM_SUNSET_OFFSET_MINUTES}, got {offset}"
                ));
            }
        }
        if let Some(nighttime) = &self.nighttime {
            NaiveTime::parse_from_str(nighttime, "%H:%M:%S")
                .map_err(|e| anyhow!("nighttime must be HH:MM:SS, got '{nighttime}': {e}"))?;
        }
        if let Some(delay) = self.lights_off_delay_minutes {
            if !(MINIMUM_LIGHTS_OFF_DELAY_MINUTES..=MAXIMUM_LIGHTS_OFF_DELAY_MINUTES)
                .contains(&delay)
            {
                return Err(anyhow!(
                    "lights_off_delay_minutes must be between {MINIMUM_LIGHTS_OFF_DELAY_MINUTES} and {MAXIMUM_LIGHTS_OFF_DELAY_MINUTES}, got {delay}"
                ));
            }
        }
        if let Some(fade) = self.fade_seconds {
            if fade > MAXIMUM_FADE_SECONDS {
                return Err(anyhow!(
                    "fade_seconds must be at most {MAXIMUM_FADE_SECONDS}, got {fade}"
                ));
            }
        }
        if let Some(settle) = self.settle_ms {
            if settle > MAXIMUM_SETTLE_MS {
                return Err(anyhow!(
                    "settle_ms must be at most {MAXIMUM_SETTLE_MS}, got {settle}"
                ));
            }
        }
        Ok(())
    }

    // ═══ Accessors with defaults ═══

    pub fn latitude(&self) -> f64 {
        self.latitude.unwrap_or(DEFAULT_LATITUDE)
    }

    pub fn longitude(&self) -> f64 {
        self.longitude.unwrap_or(DEFAULT_LONGITUDE)
    }

    pub fn sunset_offset(&self) -> chrono::Duration {
        chrono::Duration::minutes(
            self.sunset_offset_minutes
                .unwrap_or(DEFAULT_SUNSET_OFFSET_MINUTES),
        )
    }

    /// Local wall-clock time of the nighttime event. Validation guarantees
    /// the stored string parses, so this never fails after `load`.
    pub fn nighttime(&self) -> NaiveTime {
        self.nighttime
            .as_deref()
            .and_then(|s| NaiveTime::parse_from_str(s, "%H:%M:%S").ok())
            .unwrap_or_else(|| {
                NaiveTime::parse_from_str(DEFAULT_NIGHTTIME, "%H:%M:%S")
                    .unwrap_or(NaiveTime::MIN)
            })
    }

    pub fn lights_off_delay(&self) -> chrono::Duration {
        chrono::Duration::minutes(
            self.lights_off_delay_minutes
                .unwrap_or(DEFAULT_LIGHTS_OFF_DELAY_MINUTES),
        )
    }

    pub fn fade(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fade_seconds.unwrap_or(DEFAULT_FADE_SECONDS))
    }

    pub fn settle(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.settle_ms.unwrap_or(DEFAULT_SETTLE_MS))
    }

    pub fn evening_color(&self) -> Color {
        let [h, s, b, k] = self.evening_color.unwrap_or(DEFAULT_EVENING_COLOR);
        (h, s, b, k)
    }

    pub fn night_color(&self) -> Color {
        let [h, s, b, k] = self.night_color.unwrap_or(DEFAULT_NIGHT_COLOR);
        (h, s, b, k)
    }

    /// Log the effective configuration as an indented block.
    pub fn log_config(&self) {
        log_block_start!("Configuration");
        log_indented!("Location: {:.5}, {:.5}", self.latitude(), self.longitude());
        log_indented!(
            "Evening: sunset {:+} min",
            self.sunset_offset().num_minutes()
        );
        log_indented!("Nighttime: {}", self.nighttime().format("%H:%M:%S"));
        log_indented!(
            "Lights off: nighttime + {} min",
            self.lights_off_delay().num_minutes()
        );
        log_indented!(
            "Fade: {}s, settle: {}ms",
            self.fade().as_secs(),
            self.settle().as_millis()
        );
    }
}

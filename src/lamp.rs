//! Lamp target states and the transition that applies them.

use std::time::Duration;

use anyhow::Result;

use crate::device::{Device, DeviceAdapter};

/// Opaque device color as an HSBK tuple (hue, saturation, brightness, kelvin).
///
/// duskr passes colors through unmodified; their interpretation belongs to the
/// device adapter.
pub type Color = (u16, u16, u16, u16);

/// A named (power, color) target for a lamp or lamp group.
///
/// Immutable after construction. Equality is defined by (power, color) only;
/// the name is a display label and two differently-named states that command
/// the same settings compare equal.
#[derive(Debug, Clone)]
pub struct LampState {
    pub name: String,
    pub power: bool,
    pub color: Color,
}

impl LampState {
    pub fn new(name: impl Into<String>, power: bool, color: Color) -> Self {
        Self {
            name: name.into(),
            power,
            color,
        }
    }

    /// Send the power and color commands that move `group` into this state.
    ///
    /// `fade` is the device-side transition length for both commands. The
    /// command order avoids a visible flash: when powering on, power goes out
    /// first so the color command lands on a lit lamp instead of letting it
    /// flash its last remembered color; when powering off, color goes out
    /// first so the lamp never snaps colors mid power-down. `settle` is the
    /// short pause between the two dependent commands.
    pub fn apply(
        &self,
        adapter: &mut dyn DeviceAdapter,
        group: &[Device],
        fade: Duration,
        settle: Duration,
    ) -> Result<()> {
        let duration_ms = fade.as_millis() as u64;
        if self.power {
            adapter.set_power(group, true, duration_ms)?;
            std::thread::sleep(settle);
            adapter.set_color(group, self.color, duration_ms)?;
        } else {
            adapter.set_color(group, self.color, duration_ms)?;
            std::thread::sleep(settle);
            adapter.set_power(group, false, duration_ms)?;
        }
        Ok(())
    }
}

impl PartialEq for LampState {
    fn eq(&self, other: &Self) -> bool {
        self.power == other.power && self.color == other.color
    }
}

impl Eq for LampState {}

//! Capture and restore of per-device lamp state around a scheduler run.

use std::collections::HashMap;

use anyhow::{Result, anyhow};

use crate::device::{Device, DeviceAdapter, DeviceId};
use crate::lamp::Color;

/// Per-device (power, color) readings taken before the scheduler starts
/// commanding the group.
#[derive(Debug, Clone, Default)]
pub struct StateSnapshot {
    states: HashMap<DeviceId, (bool, Color)>,
}

impl StateSnapshot {
    /// Read and record the current state of every device in the group.
    pub fn capture(adapter: &mut dyn DeviceAdapter, group: &[Device]) -> Result<Self> {
        let mut states = HashMap::new();
        for device in group {
            let power = adapter.power(device)?;
            let color = adapter.color(device)?;
            states.insert(device.id.clone(), (power, color));
        }
        log_block_start!("Captured state of {} device(s)", states.len());
        Ok(Self { states })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Put every captured device back the way it was found.
    ///
    /// Current state is re-read per device and commands go out only for what
    /// actually differs, with no fade, so an untouched lamp sees no traffic.
    /// A failing device is logged and skipped; the remaining devices are
    /// still restored, and the first failure count surfaces as an error once
    /// the pass completes.
    pub fn restore(&self, adapter: &mut dyn DeviceAdapter, group: &[Device]) -> Result<()> {
        log_block_start!("Restoring previous lamp state");

        let mut failures = 0usize;
        for device in group {
            let Some(&(power, color)) = self.states.get(&device.id) else {
                continue;
            };
            if let Err(err) = Self::restore_device(adapter, device, power, color) {
                failures += 1;
                log_pipe!();
                log_warning!("Failed to restore '{}': {err:#}", device.label);
            }
        }

        if failures > 0 {
            return Err(anyhow!("failed to restore {failures} device(s)"));
        }
        Ok(())
    }

    // Same command ordering rule as LampState::apply: power before color
    // when powering back on, color before power when powering off.
    fn restore_device(
        adapter: &mut dyn DeviceAdapter,
        device: &Device,
        power: bool,
        color: Color,
    ) -> Result<()> {
        let target = std::slice::from_ref(device);
        let power_differs = adapter.power(device)? != power;
        let color_differs = adapter.color(device)? != color;

        if power_differs && power {
            adapter.set_power(target, true, 0)?;
        }
        if color_differs {
            adapter.set_color(target, color, 0)?;
        }
        if power_differs && !power {
            adapter.set_power(target, false, 0)?;
        }
        Ok(())
    }
}

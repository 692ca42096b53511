//! In-memory device adapter for development and tests.
//!
//! [`SimulatedAdapter`] models a small household of lamps without any network
//! traffic. Every mutating call is recorded as a [`SimCommand`], so tests can
//! assert on the exact command sequence a scheduler run produced.

use anyhow::{Result, anyhow};

use crate::device::{Device, DeviceAdapter, DeviceId};
use crate::lamp::Color;

/// A recorded adapter command, in the order it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimCommand {
    SetPower {
        targets: Vec<DeviceId>,
        on: bool,
        duration_ms: u64,
    },
    SetColor {
        targets: Vec<DeviceId>,
        color: Color,
        duration_ms: u64,
    },
}

#[derive(Debug, Clone)]
struct SimLamp {
    id: DeviceId,
    label: String,
    group: Option<String>,
    power: bool,
    color: Color,
    is_light: bool,
}

/// An in-memory lighting backend with a recorded command log.
#[derive(Debug, Default)]
pub struct SimulatedAdapter {
    lamps: Vec<SimLamp>,
    commands: Vec<SimCommand>,
}

impl SimulatedAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A preset household: three lamps across two groups plus a smart plug
    /// that is not a light. Matches what the binary runs against by default.
    pub fn household() -> Self {
        let mut adapter = Self::new();
        adapter.add_lamp("Desk Lamp", Some("Living Room"), false, (8402, 0, 65535, 3500));
        adapter.add_lamp("Floor Lamp", Some("Living Room"), false, (8402, 0, 65535, 3500));
        adapter.add_lamp("Bedside Lamp", Some("Bedroom"), false, (0, 0, 32767, 2700));
        adapter.add_device("Smart Plug", Some("Living Room"), false, (0, 0, 0, 0), false);
        adapter
    }

    /// Register a lamp. The identity is derived from the label, which the
    /// simulation therefore requires to be unique.
    pub fn add_lamp(&mut self, label: &str, group: Option<&str>, power: bool, color: Color) {
        self.add_device(label, group, power, color, true);
    }

    /// Register an arbitrary device; `is_light` distinguishes lamps from
    /// other discoverable hardware such as smart plugs.
    pub fn add_device(
        &mut self,
        label: &str,
        group: Option<&str>,
        power: bool,
        color: Color,
        is_light: bool,
    ) {
        let id = DeviceId::new(format!("sim:{:02}", self.lamps.len()));
        self.lamps.push(SimLamp {
            id,
            label: label.to_string(),
            group: group.map(str::to_string),
            power,
            color,
            is_light,
        });
    }

    /// The commands issued so far, oldest first.
    pub fn commands(&self) -> &[SimCommand] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    fn lamp(&self, id: &DeviceId) -> Result<&SimLamp> {
        self.lamps
            .iter()
            .find(|l| &l.id == id)
            .ok_or_else(|| anyhow!("unknown device {id}"))
    }
}

impl DeviceAdapter for SimulatedAdapter {
    fn discover_by_label(&mut self, label: &str) -> Result<Vec<Device>> {
        Ok(self
            .lamps
            .iter()
            .filter(|l| l.label == label || l.group.as_deref() == Some(label))
            .map(|l| Device {
                id: l.id.clone(),
                label: l.label.clone(),
            })
            .collect())
    }

    fn is_light(&self, device: &Device) -> bool {
        self.lamps
            .iter()
            .any(|l| l.id == device.id && l.is_light)
    }

    fn power(&mut self, device: &Device) -> Result<bool> {
        Ok(self.lamp(&device.id)?.power)
    }

    fn color(&mut self, device: &Device) -> Result<Color> {
        Ok(self.lamp(&device.id)?.color)
    }

    fn set_power(&mut self, devices: &[Device], on: bool, duration_ms: u64) -> Result<()> {
        let targets: Vec<DeviceId> = devices.iter().map(|d| d.id.clone()).collect();
        for lamp in &mut self.lamps {
            if targets.contains(&lamp.id) {
                lamp.power = on;
            }
        }
        self.commands.push(SimCommand::SetPower {
            targets,
            on,
            duration_ms,
        });
        Ok(())
    }

    fn set_color(&mut self, devices: &[Device], color: Color, duration_ms: u64) -> Result<()> {
        let targets: Vec<DeviceId> = devices.iter().map(|d| d.id.clone()).collect();
        for lamp in &mut self.lamps {
            if targets.contains(&lamp.id) {
                lamp.color = color;
            }
        }
        self.commands.push(SimCommand::SetColor {
            targets,
            color,
            duration_ms,
        });
        Ok(())
    }
}

//! Device adapter seam and managed-group assembly.
//!
//! Device discovery and the wire protocol are external collaborators: duskr
//! only depends on the capability set expressed by [`DeviceAdapter`]. The
//! shipped binary wires in the in-memory adapter from [`crate::sim`]; real
//! hardware integrations implement the same trait.

use std::collections::HashSet;

use anyhow::Result;

use crate::lamp::Color;

/// Stable device identity (hardware address or equivalent).
///
/// Identities key the managed group and the state snapshot, so an adapter must
/// return the same value for the same physical device across calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A discovered device handle.
#[derive(Debug, Clone)]
pub struct Device {
    pub id: DeviceId,
    pub label: String,
}

/// Capability set duskr needs from a lighting backend.
///
/// Commands are fire-and-forget: `duration_ms` is the device-side fade and no
/// acknowledgment is awaited. Retry and backoff, where wanted, belong to the
/// implementing adapter, not to the scheduler core.
pub trait DeviceAdapter {
    /// All devices matching a label, which may name a single device or a group.
    fn discover_by_label(&mut self, label: &str) -> Result<Vec<Device>>;

    fn is_light(&self, device: &Device) -> bool;

    fn power(&mut self, device: &Device) -> Result<bool>;

    fn color(&mut self, device: &Device) -> Result<Color>;

    fn set_power(&mut self, devices: &[Device], on: bool, duration_ms: u64) -> Result<()>;

    fn set_color(&mut self, devices: &[Device], color: Color, duration_ms: u64) -> Result<()>;
}

/// Assemble the managed device group from operator-supplied labels.
///
/// Each label may match a single device or a whole group; matches are merged
/// and deduplicated by [`DeviceId`] so no handle appears twice. A label with
/// no matches is a warning, not an error, as long as some other label
/// matches. An empty result, or a result with no lights in it, is fatal.
pub fn assemble_group(adapter: &mut dyn DeviceAdapter, labels: &[String]) -> Result<Vec<Device>> {
    let mut seen: HashSet<DeviceId> = HashSet::new();
    let mut group: Vec<Device> = Vec::new();

    for label in labels {
        let matches = adapter.discover_by_label(label)?;
        if matches.is_empty() {
            log_warning!("No devices found matching label '{label}'");
            continue;
        }
        for device in matches {
            if seen.insert(device.id.clone()) {
                group.push(device);
            }
        }
    }

    log_decorated!("Found {} device(s)", group.len());

    if group.is_empty() {
        anyhow::bail!("no devices matched the given labels");
    }
    if !group.iter().any(|d| adapter.is_light(d)) {
        anyhow::bail!("none of the matched devices are lights");
    }

    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::Log;
    use crate::sim::SimulatedAdapter;

    const WARM: Color = (8402, 0, 65535, 3500);

    #[test]
    fn group_and_device_labels_dedupe_by_identity() {
        Log::set_enabled(false);
        let mut adapter = SimulatedAdapter::new();
        adapter.add_lamp("Desk Lamp", Some("Living Room"), true, WARM);
        adapter.add_lamp("Floor Lamp", Some("Living Room"), true, WARM);

        // "Desk Lamp" is already covered by the group label
        let labels = vec!["Living Room".to_string(), "Desk Lamp".to_string()];
        let group = assemble_group(&mut adapter, &labels).unwrap();
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn unmatched_label_is_not_fatal_when_others_match() {
        Log::set_enabled(false);
        let mut adapter = SimulatedAdapter::new();
        adapter.add_lamp("Desk Lamp", None, true, WARM);

        let labels = vec!["Attic".to_string(), "Desk Lamp".to_string()];
        let group = assemble_group(&mut adapter, &labels).unwrap();
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn no_matches_is_fatal() {
        Log::set_enabled(false);
        let mut adapter = SimulatedAdapter::new();
        adapter.add_lamp("Desk Lamp", None, true, WARM);

        let labels = vec!["Attic".to_string()];
        assert!(assemble_group(&mut adapter, &labels).is_err());
    }

    #[test]
    fn matches_without_lights_are_fatal() {
        Log::set_enabled(false);
        let mut adapter = SimulatedAdapter::new();
        adapter.add_device("Smart Plug", None, false, WARM, false);

        let labels = vec!["Smart Plug".to_string()];
        assert!(assemble_group(&mut adapter, &labels).is_err());
    }
}

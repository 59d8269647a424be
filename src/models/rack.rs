//! Racks and rack groups.

use crate::models::PlacedDevice;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum rack height in U.
pub const MAX_RACK_HEIGHT: u32 = 100;

/// Supported rack widths in inches.
pub const RACK_WIDTHS: [u32; 2] = [10, 19];

/// Minimum number of racks in a group.
pub const MIN_GROUP_SIZE: usize = 2;

/// A single rack holding an ordered list of devices.
///
/// # Validation
///
/// - name must be non-empty, max 100 characters
/// - height must be 1..=100 U
/// - width must be 10 or 19 inches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rack {
    /// Unique identifier (uuid v4)
    pub id: String,
    /// Display name
    pub name: String,
    /// Height in U
    pub height: u32,
    /// Width in inches
    #[serde(default = "default_rack_width")]
    pub width: u32,
    /// Devices in insertion order (rack-level and container children)
    #[serde(default)]
    pub devices: Vec<PlacedDevice>,
}

const fn default_rack_width() -> u32 {
    19
}

/// Editable rack properties captured by rack update commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RackProperties {
    /// Display name
    pub name: String,
    /// Height in U
    pub height: u32,
    /// Width in inches
    pub width: u32,
}

impl Rack {
    /// Creates an empty rack with a fresh id.
    pub fn new(name: impl Into<String>, height: u32, width: u32) -> Result<Self> {
        let rack = Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            height,
            width,
            devices: Vec::new(),
        };
        rack.validate()?;
        Ok(rack)
    }

    /// Validates rack properties (not device placement).
    pub fn validate(&self) -> Result<()> {
        validate_rack_properties(&self.properties())
    }

    /// Current editable properties.
    #[must_use]
    pub fn properties(&self) -> RackProperties {
        RackProperties {
            name: self.name.clone(),
            height: self.height,
            width: self.width,
        }
    }

    /// Overwrites editable properties.
    pub fn apply_properties(&mut self, properties: &RackProperties) {
        self.name.clone_from(&properties.name);
        self.height = properties.height;
        self.width = properties.width;
    }

    /// Finds a device index by id.
    #[must_use]
    pub fn device_index(&self, device_id: &str) -> Option<usize> {
        self.devices.iter().position(|d| d.id == device_id)
    }

    /// Iterates over the children of a container placement.
    pub fn children_of<'a>(
        &'a self,
        container_id: &'a str,
    ) -> impl Iterator<Item = (usize, &'a PlacedDevice)> + 'a {
        self.devices
            .iter()
            .enumerate()
            .filter(move |(_, d)| d.container_id.as_deref() == Some(container_id))
    }
}

/// Validates rack name, height and width.
pub fn validate_rack_properties(properties: &RackProperties) -> Result<()> {
    if properties.name.trim().is_empty() {
        anyhow::bail!("Rack name cannot be empty");
    }

    if properties.name.len() > 100 {
        anyhow::bail!(
            "Rack name '{}' exceeds maximum length of 100 characters (got {})",
            properties.name,
            properties.name.len()
        );
    }

    if properties.height == 0 || properties.height > MAX_RACK_HEIGHT {
        anyhow::bail!(
            "Rack height must be between 1 and {MAX_RACK_HEIGHT}U, got {}",
            properties.height
        );
    }

    if !RACK_WIDTHS.contains(&properties.width) {
        anyhow::bail!(
            "Rack width must be 10 or 19 inches, got {}",
            properties.width
        );
    }

    Ok(())
}

/// How the racks of a group are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPreset {
    /// Side-by-side bays that must share height
    #[default]
    Bayed,
    /// A row of independent racks
    Row,
    /// Free arrangement
    Custom,
}

impl fmt::Display for LayoutPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bayed => "bayed",
            Self::Row => "row",
            Self::Custom => "custom",
        })
    }
}

/// A set of racks sharing a layout preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RackGroup {
    /// Unique identifier (uuid v4)
    pub id: String,
    /// Display name
    pub name: String,
    /// Arrangement preset
    #[serde(default)]
    pub preset: LayoutPreset,
    /// Member rack ids in display order
    pub rack_ids: Vec<String>,
}

impl RackGroup {
    /// Creates a group with a fresh id.
    pub fn new(name: impl Into<String>, preset: LayoutPreset, rack_ids: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            preset,
            rack_ids,
        }
    }

    /// Returns true if racks in this group must share one height.
    #[must_use]
    pub fn is_bayed(&self) -> bool {
        self.preset == LayoutPreset::Bayed
    }

    /// Returns true if the rack is a member.
    #[must_use]
    pub fn contains(&self, rack_id: &str) -> bool {
        self.rack_ids.iter().any(|id| id == rack_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceFace, SlotPosition};

    #[test]
    fn test_rack_new() {
        let rack = Rack::new("Rack A", 42, 19).unwrap();
        assert_eq!(rack.height, 42);
        assert!(rack.devices.is_empty());
        assert!(!rack.id.is_empty());
    }

    #[test]
    fn test_rack_validation() {
        assert!(Rack::new("", 42, 19).is_err());
        assert!(Rack::new("R", 0, 19).is_err());
        assert!(Rack::new("R", 101, 19).is_err());
        assert!(Rack::new("R", 12, 23).is_err());
        assert!(Rack::new("R", 12, 10).is_ok());
    }

    #[test]
    fn test_children_of() {
        let mut rack = Rack::new("R", 12, 19).unwrap();
        let parent = PlacedDevice::new("chassis", 6, DeviceFace::Front, SlotPosition::Full);
        let parent_id = parent.id.clone();
        rack.devices.push(parent);
        rack.devices
            .push(PlacedDevice::new_child("blade", &parent_id, "a", 0, DeviceFace::Front));
        rack.devices
            .push(PlacedDevice::new("other", 30, DeviceFace::Front, SlotPosition::Full));

        let children: Vec<usize> = rack.children_of(&parent_id).map(|(i, _)| i).collect();
        assert_eq!(children, vec![1]);
    }

    #[test]
    fn test_group_helpers() {
        let group = RackGroup::new("Row 1", LayoutPreset::Bayed, vec!["a".into(), "b".into()]);
        assert!(group.is_bayed());
        assert!(group.contains("a"));
        assert!(!group.contains("c"));
    }
}

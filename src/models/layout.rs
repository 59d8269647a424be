//! Layout document: racks, the device library, and rack groups.

use crate::models::{DeviceType, Rack, RackGroup};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Current layout document schema version.
pub const LAYOUT_VERSION: &str = "1.0";

/// How device blocks are drawn by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Text labels
    #[default]
    Label,
    /// Device images
    Image,
}

/// Presentation settings stored with the layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Label or image rendering
    #[serde(default)]
    pub display_mode: DisplayMode,
    /// Whether the rear view is shown next to the front view
    #[serde(default = "default_show_rear")]
    pub show_rear_view: bool,
}

const fn default_show_rear() -> bool {
    true
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::default(),
            show_rear_view: default_show_rear(),
        }
    }
}

/// Complete rack layout document.
///
/// # Validation
///
/// - name must be non-empty, max 100 characters
/// - device type slugs must be unique
/// - placements are audited separately by `validation::report`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Schema version (e.g., "1.0")
    pub version: String,
    /// Layout name
    pub name: String,
    /// Racks in display order
    #[serde(default)]
    pub racks: Vec<Rack>,
    /// Device type library
    #[serde(default)]
    pub device_types: Vec<DeviceType>,
    /// Rack groups
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rack_groups: Vec<RackGroup>,
    /// Presentation settings
    #[serde(default)]
    pub settings: LayoutSettings,
}

impl Layout {
    /// Creates an empty layout.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::validate_name(&name)?;

        Ok(Self {
            version: LAYOUT_VERSION.to_string(),
            name,
            racks: Vec::new(),
            device_types: Vec::new(),
            rack_groups: Vec::new(),
            settings: LayoutSettings::default(),
        })
    }

    /// Validates layout name.
    pub fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            anyhow::bail!("Layout name cannot be empty");
        }

        if name.len() > 100 {
            anyhow::bail!(
                "Layout name '{}' exceeds maximum length of 100 characters (got {})",
                name,
                name.len()
            );
        }

        Ok(())
    }

    /// Gets a rack by id.
    #[must_use]
    pub fn get_rack(&self, rack_id: &str) -> Option<&Rack> {
        self.racks.iter().find(|r| r.id == rack_id)
    }

    /// Gets a mutable rack by id.
    pub fn get_rack_mut(&mut self, rack_id: &str) -> Option<&mut Rack> {
        self.racks.iter_mut().find(|r| r.id == rack_id)
    }

    /// Index of a rack by id.
    #[must_use]
    pub fn rack_index(&self, rack_id: &str) -> Option<usize> {
        self.racks.iter().position(|r| r.id == rack_id)
    }

    /// Gets a device type by slug.
    #[must_use]
    pub fn get_device_type(&self, slug: &str) -> Option<&DeviceType> {
        crate::models::device_type::find_device_type(&self.device_types, slug)
    }

    /// Index of a device type by slug.
    #[must_use]
    pub fn device_type_index(&self, slug: &str) -> Option<usize> {
        self.device_types.iter().position(|dt| dt.slug == slug)
    }

    /// Gets a rack group by id.
    #[must_use]
    pub fn get_group(&self, group_id: &str) -> Option<&RackGroup> {
        self.rack_groups.iter().find(|g| g.id == group_id)
    }

    /// Index of a rack group by id.
    #[must_use]
    pub fn group_index(&self, group_id: &str) -> Option<usize> {
        self.rack_groups.iter().position(|g| g.id == group_id)
    }

    /// The group containing a rack, if any.
    #[must_use]
    pub fn group_for_rack(&self, rack_id: &str) -> Option<&RackGroup> {
        self.rack_groups.iter().find(|g| g.contains(rack_id))
    }

    /// Counts placements of a device type across all racks.
    #[must_use]
    pub fn placement_count(&self, slug: &str) -> usize {
        self.racks
            .iter()
            .flat_map(|r| &r.devices)
            .filter(|d| d.device_type == slug)
            .count()
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            version: LAYOUT_VERSION.to_string(),
            name: "Untitled Layout".to_string(),
            racks: Vec::new(),
            device_types: Vec::new(),
            rack_groups: Vec::new(),
            settings: LayoutSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceFace, LayoutPreset, PlacedDevice, SlotPosition};

    #[test]
    fn test_layout_new() {
        let layout = Layout::new("Lab").unwrap();
        assert_eq!(layout.version, LAYOUT_VERSION);
        assert!(layout.racks.is_empty());
        assert!(Layout::new("").is_err());
        assert!(Layout::new("a".repeat(101)).is_err());
    }

    #[test]
    fn test_lookups() {
        let mut layout = Layout::new("Lab").unwrap();
        let mut rack = Rack::new("A", 12, 19).unwrap();
        rack.devices
            .push(PlacedDevice::new("server", 6, DeviceFace::Front, SlotPosition::Full));
        let rack_id = rack.id.clone();
        layout.racks.push(rack);
        layout
            .device_types
            .push(DeviceType::new("server", 1.0).unwrap());
        layout.rack_groups.push(RackGroup::new(
            "G",
            LayoutPreset::Row,
            vec![rack_id.clone(), "other".into()],
        ));

        assert_eq!(layout.rack_index(&rack_id), Some(0));
        assert!(layout.get_device_type("server").is_some());
        assert_eq!(layout.placement_count("server"), 1);
        assert_eq!(layout.group_for_rack(&rack_id).unwrap().name, "G");
        assert!(layout.group_for_rack("missing").is_none());
    }

    #[test]
    fn test_deserialize_without_groups() {
        let json = r#"{"version":"1.0","name":"L","racks":[],"device_types":[]}"#;
        let layout: Layout = serde_json::from_str(json).unwrap();
        assert!(layout.rack_groups.is_empty());
        assert!(layout.settings.show_rear_view);
    }
}

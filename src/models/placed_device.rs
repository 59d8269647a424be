//! Placed device instances and their face/slot positions.

use crate::models::{Colour, CustomFields, DeviceType};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Which side of the rack a device occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceFace {
    /// Front face only
    #[default]
    Front,
    /// Rear face only
    Rear,
    /// Both faces (full depth)
    Both,
}

impl DeviceFace {
    /// Returns true if devices on `self` and `other` would physically collide.
    ///
    /// `Both` collides with anything, equal faces collide, opposite faces never do.
    #[must_use]
    pub const fn collides_with(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Both, _) | (_, Self::Both) | (Self::Front, Self::Front) | (Self::Rear, Self::Rear)
        )
    }
}

impl fmt::Display for DeviceFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Front => "front",
            Self::Rear => "rear",
            Self::Both => "both",
        })
    }
}

impl std::str::FromStr for DeviceFace {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "front" => Ok(Self::Front),
            "rear" => Ok(Self::Rear),
            "both" => Ok(Self::Both),
            _ => anyhow::bail!("Invalid face '{s}'. Must be 'front', 'rear', or 'both'"),
        }
    }
}

/// Horizontal placement of a device within a rack unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SlotPosition {
    /// Left half
    Left,
    /// Right half
    Right,
    /// Full width
    #[default]
    Full,
}

impl SlotPosition {
    /// Returns true if the two horizontal positions share any width.
    ///
    /// `Full` overlaps anything, equal halves overlap, opposite halves never do.
    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Full, _) | (_, Self::Full) | (Self::Left, Self::Left) | (Self::Right, Self::Right)
        )
    }
}

impl fmt::Display for SlotPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Full => "full",
        })
    }
}

impl std::str::FromStr for SlotPosition {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "full" => Ok(Self::Full),
            _ => anyhow::bail!("Invalid slot '{s}'. Must be 'left', 'right', or 'full'"),
        }
    }
}

/// Image references overriding the device type artwork for one placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlacementImages {
    /// Front image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    /// Rear image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rear: Option<String>,
}

/// One device instance in a rack.
///
/// Rack-level devices store an absolute internal position (U1 = 6). Devices
/// with a `container_id` are children of another placement and store a
/// 0-indexed internal position relative to the container's bottom edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedDevice {
    /// Unique identifier (uuid v4)
    pub id: String,
    /// Slug of the referenced `DeviceType`
    pub device_type: String,
    /// Bottom position in internal units
    pub position: i32,
    /// Occupied face
    #[serde(default)]
    pub face: DeviceFace,
    /// Horizontal position
    #[serde(default)]
    pub slot_position: SlotPosition,
    /// Parent container placement id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    /// Slot id inside the parent container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<String>,
    /// Display name override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Colour override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour: Option<Colour>,
    /// Image overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<PlacementImages>,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// User-defined fields
    #[serde(default, skip_serializing_if = "CustomFields::is_empty")]
    pub custom_fields: CustomFields,
}

impl PlacedDevice {
    /// Creates a rack-level placement with a fresh id.
    pub fn new(
        device_type: impl Into<String>,
        position: i32,
        face: DeviceFace,
        slot_position: SlotPosition,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            device_type: device_type.into(),
            position,
            face,
            slot_position,
            container_id: None,
            slot_id: None,
            name: None,
            colour: None,
            images: None,
            notes: None,
            custom_fields: CustomFields::new(),
        }
    }

    /// Creates a container child placement with a fresh id.
    pub fn new_child(
        device_type: impl Into<String>,
        container_id: impl Into<String>,
        slot_id: impl Into<String>,
        position: i32,
        face: DeviceFace,
    ) -> Self {
        Self {
            container_id: Some(container_id.into()),
            slot_id: Some(slot_id.into()),
            ..Self::new(device_type, position, face, SlotPosition::Full)
        }
    }

    /// Sets the display name override.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns true if this device sits inside a container.
    #[must_use]
    pub const fn is_container_child(&self) -> bool {
        self.container_id.is_some()
    }

    /// Label used in user-facing messages.
    ///
    /// Priority: placement name, then the type's model, then the slug.
    #[must_use]
    pub fn label<'a>(&'a self, device_type: Option<&'a DeviceType>) -> &'a str {
        if let Some(name) = &self.name {
            return name;
        }
        device_type.map_or(self.device_type.as_str(), DeviceType::display_name)
    }
}

/// Returns true if devices on faces `a` and `b` collide.
#[must_use]
pub const fn do_faces_collide(a: DeviceFace, b: DeviceFace) -> bool {
    a.collides_with(b)
}

/// Returns true if slot positions `a` and `b` overlap.
#[must_use]
pub const fn do_slots_overlap(a: SlotPosition, b: SlotPosition) -> bool {
    a.overlaps(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FACES: [DeviceFace; 3] = [DeviceFace::Front, DeviceFace::Rear, DeviceFace::Both];
    const SLOTS: [SlotPosition; 3] = [SlotPosition::Left, SlotPosition::Right, SlotPosition::Full];

    #[test]
    fn test_face_truth_table() {
        assert!(do_faces_collide(DeviceFace::Both, DeviceFace::Front));
        assert!(do_faces_collide(DeviceFace::Both, DeviceFace::Both));
        assert!(do_faces_collide(DeviceFace::Front, DeviceFace::Front));
        assert!(do_faces_collide(DeviceFace::Rear, DeviceFace::Rear));
        assert!(!do_faces_collide(DeviceFace::Front, DeviceFace::Rear));
    }

    #[test]
    fn test_slot_truth_table() {
        assert!(do_slots_overlap(SlotPosition::Full, SlotPosition::Left));
        assert!(do_slots_overlap(SlotPosition::Left, SlotPosition::Left));
        assert!(!do_slots_overlap(SlotPosition::Left, SlotPosition::Right));
    }

    #[test]
    fn test_tables_are_symmetric() {
        for a in FACES {
            for b in FACES {
                assert_eq!(do_faces_collide(a, b), do_faces_collide(b, a));
            }
        }
        for a in SLOTS {
            for b in SLOTS {
                assert_eq!(do_slots_overlap(a, b), do_slots_overlap(b, a));
            }
        }
    }

    #[test]
    fn test_parse_face_and_slot() {
        assert_eq!("REAR".parse::<DeviceFace>().unwrap(), DeviceFace::Rear);
        assert!("top".parse::<DeviceFace>().is_err());
        assert_eq!("right".parse::<SlotPosition>().unwrap(), SlotPosition::Right);
        assert!("middle".parse::<SlotPosition>().is_err());
    }

    #[test]
    fn test_label_priority() {
        let dt = DeviceType::new("r740", 2.0).unwrap().with_model("PowerEdge R740");
        let device = PlacedDevice::new("r740", 6, DeviceFace::Front, SlotPosition::Full);
        assert_eq!(device.label(Some(&dt)), "PowerEdge R740");
        assert_eq!(device.label(None), "r740");
        assert_eq!(device.clone().with_name("db-01").label(Some(&dt)), "db-01");
    }

    #[test]
    fn test_child_constructor() {
        let child = PlacedDevice::new_child("blade", "parent", "bay-1", 0, DeviceFace::Both);
        assert!(child.is_container_child());
        assert_eq!(child.slot_id.as_deref(), Some("bay-1"));
        assert_eq!(child.slot_position, SlotPosition::Full);
    }
}

//! Unchecked layout setters.
//!
//! These are the only functions that write to a [`Layout`]. They are called
//! from command bodies in [`crate::history`], which have already validated
//! the change. Each setter names its target rack (or group, or slug)
//! explicitly. A missing target is logged and ignored so that undo/redo never
//! fails mid-batch.

use crate::models::{Colour, DeviceFace, DeviceType, Layout, PlacedDevice, Rack, RackGroup, RackProperties, SlotPosition};
use tracing::warn;

/// Runs `apply` on the device at `index` in `rack_id`, returning false if absent.
fn with_device(
    layout: &mut Layout,
    rack_id: &str,
    index: usize,
    apply: impl FnOnce(&mut PlacedDevice),
) -> bool {
    match layout
        .get_rack_mut(rack_id)
        .and_then(|rack| rack.devices.get_mut(index))
    {
        Some(device) => {
            apply(device);
            true
        }
        None => {
            warn!(rack_id, index, "raw setter target device not found");
            false
        }
    }
}

/// Inserts a device at `index` (clamped to the end of the list).
pub fn place_device_raw(layout: &mut Layout, rack_id: &str, index: usize, device: PlacedDevice) -> bool {
    let Some(rack) = layout.get_rack_mut(rack_id) else {
        warn!(rack_id, "place_device_raw: rack not found");
        return false;
    };
    let index = index.min(rack.devices.len());
    rack.devices.insert(index, device);
    true
}

/// Removes and returns the device at `index`.
pub fn remove_device_at_index_raw(layout: &mut Layout, rack_id: &str, index: usize) -> Option<PlacedDevice> {
    let rack = layout.get_rack_mut(rack_id)?;
    if index < rack.devices.len() {
        Some(rack.devices.remove(index))
    } else {
        warn!(rack_id, index, "remove_device_at_index_raw: index out of range");
        None
    }
}

/// Sets a device's position.
pub fn move_device_raw(layout: &mut Layout, rack_id: &str, index: usize, position: i32) -> bool {
    with_device(layout, rack_id, index, |d| d.position = position)
}

/// Sets a device's face.
pub fn update_device_face_raw(layout: &mut Layout, rack_id: &str, index: usize, face: DeviceFace) -> bool {
    with_device(layout, rack_id, index, |d| d.face = face)
}

/// Sets a device's horizontal slot position.
pub fn update_device_slot_raw(layout: &mut Layout, rack_id: &str, index: usize, slot: SlotPosition) -> bool {
    with_device(layout, rack_id, index, |d| d.slot_position = slot)
}

/// Sets or clears a device's display name override.
pub fn update_device_name_raw(layout: &mut Layout, rack_id: &str, index: usize, name: Option<String>) -> bool {
    with_device(layout, rack_id, index, |d| d.name = name)
}

/// Sets or clears a device's colour override.
pub fn update_device_colour_raw(layout: &mut Layout, rack_id: &str, index: usize, colour: Option<Colour>) -> bool {
    with_device(layout, rack_id, index, |d| d.colour = colour)
}

/// Sets or clears a device's notes.
pub fn update_device_notes_raw(layout: &mut Layout, rack_id: &str, index: usize, notes: Option<String>) -> bool {
    with_device(layout, rack_id, index, |d| d.notes = notes)
}

/// Inserts a device type at `index` (clamped).
///
/// # Panics
///
/// Panics if the slug already exists: the caller skipped validation.
pub fn add_device_type_raw(layout: &mut Layout, index: usize, device_type: DeviceType) {
    assert!(
        layout.get_device_type(&device_type.slug).is_none(),
        "device type '{}' already exists in the library",
        device_type.slug
    );
    let index = index.min(layout.device_types.len());
    layout.device_types.insert(index, device_type);
}

/// Replaces the device type with the same slug.
pub fn replace_device_type_raw(layout: &mut Layout, device_type: DeviceType) -> bool {
    match layout.device_type_index(&device_type.slug) {
        Some(index) => {
            layout.device_types[index] = device_type;
            true
        }
        None => {
            warn!(slug = %device_type.slug, "replace_device_type_raw: slug not found");
            false
        }
    }
}

/// Removes a device type by slug, leaving placements untouched.
pub fn remove_device_type_raw(layout: &mut Layout, slug: &str) -> Option<DeviceType> {
    let Some(index) = layout.device_type_index(slug) else {
        warn!(slug, "remove_device_type_raw: slug not found");
        return None;
    };
    Some(layout.device_types.remove(index))
}

/// Inserts a rack at `index` (clamped).
pub fn insert_rack_raw(layout: &mut Layout, index: usize, rack: Rack) {
    let index = index.min(layout.racks.len());
    layout.racks.insert(index, rack);
}

/// Removes a rack by id, leaving group membership untouched.
pub fn remove_rack_raw(layout: &mut Layout, rack_id: &str) -> Option<Rack> {
    let Some(index) = layout.rack_index(rack_id) else {
        warn!(rack_id, "remove_rack_raw: rack not found");
        return None;
    };
    Some(layout.racks.remove(index))
}

/// Overwrites a rack's editable properties.
pub fn update_rack_raw(layout: &mut Layout, rack_id: &str, properties: &RackProperties) -> bool {
    match layout.get_rack_mut(rack_id) {
        Some(rack) => {
            rack.apply_properties(properties);
            true
        }
        None => {
            warn!(rack_id, "update_rack_raw: rack not found");
            false
        }
    }
}

/// Inserts a rack group at `index` (clamped).
pub fn insert_rack_group_raw(layout: &mut Layout, index: usize, group: RackGroup) {
    let index = index.min(layout.rack_groups.len());
    layout.rack_groups.insert(index, group);
}

/// Removes a rack group by id.
pub fn remove_rack_group_raw(layout: &mut Layout, group_id: &str) -> Option<RackGroup> {
    let Some(index) = layout.group_index(group_id) else {
        warn!(group_id, "remove_rack_group_raw: group not found");
        return None;
    };
    Some(layout.rack_groups.remove(index))
}

/// Replaces a group's member list.
pub fn set_group_members_raw(layout: &mut Layout, group_id: &str, rack_ids: Vec<String>) -> bool {
    match layout.rack_groups.iter_mut().find(|g| g.id == group_id) {
        Some(group) => {
            group.rack_ids = rack_ids;
            true
        }
        None => {
            warn!(group_id, "set_group_members_raw: group not found");
            false
        }
    }
}

/// Renames a group.
pub fn rename_rack_group_raw(layout: &mut Layout, group_id: &str, name: String) -> bool {
    match layout.rack_groups.iter_mut().find(|g| g.id == group_id) {
        Some(group) => {
            group.name = name;
            true
        }
        None => {
            warn!(group_id, "rename_rack_group_raw: group not found");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LayoutPreset;

    fn layout_with_rack() -> (Layout, String) {
        let mut layout = Layout::new("Raw").unwrap();
        let rack = Rack::new("A", 12, 19).unwrap();
        let rack_id = rack.id.clone();
        layout.racks.push(rack);
        (layout, rack_id)
    }

    #[test]
    fn test_device_setters() {
        let (mut layout, rack_id) = layout_with_rack();
        let device = PlacedDevice::new("x", 6, DeviceFace::Front, SlotPosition::Full);
        assert!(place_device_raw(&mut layout, &rack_id, 99, device));

        assert!(move_device_raw(&mut layout, &rack_id, 0, 30));
        assert!(update_device_face_raw(&mut layout, &rack_id, 0, DeviceFace::Rear));
        assert!(update_device_slot_raw(&mut layout, &rack_id, 0, SlotPosition::Left));
        assert!(update_device_name_raw(&mut layout, &rack_id, 0, Some("web".into())));
        assert!(update_device_colour_raw(&mut layout, &rack_id, 0, Some(Colour::new(1, 2, 3))));
        assert!(update_device_notes_raw(&mut layout, &rack_id, 0, Some("n".into())));

        let device = &layout.racks[0].devices[0];
        assert_eq!(device.position, 30);
        assert_eq!(device.face, DeviceFace::Rear);
        assert_eq!(device.slot_position, SlotPosition::Left);
        assert_eq!(device.name.as_deref(), Some("web"));
        assert_eq!(device.colour, Some(Colour::new(1, 2, 3)));

        assert!(remove_device_at_index_raw(&mut layout, &rack_id, 0).is_some());
        assert!(remove_device_at_index_raw(&mut layout, &rack_id, 0).is_none());
    }

    #[test]
    fn test_missing_targets_are_ignored() {
        let (mut layout, rack_id) = layout_with_rack();
        assert!(!move_device_raw(&mut layout, &rack_id, 3, 30));
        assert!(!move_device_raw(&mut layout, "nope", 0, 30));
        assert!(remove_rack_raw(&mut layout, "nope").is_none());
        assert!(!set_group_members_raw(&mut layout, "nope", vec![]));
    }

    #[test]
    #[should_panic(expected = "already exists")]
    fn test_duplicate_device_type_panics() {
        let (mut layout, _) = layout_with_rack();
        add_device_type_raw(&mut layout, 0, DeviceType::new("dup", 1.0).unwrap());
        add_device_type_raw(&mut layout, 1, DeviceType::new("dup", 2.0).unwrap());
    }

    #[test]
    fn test_group_setters() {
        let (mut layout, rack_id) = layout_with_rack();
        let group = RackGroup::new("G", LayoutPreset::Row, vec![rack_id.clone()]);
        let group_id = group.id.clone();
        insert_rack_group_raw(&mut layout, 0, group);
        assert!(rename_rack_group_raw(&mut layout, &group_id, "H".into()));
        assert!(set_group_members_raw(&mut layout, &group_id, vec![]));
        let removed = remove_rack_group_raw(&mut layout, &group_id).unwrap();
        assert_eq!(removed.name, "H");
        assert!(removed.rack_ids.is_empty());
    }
}

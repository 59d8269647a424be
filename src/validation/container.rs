//! Placement checks for devices nested inside container slots.
//!
//! Children use 0-indexed internal positions relative to the container's
//! bottom edge and only ever collide with siblings in the same slot.

use crate::models::device_type::find_device_type;
use crate::models::{DeviceType, PlacedDevice, Rack, Slot};
use crate::units::{occupied_range, ranges_overlap};

/// Returns true if `child_type` physically fits `slot`.
///
/// The child's width share (half or full) must not exceed the slot's width
/// fraction, its height must not exceed the slot height, and its category
/// must be accepted.
#[must_use]
pub fn can_place_in_slot(child_type: &DeviceType, slot: &Slot) -> bool {
    const EPSILON: f64 = 1e-9;

    child_type.width_fraction() <= slot.width_fraction + EPSILON
        && child_type.u_height <= slot.height_units + EPSILON
        && slot.accepts_category(child_type.category)
}

/// Siblings of a prospective child: same container, same slot.
pub fn slot_siblings<'a>(
    rack: &'a Rack,
    container_id: &'a str,
    slot_id: &'a str,
) -> impl Iterator<Item = &'a PlacedDevice> + 'a {
    rack.children_of(container_id)
        .map(|(_, device)| device)
        .filter(move |device| device.slot_id.as_deref() == Some(slot_id))
}

/// Checks whether `child_type` can sit at `position` inside `container`'s slot.
///
/// `position` is 0-indexed internal units from the container's bottom edge.
/// The child must fit within the container height, fit the named slot, and
/// not overlap any sibling in that slot except `exclude_device_id`.
#[must_use]
pub fn can_place_in_container(
    rack: &Rack,
    library: &[DeviceType],
    container: &PlacedDevice,
    container_type: &DeviceType,
    child_type: &DeviceType,
    slot_id: &str,
    position: i32,
    exclude_device_id: Option<&str>,
) -> bool {
    if position < 0 || child_type.u_height <= 0.0 {
        return false;
    }

    let candidate = occupied_range(position, child_type.u_height);
    if candidate.1 >= container_type.height_internal() {
        return false;
    }

    let Some(slot) = container_type.get_slot(slot_id) else {
        return false;
    };

    if !can_place_in_slot(child_type, slot) {
        return false;
    }

    !slot_siblings(rack, &container.id, slot_id)
        .filter(|sibling| Some(sibling.id.as_str()) != exclude_device_id)
        .any(|sibling| {
            find_device_type(library, &sibling.device_type).is_some_and(|sibling_type| {
                ranges_overlap(candidate, occupied_range(sibling.position, sibling_type.u_height))
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceCategory, DeviceFace, SlotPosition};

    fn chassis() -> DeviceType {
        DeviceType::new("chassis", 2.0)
            .unwrap()
            .with_slot(Slot::new("left", 0.5, 2.0))
            .with_slot(Slot::new("right", 0.5, 2.0).accepting([DeviceCategory::Server]))
    }

    fn library() -> Vec<DeviceType> {
        vec![
            chassis(),
            DeviceType::new("half-1u", 1.0)
                .unwrap()
                .half_width()
                .with_category(DeviceCategory::Server),
            DeviceType::new("full-1u", 1.0).unwrap(),
            DeviceType::new("half-storage", 1.0)
                .unwrap()
                .half_width()
                .with_category(DeviceCategory::Storage),
            DeviceType::new("half-3u", 3.0).unwrap().half_width(),
        ]
    }

    fn rack_with_container() -> (Rack, PlacedDevice) {
        let mut rack = Rack::new("R", 12, 19).unwrap();
        let container = PlacedDevice::new("chassis", 30, DeviceFace::Front, SlotPosition::Full);
        rack.devices.push(container.clone());
        (rack, container)
    }

    fn check(rack: &Rack, container: &PlacedDevice, child: &str, slot: &str, position: i32) -> bool {
        let lib = library();
        let container_type = find_device_type(&lib, "chassis").unwrap();
        let child_type = find_device_type(&lib, child).unwrap();
        can_place_in_container(rack, &lib, container, container_type, child_type, slot, position, None)
    }

    #[test]
    fn test_can_place_in_slot() {
        let lib = library();
        let slot = Slot::new("s", 0.5, 2.0);
        assert!(can_place_in_slot(find_device_type(&lib, "half-1u").unwrap(), &slot));
        assert!(!can_place_in_slot(find_device_type(&lib, "full-1u").unwrap(), &slot));
        assert!(!can_place_in_slot(find_device_type(&lib, "half-3u").unwrap(), &slot));
    }

    #[test]
    fn test_category_restriction() {
        let (rack, container) = rack_with_container();
        assert!(check(&rack, &container, "half-1u", "right", 0));
        assert!(!check(&rack, &container, "half-storage", "right", 0));
        assert!(check(&rack, &container, "half-storage", "left", 0));
    }

    #[test]
    fn test_bounds_inside_container() {
        let (rack, container) = rack_with_container();
        assert!(check(&rack, &container, "half-1u", "left", 6));
        assert!(!check(&rack, &container, "half-1u", "left", 7));
        assert!(!check(&rack, &container, "half-1u", "left", -1));
        assert!(!check(&rack, &container, "half-1u", "missing", 0));
    }

    #[test]
    fn test_sibling_collision_is_per_slot() {
        let (mut rack, container) = rack_with_container();
        let child = PlacedDevice::new_child("half-1u", &container.id, "left", 0, DeviceFace::Front);
        let child_id = child.id.clone();
        rack.devices.push(child);

        assert!(!check(&rack, &container, "half-1u", "left", 0));
        assert!(!check(&rack, &container, "half-1u", "left", 3));
        assert!(check(&rack, &container, "half-1u", "left", 6));
        assert!(check(&rack, &container, "half-1u", "right", 0));

        let lib = library();
        let container_type = find_device_type(&lib, "chassis").unwrap();
        let child_type = find_device_type(&lib, "half-1u").unwrap();
        assert!(can_place_in_container(
            &rack,
            &lib,
            &container,
            container_type,
            child_type,
            "left",
            0,
            Some(&child_id),
        ));
    }

    #[test]
    fn test_children_of_other_containers_ignored() {
        let (mut rack, container) = rack_with_container();
        rack.devices
            .push(PlacedDevice::new_child("half-1u", "another", "left", 0, DeviceFace::Front));
        assert!(check(&rack, &container, "half-1u", "left", 0));
    }
}

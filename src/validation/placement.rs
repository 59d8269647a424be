//! Rack-level placement checks.
//!
//! Every function here is pure: it only reads the rack and device library
//! and answers with a boolean or a list. Container children are ignored at
//! this level; see [`crate::validation::container`] for their rules.

// Pixel math converts between f64 and i32 on small, bounded values
#![allow(clippy::cast_possible_truncation)]

use crate::models::device_type::find_device_type;
use crate::models::{
    do_faces_collide, do_slots_overlap, DeviceFace, DeviceType, PlacedDevice, Rack, SlotPosition,
};
use crate::units::{occupied_range, rack_max_position, rack_min_position, ranges_overlap, to_internal};

/// Returns true if the block `[target, target + height)` lies inside the rack.
fn within_rack(rack: &Rack, height_u: f64, target: i32) -> bool {
    if height_u <= 0.0 || target < rack_min_position() {
        return false;
    }
    let (_, top) = occupied_range(target, height_u);
    top <= rack_max_position(rack.height)
}

/// Rack-level devices that would block the prospective placement.
fn blocking_devices<'a>(
    rack: &'a Rack,
    library: &'a [DeviceType],
    height_u: f64,
    target: i32,
    exclude_index: Option<usize>,
    face: DeviceFace,
    slot: SlotPosition,
) -> impl Iterator<Item = &'a PlacedDevice> + 'a {
    let candidate = occupied_range(target, height_u);

    rack.devices
        .iter()
        .enumerate()
        .filter(move |(idx, device)| Some(*idx) != exclude_index && !device.is_container_child())
        .filter_map(move |(_, device)| {
            let device_type = find_device_type(library, &device.device_type)?;
            let existing = occupied_range(device.position, device_type.u_height);
            let blocked = ranges_overlap(candidate, existing)
                && do_faces_collide(face, device.face)
                && do_slots_overlap(slot, device.slot_position);
            blocked.then_some(device)
        })
}

/// Checks whether a block of `height_u` can sit at internal position `target`.
///
/// Rejects positions below U1 or whose top exceeds the rack. Otherwise scans
/// every rack-level device except `exclude_index`; the placement fails if any
/// of them overlaps in range, face, and slot at once. Devices whose type is
/// missing from `library` are skipped.
///
/// # Examples
///
/// ```
/// use rackplan::models::{DeviceFace, DeviceType, Rack, SlotPosition};
/// use rackplan::units::to_internal;
/// use rackplan::validation::can_place_device;
///
/// let rack = Rack::new("R", 12, 19).unwrap();
/// let library = vec![DeviceType::new("server", 2.0).unwrap()];
/// assert!(can_place_device(&rack, &library, 2.0, to_internal(5.0), None, DeviceFace::Front, SlotPosition::Full));
/// assert!(!can_place_device(&rack, &library, 2.0, to_internal(12.0), None, DeviceFace::Front, SlotPosition::Full));
/// ```
#[must_use]
pub fn can_place_device(
    rack: &Rack,
    library: &[DeviceType],
    height_u: f64,
    target: i32,
    exclude_index: Option<usize>,
    face: DeviceFace,
    slot: SlotPosition,
) -> bool {
    within_rack(rack, height_u, target)
        && blocking_devices(rack, library, height_u, target, exclude_index, face, slot)
            .next()
            .is_none()
}

/// Returns every rack-level device blocking the prospective placement.
///
/// Bounds are not checked here; an out-of-bounds target with no neighbours
/// yields an empty list.
#[must_use]
pub fn find_collisions<'a>(
    rack: &'a Rack,
    library: &'a [DeviceType],
    height_u: f64,
    target: i32,
    exclude_index: Option<usize>,
    face: DeviceFace,
    slot: SlotPosition,
) -> Vec<&'a PlacedDevice> {
    if height_u <= 0.0 {
        return Vec::new();
    }
    blocking_devices(rack, library, height_u, target, exclude_index, face, slot).collect()
}

/// Lists every internal position where the block fits, ascending.
///
/// Brute-force scan over each internal unit from U1 to the topmost valid
/// bottom position; racks are at most 100U so this is at most 600 steps.
#[must_use]
pub fn find_valid_drop_positions(
    rack: &Rack,
    library: &[DeviceType],
    height_u: f64,
    face: DeviceFace,
    slot: SlotPosition,
) -> Vec<i32> {
    if height_u <= 0.0 {
        return Vec::new();
    }
    let highest_bottom = rack_max_position(rack.height) + 1 - to_internal(height_u);

    (rack_min_position()..=highest_bottom)
        .filter(|&position| can_place_device(rack, library, height_u, position, None, face, slot))
        .collect()
}

/// Snaps a drag position to the closest valid front/full placement.
///
/// See [`snap_to_nearest_valid_position_for`].
#[must_use]
pub fn snap_to_nearest_valid_position(
    rack: &Rack,
    library: &[DeviceType],
    height_u: f64,
    target_pixel_y: f64,
    u_height_px: f64,
) -> Option<i32> {
    snap_to_nearest_valid_position_for(
        rack,
        library,
        height_u,
        target_pixel_y,
        u_height_px,
        DeviceFace::Front,
        SlotPosition::Full,
    )
}

/// Snaps a drag position to the closest valid placement on `face`/`slot`.
///
/// `target_pixel_y` is the top edge of the dragged block, measured downward
/// from the top of the rack's unit area; U1 is drawn at the bottom. Ties go to
/// the lower position. Returns `None` if `u_height_px` is not positive or the
/// block fits nowhere.
#[must_use]
pub fn snap_to_nearest_valid_position_for(
    rack: &Rack,
    library: &[DeviceType],
    height_u: f64,
    target_pixel_y: f64,
    u_height_px: f64,
    face: DeviceFace,
    slot: SlotPosition,
) -> Option<i32> {
    if u_height_px <= 0.0 || !target_pixel_y.is_finite() {
        return None;
    }

    let bottom_u = f64::from(rack.height) - target_pixel_y / u_height_px - height_u + 1.0;
    let approx = to_internal(bottom_u);

    find_valid_drop_positions(rack, library, height_u, face, slot)
        .into_iter()
        .min_by_key(|&position| ((position - approx).abs(), position))
}

/// Checks whether any rack-level device at exactly `position` overlaps `target_slot`.
///
/// Used when a half-width device switches sides without moving vertically.
#[must_use]
pub fn is_slot_occupied(
    rack: &Rack,
    position: i32,
    target_slot: SlotPosition,
    exclude_index: Option<usize>,
) -> bool {
    rack.devices.iter().enumerate().any(|(idx, device)| {
        Some(idx) != exclude_index
            && !device.is_container_child()
            && device.position == position
            && do_slots_overlap(target_slot, device.slot_position)
    })
}

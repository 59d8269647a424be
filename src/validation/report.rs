//! Whole-layout audit.
//!
//! Layout documents arrive from an external serializer and may violate the
//! invariants the store maintains. This module checks a loaded layout and
//! reports every problem it finds.

// Allow format! appended to String - more readable for building messages
#![allow(clippy::format_push_string)]

use crate::models::device_type::find_device_type;
use crate::models::{DeviceFace, Layout, PlacedDevice, Rack};
use crate::units::{format_u, occupied_range, rack_max_position, rack_min_position, ranges_overlap};
use crate::validation::container::can_place_in_slot;
use crate::validation::placement::find_collisions;
use std::collections::{HashMap, HashSet};

/// Audit result with specific errors and warnings.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Invariant violations
    pub errors: Vec<ValidationError>,
    /// Non-critical warnings
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Creates a new empty validation report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Returns true if there are no errors (warnings are allowed).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error to the report.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if any error has the given kind.
    #[must_use]
    pub fn has_error(&self, kind: ValidationErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    /// Formats the report as a user-friendly message.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut message = String::new();

        if !self.errors.is_empty() {
            message.push_str(&format!("{} validation errors:\n", self.errors.len()));
            for (idx, error) in self.errors.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, error));
            }
        }

        if !self.warnings.is_empty() {
            message.push_str(&format!("{} warnings:\n", self.warnings.len()));
            for (idx, warning) in self.warnings.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, warning));
            }
        }

        message
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Type of validation error
    pub kind: ValidationErrorKind,
    /// Name of the rack where the error occurred
    pub rack: Option<String>,
    /// Id of the offending device
    pub device_id: Option<String>,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            rack: None,
            device_id: None,
            message: message.into(),
        }
    }

    /// Sets the rack context.
    pub fn in_rack(mut self, rack: &Rack) -> Self {
        self.rack = Some(rack.name.clone());
        self
    }

    /// Sets the device context.
    pub fn for_device(mut self, device: &PlacedDevice) -> Self {
        self.device_id = Some(device.id.clone());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rack) = &self.rack {
            write!(f, "[{}] {}: {}", rack, self.kind, self.message)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

/// Types of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Placement references a slug missing from the library
    UnknownDeviceType,
    /// Device extends outside its rack or container
    OutOfBounds,
    /// Two devices occupy the same space
    Collision,
    /// Child references a missing container or slot, or does not fit its slot
    ContainerMismatch,
    /// Two entities share an id or slug
    DuplicateId,
    /// Group references a missing rack, or a rack is in several groups
    GroupMembership,
    /// Bayed group members differ in height
    GroupHeightMismatch,
    /// Group has fewer than two members
    GroupTooSmall,
}

impl std::fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownDeviceType => write!(f, "Unknown Device Type"),
            Self::OutOfBounds => write!(f, "Out of Bounds"),
            Self::Collision => write!(f, "Collision"),
            Self::ContainerMismatch => write!(f, "Container Mismatch"),
            Self::DuplicateId => write!(f, "Duplicate Id"),
            Self::GroupMembership => write!(f, "Group Membership"),
            Self::GroupHeightMismatch => write!(f, "Group Height Mismatch"),
            Self::GroupTooSmall => write!(f, "Group Too Small"),
        }
    }
}

/// Validation warning (non-blocking).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Warning message
    pub message: String,
}

impl ValidationWarning {
    /// Creates a new validation warning
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Layout auditor.
pub struct LayoutValidator<'a> {
    layout: &'a Layout,
}

impl<'a> LayoutValidator<'a> {
    /// Creates a new layout validator.
    #[must_use]
    pub const fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    /// Audits the layout.
    ///
    /// Checks:
    /// - Device type slugs, rack ids and device ids are unique
    /// - Every placement references a known device type
    /// - Rack-level devices are in bounds and collision-free
    /// - Children reference a real container slot, fit it, and do not overlap siblings
    /// - Groups reference real racks, have at least two members, and bayed
    ///   groups share one height
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        self.validate_unique_ids(&mut report);

        for rack in &self.layout.racks {
            self.validate_rack(&mut report, rack);
        }

        self.validate_groups(&mut report);

        report
    }

    fn validate_unique_ids(&self, report: &mut ValidationReport) {
        let mut slugs = HashSet::new();
        for device_type in &self.layout.device_types {
            if !slugs.insert(device_type.slug.as_str()) {
                report.add_error(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Device type slug '{}' is defined more than once", device_type.slug),
                ));
            }
        }

        let mut rack_ids = HashSet::new();
        let mut device_ids = HashSet::new();
        for rack in &self.layout.racks {
            if !rack_ids.insert(rack.id.as_str()) {
                report.add_error(
                    ValidationError::new(
                        ValidationErrorKind::DuplicateId,
                        format!("Rack id '{}' is used more than once", rack.id),
                    )
                    .in_rack(rack),
                );
            }
            for device in &rack.devices {
                if !device_ids.insert(device.id.as_str()) {
                    report.add_error(
                        ValidationError::new(
                            ValidationErrorKind::DuplicateId,
                            format!("Device id '{}' is used more than once", device.id),
                        )
                        .in_rack(rack)
                        .for_device(device),
                    );
                }
            }
        }
    }

    fn validate_rack(&self, report: &mut ValidationReport, rack: &Rack) {
        let library = &self.layout.device_types;

        if rack.devices.is_empty() {
            report.add_warning(ValidationWarning::new(format!(
                "Rack '{}' has no devices",
                rack.name
            )));
        }

        // Each colliding pair is reported once, from the later device
        for (idx, device) in rack.devices.iter().enumerate() {
            let Some(device_type) = find_device_type(library, &device.device_type) else {
                report.add_error(
                    ValidationError::new(
                        ValidationErrorKind::UnknownDeviceType,
                        format!("Device '{}' references unknown type '{}'", device.id, device.device_type),
                    )
                    .in_rack(rack)
                    .for_device(device),
                );
                continue;
            };

            if device_type.is_full_depth && device.face != DeviceFace::Both {
                report.add_warning(ValidationWarning::new(format!(
                    "Full-depth device '{}' in rack '{}' is stored on the {} face",
                    device.label(Some(device_type)),
                    rack.name,
                    device.face
                )));
            }

            if device.is_container_child() {
                self.validate_child(report, rack, device);
                continue;
            }

            let (bottom, top) = occupied_range(device.position, device_type.u_height);
            if bottom < rack_min_position() || top > rack_max_position(rack.height) {
                report.add_error(
                    ValidationError::new(
                        ValidationErrorKind::OutOfBounds,
                        format!(
                            "'{}' at {} extends outside the {}U rack",
                            device.label(Some(device_type)),
                            format_u(device.position),
                            rack.height
                        ),
                    )
                    .in_rack(rack)
                    .for_device(device),
                );
            }

            let earlier = rack.devices[..idx].as_ptr_range();
            let blockers = find_collisions(
                rack,
                library,
                device_type.u_height,
                device.position,
                Some(idx),
                device.face,
                device.slot_position,
            );
            for blocker in blockers
                .into_iter()
                .filter(|&blocker| earlier.contains(&std::ptr::from_ref(blocker)))
            {
                report.add_error(
                    ValidationError::new(
                        ValidationErrorKind::Collision,
                        format!(
                            "'{}' at {} overlaps '{}' at {}",
                            device.label(Some(device_type)),
                            format_u(device.position),
                            blocker.label(find_device_type(library, &blocker.device_type)),
                            format_u(blocker.position)
                        ),
                    )
                    .in_rack(rack)
                    .for_device(device),
                );
            }
        }
    }

    fn validate_child(&self, report: &mut ValidationReport, rack: &Rack, child: &PlacedDevice) {
        let library = &self.layout.device_types;
        let mismatch = |message: String| {
            ValidationError::new(ValidationErrorKind::ContainerMismatch, message)
                .in_rack(rack)
                .for_device(child)
        };

        let Some(child_type) = find_device_type(library, &child.device_type) else {
            return;
        };
        let container_id = child.container_id.as_deref().unwrap_or_default();
        let Some(container) = rack.devices.iter().find(|d| d.id == container_id) else {
            report.add_error(mismatch(format!(
                "'{}' references missing container '{}'",
                child.label(Some(child_type)),
                container_id
            )));
            return;
        };
        let Some(container_type) = find_device_type(library, &container.device_type) else {
            return;
        };
        let slot_id = child.slot_id.as_deref().unwrap_or_default();
        let Some(slot) = container_type.get_slot(slot_id) else {
            report.add_error(mismatch(format!(
                "'{}' references slot '{}' which '{}' does not define",
                child.label(Some(child_type)),
                slot_id,
                container_type.display_name()
            )));
            return;
        };

        if !can_place_in_slot(child_type, slot) {
            report.add_error(mismatch(format!(
                "'{}' does not fit slot '{}' of '{}'",
                child.label(Some(child_type)),
                slot_id,
                container_type.display_name()
            )));
        }

        let range = occupied_range(child.position, child_type.u_height);
        if range.0 < 0 || range.1 >= container_type.height_internal() {
            report.add_error(
                ValidationError::new(
                    ValidationErrorKind::OutOfBounds,
                    format!(
                        "'{}' extends outside container '{}'",
                        child.label(Some(child_type)),
                        container_type.display_name()
                    ),
                )
                .in_rack(rack)
                .for_device(child),
            );
        }

        // Report each sibling overlap once, from the later child
        let child_idx = rack.device_index(&child.id).unwrap_or_default();
        let overlapping = crate::validation::container::slot_siblings(rack, container_id, slot_id)
            .filter(|sibling| rack.device_index(&sibling.id).unwrap_or_default() < child_idx)
            .filter(|sibling| {
                find_device_type(library, &sibling.device_type).is_some_and(|sibling_type| {
                    ranges_overlap(range, occupied_range(sibling.position, sibling_type.u_height))
                })
            })
            .count();
        if overlapping > 0 {
            report.add_error(
                ValidationError::new(
                    ValidationErrorKind::Collision,
                    format!(
                        "'{}' overlaps {} sibling(s) in slot '{}'",
                        child.label(Some(child_type)),
                        overlapping,
                        slot_id
                    ),
                )
                .in_rack(rack)
                .for_device(child),
            );
        }
    }

    fn validate_groups(&self, report: &mut ValidationReport) {
        let mut membership: HashMap<&str, &str> = HashMap::new();

        for group in &self.layout.rack_groups {
            if group.rack_ids.len() < crate::models::rack::MIN_GROUP_SIZE {
                report.add_error(ValidationError::new(
                    ValidationErrorKind::GroupTooSmall,
                    format!("Group '{}' has {} member(s), needs at least 2", group.name, group.rack_ids.len()),
                ));
            }

            let mut heights = Vec::new();
            for rack_id in &group.rack_ids {
                let Some(rack) = self.layout.get_rack(rack_id) else {
                    report.add_error(ValidationError::new(
                        ValidationErrorKind::GroupMembership,
                        format!("Group '{}' references unknown rack '{}'", group.name, rack_id),
                    ));
                    continue;
                };
                heights.push((rack.name.as_str(), rack.height));

                if let Some(previous) = membership.insert(rack_id.as_str(), group.name.as_str()) {
                    report.add_error(
                        ValidationError::new(
                            ValidationErrorKind::GroupMembership,
                            format!("Rack is in both group '{}' and group '{}'", previous, group.name),
                        )
                        .in_rack(rack),
                    );
                }
            }

            if group.is_bayed() {
                if let Some((_, first_height)) = heights.first().copied() {
                    for (name, height) in heights.iter().skip(1) {
                        if *height != first_height {
                            report.add_error(ValidationError::new(
                                ValidationErrorKind::GroupHeightMismatch,
                                format!(
                                    "Bayed group '{}' mixes heights: '{}' is {}U, expected {}U",
                                    group.name, name, height, first_height
                                ),
                            ));
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceType, LayoutPreset, RackGroup, Slot, SlotPosition};
    use crate::units::to_internal;

    fn layout() -> Layout {
        let mut layout = Layout::new("Audit").unwrap();
        layout.device_types = vec![
            DeviceType::new("one-u", 1.0).unwrap(),
            DeviceType::new("deep", 2.0).unwrap().full_depth(),
            DeviceType::new("chassis", 2.0)
                .unwrap()
                .with_slot(Slot::new("a", 0.5, 2.0)),
            DeviceType::new("blade", 1.0).unwrap().half_width(),
        ];
        layout.racks.push(Rack::new("A", 12, 19).unwrap());
        layout
    }

    fn place(layout: &mut Layout, slug: &str, u: f64, face: DeviceFace) -> String {
        let device = PlacedDevice::new(slug, to_internal(u), face, SlotPosition::Full);
        let id = device.id.clone();
        layout.racks[0].devices.push(device);
        id
    }

    #[test]
    fn test_clean_layout_is_valid() {
        let mut layout = layout();
        place(&mut layout, "one-u", 1.0, DeviceFace::Front);
        place(&mut layout, "one-u", 1.0, DeviceFace::Rear);
        let report = LayoutValidator::new(&layout).validate();
        assert!(report.is_valid(), "{}", report.format_message());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_collision_reported_once() {
        let mut layout = layout();
        place(&mut layout, "one-u", 5.0, DeviceFace::Front);
        place(&mut layout, "one-u", 5.0, DeviceFace::Both);
        let report = LayoutValidator::new(&layout).validate();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ValidationErrorKind::Collision);
        assert!(report.format_message().contains("[A] Collision"));
    }

    #[test]
    fn test_each_colliding_pair_reported_once() {
        let mut layout = layout();
        place(&mut layout, "one-u", 5.0, DeviceFace::Front);
        place(&mut layout, "one-u", 5.0, DeviceFace::Front);
        place(&mut layout, "one-u", 5.0, DeviceFace::Both);
        place(&mut layout, "one-u", 5.0, DeviceFace::Rear);
        let report = LayoutValidator::new(&layout).validate();

        // front/front, front/both (x2), both/rear
        let ids: Vec<_> = layout.racks[0].devices.iter().map(|d| d.id.clone()).collect();
        let reported_by = |i: usize| {
            report
                .errors
                .iter()
                .filter(|e| e.device_id.as_deref() == Some(ids[i].as_str()))
                .count()
        };
        assert_eq!(report.errors.len(), 4);
        assert_eq!((reported_by(0), reported_by(1), reported_by(2), reported_by(3)), (0, 1, 2, 1));
    }

    #[test]
    fn test_unknown_type_and_bounds() {
        let mut layout = layout();
        place(&mut layout, "ghost", 1.0, DeviceFace::Front);
        place(&mut layout, "deep", 12.0, DeviceFace::Both);
        let report = LayoutValidator::new(&layout).validate();
        assert!(report.has_error(ValidationErrorKind::UnknownDeviceType));
        assert!(report.has_error(ValidationErrorKind::OutOfBounds));
    }

    #[test]
    fn test_full_depth_single_face_warns() {
        let mut layout = layout();
        place(&mut layout, "deep", 1.0, DeviceFace::Front);
        let report = LayoutValidator::new(&layout).validate();
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_child_checks() {
        let mut layout = layout();
        let container_id = place(&mut layout, "chassis", 1.0, DeviceFace::Front);
        let rack = &mut layout.racks[0];
        rack.devices
            .push(PlacedDevice::new_child("blade", &container_id, "a", 0, DeviceFace::Front));
        rack.devices
            .push(PlacedDevice::new_child("blade", &container_id, "a", 3, DeviceFace::Front));
        rack.devices
            .push(PlacedDevice::new_child("blade", &container_id, "zz", 0, DeviceFace::Front));
        rack.devices
            .push(PlacedDevice::new_child("one-u", "nowhere", "a", 0, DeviceFace::Front));

        let report = LayoutValidator::new(&layout).validate();
        let mismatches = report
            .errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::ContainerMismatch)
            .count();
        assert_eq!(mismatches, 2);
        assert!(report.has_error(ValidationErrorKind::Collision));
    }

    #[test]
    fn test_group_checks() {
        let mut layout = layout();
        let short = Rack::new("B", 24, 19).unwrap();
        let a = layout.racks[0].id.clone();
        let b = short.id.clone();
        layout.racks.push(short);
        layout.rack_groups.push(RackGroup::new("Bay", LayoutPreset::Bayed, vec![a.clone(), b]));
        layout.rack_groups.push(RackGroup::new("Solo", LayoutPreset::Row, vec![a]));

        let report = LayoutValidator::new(&layout).validate();
        assert!(report.has_error(ValidationErrorKind::GroupHeightMismatch));
        assert!(report.has_error(ValidationErrorKind::GroupTooSmall));
        assert!(report.has_error(ValidationErrorKind::GroupMembership));
    }
}

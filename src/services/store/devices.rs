//! Recorded operations on placed devices.

use super::LayoutStore;
use crate::history::{Command, CommandAction};
use crate::models::device_type::find_device_type;
use crate::models::{
    do_faces_collide, do_slots_overlap, Colour, DeviceFace, DeviceType, PlacedDevice, Rack,
    SlotPosition,
};
use crate::services::errors::{MutationError, MutationResult};
use crate::units::{format_u, occupied_range, rack_max_position, rack_min_position, ranges_overlap};
use crate::validation::container::slot_siblings;
use crate::validation::{can_place_device, can_place_in_container, can_place_in_slot, find_collisions};
use tracing::debug;

/// Checks a rack-level placement and explains a rejection.
#[allow(clippy::too_many_arguments)]
pub(super) fn check_rack_placement(
    rack: &Rack,
    library: &[DeviceType],
    label: &str,
    height_u: f64,
    position: i32,
    exclude_index: Option<usize>,
    face: DeviceFace,
    slot: SlotPosition,
) -> MutationResult<()> {
    if can_place_device(rack, library, height_u, position, exclude_index, face, slot) {
        return Ok(());
    }

    let (_, top) = occupied_range(position, height_u);
    if position < rack_min_position() || top > rack_max_position(rack.height) {
        return Err(MutationError::OutOfBounds {
            device: label.to_string(),
            position: format_u(position),
            limit: format!("{}U rack '{}'", rack.height, rack.name),
        });
    }

    let blockers: Vec<String> = find_collisions(rack, library, height_u, position, exclude_index, face, slot)
        .into_iter()
        .map(|blocker| {
            blocker
                .label(find_device_type(library, &blocker.device_type))
                .to_string()
        })
        .collect();

    Err(MutationError::Collision {
        device: label.to_string(),
        position: format_u(position),
        blockers,
    })
}

/// Checks a placement inside a container slot and explains a rejection.
#[allow(clippy::too_many_arguments)]
pub(super) fn check_child_placement(
    rack: &Rack,
    library: &[DeviceType],
    container: &PlacedDevice,
    container_type: &DeviceType,
    child_type: &DeviceType,
    label: &str,
    slot_id: &str,
    position: i32,
    exclude_device_id: Option<&str>,
) -> MutationResult<()> {
    if can_place_in_container(
        rack,
        library,
        container,
        container_type,
        child_type,
        slot_id,
        position,
        exclude_device_id,
    ) {
        return Ok(());
    }

    let slot = container_type
        .get_slot(slot_id)
        .ok_or_else(|| MutationError::UnknownSlot(slot_id.to_string()))?;

    if !can_place_in_slot(child_type, slot) {
        return Err(MutationError::SlotMismatch {
            device: label.to_string(),
            slot_id: slot_id.to_string(),
        });
    }

    let candidate = occupied_range(position, child_type.u_height);
    if position < 0 || candidate.1 >= container_type.height_internal() {
        return Err(MutationError::OutOfBounds {
            device: label.to_string(),
            position: format!("slot offset {position}"),
            limit: format!("container '{}'", container.label(Some(container_type))),
        });
    }

    let blockers = slot_siblings(rack, &container.id, slot_id)
        .filter(|sibling| Some(sibling.id.as_str()) != exclude_device_id)
        .filter_map(|sibling| {
            let sibling_type = find_device_type(library, &sibling.device_type)?;
            ranges_overlap(candidate, occupied_range(sibling.position, sibling_type.u_height))
                .then(|| sibling.label(Some(sibling_type)).to_string())
        })
        .collect();

    Err(MutationError::Collision {
        device: label.to_string(),
        position: format!("slot '{slot_id}' offset {position}"),
        blockers,
    })
}

impl LayoutStore {
    /// Places a device of type `slug` at internal `position` in a rack.
    ///
    /// Full-depth types are stored on [`DeviceFace::Both`] whatever `face`
    /// says. Half-width types asked for [`SlotPosition::Full`] go on the left;
    /// full-width types always take the full width. Returns the new device id.
    pub fn place_device(
        &mut self,
        rack_id: &str,
        slug: &str,
        position: i32,
        face: DeviceFace,
        slot: SlotPosition,
    ) -> MutationResult<String> {
        let device_type = self.device_type(slug)?;
        let rack = self.rack(rack_id)?;
        let face = device_type.pinned_face(face);
        let slot = device_type.normalized_slot(slot);
        let label = device_type.display_name().to_string();

        check_rack_placement(
            rack,
            &self.layout.device_types,
            &label,
            device_type.u_height,
            position,
            None,
            face,
            slot,
        )?;

        let device = PlacedDevice::new(slug, position, face, slot);
        let device_id = device.id.clone();
        let index = rack.devices.len();
        debug!(rack_id, slug, position, %face, %slot, "place device");

        self.record(Command::new(
            format!("Place {label}"),
            CommandAction::AddDevice {
                rack_id: rack_id.to_string(),
                index,
                device,
            },
        ));
        Ok(device_id)
    }

    /// Places a device inside a slot of the container at `container_index`.
    ///
    /// `position` is in internal units from the container's bottom edge,
    /// starting at 0. The child takes the container's face. Returns the new
    /// device id.
    pub fn place_in_container(
        &mut self,
        rack_id: &str,
        container_index: usize,
        slug: &str,
        slot_id: &str,
        position: i32,
    ) -> MutationResult<String> {
        let rack = self.rack(rack_id)?;
        let container = self.device(rack_id, container_index)?;
        let container_type = self.device_type(&container.device_type)?;
        if !container_type.is_container() {
            return Err(MutationError::NotAContainer(self.label(container)));
        }
        if container.is_container_child() {
            return Err(MutationError::Invalid(format!(
                "'{}' is itself inside a container and cannot hold devices",
                self.label(container)
            )));
        }

        let child_type = self.device_type(slug)?;
        let label = child_type.display_name().to_string();
        check_child_placement(
            rack,
            &self.layout.device_types,
            container,
            container_type,
            child_type,
            &label,
            slot_id,
            position,
            None,
        )?;

        let device = PlacedDevice::new_child(slug, &container.id, slot_id, position, container.face);
        let device_id = device.id.clone();
        let index = rack.devices.len();
        let description = format!("Place {label} in {}", self.label(container));
        debug!(rack_id, slug, slot_id, position, container = %container.id, "place in container");

        self.record(Command::new(
            description,
            CommandAction::AddDevice {
                rack_id: rack_id.to_string(),
                index,
                device,
            },
        ));
        Ok(device_id)
    }

    /// Moves a device to a new internal position within its rack.
    ///
    /// Container children move within their slot, in container-relative units.
    pub fn move_device(&mut self, rack_id: &str, index: usize, position: i32) -> MutationResult<()> {
        let rack = self.rack(rack_id)?;
        let device = self.device(rack_id, index)?;
        if device.position == position {
            return Ok(());
        }

        let device_type = self.device_type(&device.device_type)?;
        let label = self.label(device);
        let library = &self.layout.device_types;

        if let Some(container_id) = &device.container_id {
            let (container, container_type) = self.container_of(rack, container_id)?;
            check_child_placement(
                rack,
                library,
                container,
                container_type,
                device_type,
                &label,
                device.slot_id.as_deref().unwrap_or_default(),
                position,
                Some(&device.id),
            )?;
        } else {
            check_rack_placement(
                rack,
                library,
                &label,
                device_type.u_height,
                position,
                Some(index),
                device.face,
                device.slot_position,
            )?;
        }

        let from = device.position;
        debug!(rack_id, index, from, to = position, "move device");
        self.record(Command::new(
            format!("Move {label}"),
            CommandAction::MoveDevice {
                rack_id: rack_id.to_string(),
                index,
                from,
                to: position,
            },
        ));
        Ok(())
    }

    /// Moves a rack-level device into another rack at internal `position`.
    ///
    /// A container travels with its children. The device is appended to the
    /// target rack's device list and keeps its id, face and slot.
    pub fn move_device_to_rack(
        &mut self,
        from_rack_id: &str,
        index: usize,
        to_rack_id: &str,
        position: i32,
    ) -> MutationResult<()> {
        if from_rack_id == to_rack_id {
            return self.move_device(from_rack_id, index, position);
        }

        let source = self.rack(from_rack_id)?;
        let target = self.rack(to_rack_id)?;
        let device = self.device(from_rack_id, index)?;
        let label = self.label(device);
        if device.is_container_child() {
            return Err(MutationError::Invalid(format!(
                "'{label}' sits inside a container; move the container instead"
            )));
        }

        let device_type = self.device_type(&device.device_type)?;
        check_rack_placement(
            target,
            &self.layout.device_types,
            &label,
            device_type.u_height,
            position,
            None,
            device.face,
            device.slot_position,
        )?;

        let children: Vec<(usize, PlacedDevice)> = source
            .children_of(&device.id)
            .map(|(i, child)| (i, child.clone()))
            .collect();

        let mut removed = children.iter().map(|(i, _)| *i).collect::<Vec<_>>();
        removed.push(index);
        let mut commands = self.removal_commands(from_rack_id, source, removed);

        let mut moved = device.clone();
        moved.position = position;
        let first = target.devices.len();
        commands.push(Command::new(
            format!("Add {label}"),
            CommandAction::AddDevice {
                rack_id: to_rack_id.to_string(),
                index: first,
                device: moved,
            },
        ));
        for (offset, (_, child)) in children.into_iter().enumerate() {
            commands.push(Command::new(
                format!("Add {}", self.label(&child)),
                CommandAction::AddDevice {
                    rack_id: to_rack_id.to_string(),
                    index: first + 1 + offset,
                    device: child,
                },
            ));
        }

        let description = format!("Move {label} to {}", target.name);
        debug!(from_rack_id, to_rack_id, index, position, "move device to rack");
        self.record(Command::batch(description, commands));
        Ok(())
    }

    /// Removes a device; a container takes its children with it.
    pub fn remove_device(&mut self, rack_id: &str, index: usize) -> MutationResult<()> {
        let rack = self.rack(rack_id)?;
        let device = self.device(rack_id, index)?;
        let label = self.label(device);

        let mut removed: Vec<usize> = rack.children_of(&device.id).map(|(i, _)| i).collect();
        removed.push(index);
        let mut commands = self.removal_commands(rack_id, rack, removed);

        debug!(rack_id, index, count = commands.len(), "remove device");
        let command = if commands.len() == 1 {
            commands.remove(0)
        } else {
            Command::batch(format!("Remove {label}"), commands)
        };
        self.record(command);
        Ok(())
    }

    /// Changes which face a device occupies.
    ///
    /// Full-depth devices stay on both faces. Narrowing from both faces to one
    /// cannot collide and skips validation. Children follow their container.
    pub fn update_device_face(&mut self, rack_id: &str, index: usize, face: DeviceFace) -> MutationResult<()> {
        let rack = self.rack(rack_id)?;
        let device = self.device(rack_id, index)?;
        let label = self.label(device);
        if device.is_container_child() {
            return Err(MutationError::Invalid(format!(
                "'{label}' takes its face from its container"
            )));
        }

        let device_type = self.device_type(&device.device_type)?;
        let face = device_type.pinned_face(face);
        if face == device.face {
            return Ok(());
        }

        if device.face != DeviceFace::Both {
            check_rack_placement(
                rack,
                &self.layout.device_types,
                &label,
                device_type.u_height,
                device.position,
                Some(index),
                face,
                device.slot_position,
            )?;
        }

        let mut commands = vec![Command::new(
            format!("Set {label} face"),
            CommandAction::SetDeviceFace {
                rack_id: rack_id.to_string(),
                index,
                from: device.face,
                to: face,
            },
        )];
        commands.extend(
            rack.children_of(&device.id)
                .filter(|(_, child)| child.face != face)
                .map(|(child_index, child)| {
                    Command::new(
                        format!("Set {} face", self.label(child)),
                        CommandAction::SetDeviceFace {
                            rack_id: rack_id.to_string(),
                            index: child_index,
                            from: child.face,
                            to: face,
                        },
                    )
                }),
        );

        debug!(rack_id, index, %face, "update device face");
        let description = format!("Set {label} face to {face}");
        let command = if commands.len() == 1 {
            let mut command = commands.remove(0);
            command.description = description;
            command
        } else {
            Command::batch(description, commands)
        };
        self.record(command);
        Ok(())
    }

    /// Switches a half-width device between left and right at the same height.
    pub fn update_device_slot(&mut self, rack_id: &str, index: usize, slot: SlotPosition) -> MutationResult<()> {
        let rack = self.rack(rack_id)?;
        let device = self.device(rack_id, index)?;
        let label = self.label(device);
        if device.is_container_child() {
            return Err(MutationError::Invalid(format!(
                "'{label}' is positioned by its container slot"
            )));
        }

        let device_type = self.device_type(&device.device_type)?;
        let slot = device_type.normalized_slot(slot);
        if slot == device.slot_position {
            return Ok(());
        }

        // Same-U neighbour on that side; only a face it shares can block
        let side_taken = rack.devices.iter().enumerate().any(|(i, other)| {
            i != index
                && !other.is_container_child()
                && other.position == device.position
                && do_slots_overlap(slot, other.slot_position)
                && do_faces_collide(device.face, other.face)
        });
        if side_taken {
            return Err(MutationError::SlotOccupied {
                device: label,
                slot: slot.to_string(),
            });
        }
        check_rack_placement(
            rack,
            &self.layout.device_types,
            &label,
            device_type.u_height,
            device.position,
            Some(index),
            device.face,
            slot,
        )?;

        debug!(rack_id, index, %slot, "update device slot");
        let from = device.slot_position;
        self.record(Command::new(
            format!("Move {label} to {slot} side"),
            CommandAction::SetDeviceSlot {
                rack_id: rack_id.to_string(),
                index,
                from,
                to: slot,
            },
        ));
        Ok(())
    }

    /// Sets or clears a device's display name. Blank names clear it.
    pub fn update_device_name(&mut self, rack_id: &str, index: usize, name: Option<String>) -> MutationResult<()> {
        let device = self.device(rack_id, index)?;
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if let Some(n) = &name {
            if n.len() > 100 {
                return Err(MutationError::Invalid(format!(
                    "Device name exceeds maximum length of 100 characters (got {})",
                    n.len()
                )));
            }
        }
        if name == device.name {
            return Ok(());
        }

        let label = self.label(device);
        let from = device.name.clone();
        debug!(rack_id, index, name = ?name, "update device name");
        self.record(Command::new(
            format!("Rename {label}"),
            CommandAction::SetDeviceName {
                rack_id: rack_id.to_string(),
                index,
                from,
                to: name,
            },
        ));
        Ok(())
    }

    /// Sets or clears a device's colour override.
    pub fn update_device_colour(&mut self, rack_id: &str, index: usize, colour: Option<Colour>) -> MutationResult<()> {
        let device = self.device(rack_id, index)?;
        if colour == device.colour {
            return Ok(());
        }

        let label = self.label(device);
        let from = device.colour;
        debug!(rack_id, index, colour = ?colour, "update device colour");
        self.record(Command::new(
            format!("Recolour {label}"),
            CommandAction::SetDeviceColour {
                rack_id: rack_id.to_string(),
                index,
                from,
                to: colour,
            },
        ));
        Ok(())
    }

    /// Sets or clears a device's notes. Blank notes clear them.
    pub fn update_device_notes(&mut self, rack_id: &str, index: usize, notes: Option<String>) -> MutationResult<()> {
        let device = self.device(rack_id, index)?;
        let notes = notes.filter(|n| !n.trim().is_empty());
        if notes == device.notes {
            return Ok(());
        }

        let label = self.label(device);
        let from = device.notes.clone();
        debug!(rack_id, index, "update device notes");
        self.record(Command::new(
            format!("Edit notes for {label}"),
            CommandAction::SetDeviceNotes {
                rack_id: rack_id.to_string(),
                index,
                from,
                to: notes,
            },
        ));
        Ok(())
    }

    /// Finds a child's container and its type.
    fn container_of<'a>(
        &'a self,
        rack: &'a Rack,
        container_id: &str,
    ) -> MutationResult<(&'a PlacedDevice, &'a DeviceType)> {
        let container = rack
            .devices
            .iter()
            .find(|d| d.id == container_id)
            .ok_or_else(|| MutationError::Invalid(format!("Container '{container_id}' not found")))?;
        let container_type = self.device_type(&container.device_type)?;
        Ok((container, container_type))
    }

    /// Builds removal commands for `indices`, highest index first.
    pub(super) fn removal_commands(&self, rack_id: &str, rack: &Rack, mut indices: Vec<usize>) -> Vec<Command> {
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();
        indices
            .into_iter()
            .filter_map(|index| rack.devices.get(index).map(|device| (index, device)))
            .map(|(index, device)| {
                Command::new(
                    format!("Remove {}", self.label(device)),
                    CommandAction::RemoveDevice {
                        rack_id: rack_id.to_string(),
                        index,
                        device: device.clone(),
                    },
                )
            })
            .collect()
    }
}

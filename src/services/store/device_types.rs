//! Recorded operations on the device type library.

use super::devices::{check_child_placement, check_rack_placement};
use super::LayoutStore;
use crate::history::{Command, CommandAction};
use crate::models::device_type::find_device_type;
use crate::models::DeviceType;
use crate::services::errors::{MutationError, MutationResult};
use tracing::debug;

impl LayoutStore {
    /// Adds a device type to the library.
    pub fn add_device_type(&mut self, device_type: DeviceType) -> MutationResult<()> {
        device_type.validate()?;
        if self.layout.get_device_type(&device_type.slug).is_some() {
            return Err(MutationError::DuplicateDeviceType(device_type.slug));
        }

        debug!(slug = %device_type.slug, height = device_type.u_height, "add device type");
        let description = format!("Add device type {}", device_type.display_name());
        let index = self.layout.device_types.len();
        self.record(Command::new(
            description,
            CommandAction::AddDeviceType { index, device_type },
        ));
        Ok(())
    }

    /// Replaces the definition of an existing device type.
    ///
    /// Every placement of the type, and every child of its containers, must
    /// still fit under the new definition. Placements are re-pinned to both
    /// faces when the type becomes full depth, and moved to the left half
    /// when it becomes half width.
    pub fn update_device_type(&mut self, device_type: DeviceType) -> MutationResult<()> {
        device_type.validate()?;
        let before = self.device_type(&device_type.slug)?.clone();
        if before == device_type {
            return Ok(());
        }

        let slug = device_type.slug.as_str();
        let mut library = self.layout.device_types.clone();
        if let Some(index) = self.layout.device_type_index(slug) {
            library[index] = device_type.clone();
        }

        let mut commands = Vec::new();
        for rack in &self.layout.racks {
            for (index, device) in rack.devices.iter().enumerate() {
                let label = device
                    .label(find_device_type(&library, &device.device_type))
                    .to_string();

                if let (Some(container_id), Some(slot_id)) = (&device.container_id, &device.slot_id) {
                    let Some(container) = rack.devices.iter().find(|d| &d.id == container_id) else {
                        continue;
                    };
                    if device.device_type != slug && container.device_type != slug {
                        continue;
                    }
                    let (Some(container_type), Some(child_type)) = (
                        find_device_type(&library, &container.device_type),
                        find_device_type(&library, &device.device_type),
                    ) else {
                        continue;
                    };
                    check_child_placement(
                        rack,
                        &library,
                        container,
                        container_type,
                        child_type,
                        &label,
                        slot_id,
                        device.position,
                        Some(&device.id),
                    )?;
                    continue;
                }

                if device.device_type != slug {
                    continue;
                }

                let face = device_type.pinned_face(device.face);
                let slot = device_type.normalized_slot(device.slot_position);
                check_rack_placement(
                    rack,
                    &library,
                    &label,
                    device_type.u_height,
                    device.position,
                    Some(index),
                    face,
                    slot,
                )?;

                if face != device.face {
                    commands.push(Command::new(
                        format!("Set {label} face"),
                        CommandAction::SetDeviceFace {
                            rack_id: rack.id.clone(),
                            index,
                            from: device.face,
                            to: face,
                        },
                    ));
                }
                if slot != device.slot_position {
                    commands.push(Command::new(
                        format!("Set {label} slot"),
                        CommandAction::SetDeviceSlot {
                            rack_id: rack.id.clone(),
                            index,
                            from: device.slot_position,
                            to: slot,
                        },
                    ));
                }
            }
        }

        let description = format!("Edit device type {}", device_type.display_name());
        debug!(slug, adjusted = commands.len(), "update device type");
        commands.insert(
            0,
            Command::new(
                description.clone(),
                CommandAction::UpdateDeviceType {
                    before,
                    after: device_type,
                },
            ),
        );

        let command = if commands.len() == 1 {
            commands.remove(0)
        } else {
            Command::batch(description, commands)
        };
        self.record(command);
        Ok(())
    }

    /// Deletes a device type and every placement of it, across all racks.
    ///
    /// Children of removed containers go too. Returns the number of
    /// placements removed. One undo restores everything.
    pub fn delete_device_type(&mut self, slug: &str) -> MutationResult<usize> {
        let index = self
            .layout
            .device_type_index(slug)
            .ok_or_else(|| MutationError::UnknownDeviceType(slug.to_string()))?;
        let device_type = self.layout.device_types[index].clone();

        let mut commands = Vec::new();
        for rack in &self.layout.racks {
            let mut doomed: Vec<usize> = Vec::new();
            for (i, device) in rack.devices.iter().enumerate() {
                if device.device_type == slug {
                    doomed.push(i);
                    doomed.extend(rack.children_of(&device.id).map(|(child, _)| child));
                }
            }
            commands.extend(self.removal_commands(&rack.id, rack, doomed));
        }

        let removed = commands.len();
        let description = format!("Delete device type {}", device_type.display_name());
        debug!(slug, removed, "delete device type");
        commands.push(Command::new(
            description.clone(),
            CommandAction::RemoveDeviceType { index, device_type },
        ));

        let command = if commands.len() == 1 {
            commands.remove(0)
        } else {
            Command::batch(description, commands)
        };
        self.record(command);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceFace, Slot, SlotPosition};
    use crate::units::to_internal;

    fn store() -> (LayoutStore, String, String) {
        let mut store = LayoutStore::new();
        let rack_a = store.add_rack("A", 12, 19).unwrap();
        let rack_b = store.add_rack("B", 12, 19).unwrap();
        store.add_device_type(DeviceType::new("server", 1.0).unwrap()).unwrap();
        store.add_device_type(DeviceType::new("switch", 1.0).unwrap()).unwrap();
        (store, rack_a, rack_b)
    }

    #[test]
    fn test_add_rejects_duplicates_and_invalid() {
        let (mut store, _, _) = store();
        assert_eq!(
            store.add_device_type(DeviceType::new("server", 2.0).unwrap()).unwrap_err(),
            MutationError::DuplicateDeviceType("server".into())
        );

        let mut bad = DeviceType::new("odd", 1.0).unwrap();
        bad.u_height = 0.0;
        assert!(matches!(
            store.add_device_type(bad).unwrap_err(),
            MutationError::Invalid(_)
        ));
        assert_eq!(store.layout().device_types.len(), 2);
    }

    #[test]
    fn test_delete_cascades_across_racks() {
        let (mut store, rack_a, rack_b) = store();
        for (rack, u) in [(&rack_a, 1.0), (&rack_a, 3.0), (&rack_b, 1.0)] {
            store
                .place_device(rack, "server", to_internal(u), DeviceFace::Front, SlotPosition::Full)
                .unwrap();
        }
        store
            .place_device(&rack_a, "switch", to_internal(2.0), DeviceFace::Front, SlotPosition::Full)
            .unwrap();
        let before = store.layout().clone();

        assert_eq!(store.delete_device_type("server").unwrap(), 3);
        assert!(store.layout().get_device_type("server").is_none());
        assert_eq!(store.layout().placement_count("server"), 0);
        assert_eq!(store.layout().racks[0].devices.len(), 1);

        assert!(store.undo());
        assert_eq!(store.layout(), &before);
    }

    #[test]
    fn test_delete_unknown() {
        let (mut store, _, _) = store();
        assert_eq!(
            store.delete_device_type("nope").unwrap_err(),
            MutationError::UnknownDeviceType("nope".into())
        );
    }

    #[test]
    fn test_resize_rejected_when_it_collides() {
        let (mut store, rack_a, _) = store();
        store
            .place_device(&rack_a, "server", to_internal(1.0), DeviceFace::Front, SlotPosition::Full)
            .unwrap();
        store
            .place_device(&rack_a, "switch", to_internal(2.0), DeviceFace::Front, SlotPosition::Full)
            .unwrap();

        let mut taller = store.layout().get_device_type("server").unwrap().clone();
        taller.u_height = 2.0;
        let err = store.update_device_type(taller).unwrap_err();
        assert!(matches!(err, MutationError::Collision { .. }));
        assert_eq!(store.layout().get_device_type("server").unwrap().u_height, 1.0);
    }

    #[test]
    fn test_full_depth_update_repins_faces() {
        let (mut store, rack_a, _) = store();
        store
            .place_device(&rack_a, "server", to_internal(1.0), DeviceFace::Rear, SlotPosition::Full)
            .unwrap();

        let deep = store.layout().get_device_type("server").unwrap().clone().full_depth();
        store.update_device_type(deep).unwrap();
        assert_eq!(store.layout().racks[0].devices[0].face, DeviceFace::Both);

        store.undo();
        assert_eq!(store.layout().racks[0].devices[0].face, DeviceFace::Rear);
        assert!(!store.layout().get_device_type("server").unwrap().is_full_depth);
    }

    #[test]
    fn test_shrinking_container_slot_rejected() {
        let (mut store, rack_a, _) = store();
        store
            .add_device_type(
                DeviceType::new("chassis", 2.0)
                    .unwrap()
                    .with_slot(Slot::new("bay", 1.0, 2.0)),
            )
            .unwrap();
        store
            .place_device(&rack_a, "chassis", to_internal(1.0), DeviceFace::Front, SlotPosition::Full)
            .unwrap();
        store.place_in_container(&rack_a, 0, "server", "bay", 0).unwrap();

        let narrow = DeviceType::new("chassis", 2.0)
            .unwrap()
            .with_slot(Slot::new("bay", 0.5, 2.0));
        let err = store.update_device_type(narrow).unwrap_err();
        assert!(matches!(err, MutationError::SlotMismatch { .. }));
    }
}

//! Reversible layout commands.
//!
//! Each [`Command`] captures just enough state to apply and revert itself
//! through the raw setters. Destructive actions keep a full clone of what
//! they removed plus its original index, so undo restores it in place.

use crate::models::{Colour, DeviceFace, DeviceType, Layout, PlacedDevice, Rack, RackGroup, RackProperties, SlotPosition};
use crate::services::raw;
use chrono::{DateTime, Utc};

/// The state change performed by a command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandAction {
    /// Insert a device into a rack.
    AddDevice {
        /// Target rack
        rack_id: String,
        /// Insertion index
        index: usize,
        /// Device to insert
        device: PlacedDevice,
    },
    /// Remove a device from a rack.
    RemoveDevice {
        /// Target rack
        rack_id: String,
        /// Index of the removed device
        index: usize,
        /// Snapshot of the removed device
        device: PlacedDevice,
    },
    /// Change a device's position.
    MoveDevice {
        /// Target rack
        rack_id: String,
        /// Device index
        index: usize,
        /// Position before
        from: i32,
        /// Position after
        to: i32,
    },
    /// Change a device's face.
    SetDeviceFace {
        /// Target rack
        rack_id: String,
        /// Device index
        index: usize,
        /// Face before
        from: DeviceFace,
        /// Face after
        to: DeviceFace,
    },
    /// Change a device's horizontal slot.
    SetDeviceSlot {
        /// Target rack
        rack_id: String,
        /// Device index
        index: usize,
        /// Slot before
        from: SlotPosition,
        /// Slot after
        to: SlotPosition,
    },
    /// Change a device's name override.
    SetDeviceName {
        /// Target rack
        rack_id: String,
        /// Device index
        index: usize,
        /// Name before
        from: Option<String>,
        /// Name after
        to: Option<String>,
    },
    /// Change a device's colour override.
    SetDeviceColour {
        /// Target rack
        rack_id: String,
        /// Device index
        index: usize,
        /// Colour before
        from: Option<Colour>,
        /// Colour after
        to: Option<Colour>,
    },
    /// Change a device's notes.
    SetDeviceNotes {
        /// Target rack
        rack_id: String,
        /// Device index
        index: usize,
        /// Notes before
        from: Option<String>,
        /// Notes after
        to: Option<String>,
    },
    /// Add a device type to the library.
    AddDeviceType {
        /// Library index
        index: usize,
        /// New type
        device_type: DeviceType,
    },
    /// Replace a device type definition.
    UpdateDeviceType {
        /// Definition before
        before: DeviceType,
        /// Definition after
        after: DeviceType,
    },
    /// Remove a device type from the library.
    RemoveDeviceType {
        /// Library index of the removed type
        index: usize,
        /// Snapshot of the removed type
        device_type: DeviceType,
    },
    /// Insert a rack.
    AddRack {
        /// Rack list index
        index: usize,
        /// New rack
        rack: Rack,
    },
    /// Remove a rack.
    RemoveRack {
        /// Rack list index of the removed rack
        index: usize,
        /// Snapshot of the removed rack, devices included
        rack: Rack,
    },
    /// Change rack properties.
    UpdateRack {
        /// Target rack
        rack_id: String,
        /// Properties before
        before: RackProperties,
        /// Properties after
        after: RackProperties,
    },
    /// Insert a rack group.
    AddGroup {
        /// Group list index
        index: usize,
        /// New group
        group: RackGroup,
    },
    /// Remove a rack group.
    RemoveGroup {
        /// Group list index of the removed group
        index: usize,
        /// Snapshot of the removed group
        group: RackGroup,
    },
    /// Replace a group's member list.
    SetGroupMembers {
        /// Target group
        group_id: String,
        /// Members before
        from: Vec<String>,
        /// Members after
        to: Vec<String>,
    },
    /// Rename a group.
    RenameGroup {
        /// Target group
        group_id: String,
        /// Name before
        from: String,
        /// Name after
        to: String,
    },
    /// Several commands applied as one undo step.
    Batch(Vec<Command>),
}

/// A reversible, described, timestamped unit of mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Human-readable summary for undo/redo menus
    pub description: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// What the command does
    pub action: CommandAction,
}

impl Command {
    /// Creates a command stamped with the current time.
    pub fn new(description: impl Into<String>, action: CommandAction) -> Self {
        Self {
            description: description.into(),
            timestamp: Utc::now(),
            action,
        }
    }

    /// Groups several commands into one undo step.
    ///
    /// Children run in order on execute and in reverse order on undo.
    pub fn batch(description: impl Into<String>, commands: Vec<Self>) -> Self {
        Self::new(description, CommandAction::Batch(commands))
    }

    /// Returns true if this is a batch command.
    #[must_use]
    pub const fn is_batch(&self) -> bool {
        matches!(self.action, CommandAction::Batch(_))
    }

    /// Applies the command.
    pub fn execute(&self, layout: &mut Layout) {
        use CommandAction as A;

        match &self.action {
            A::AddDevice { rack_id, index, device } => {
                raw::place_device_raw(layout, rack_id, *index, device.clone());
            }
            A::RemoveDevice { rack_id, index, .. } => {
                raw::remove_device_at_index_raw(layout, rack_id, *index);
            }
            A::MoveDevice { rack_id, index, to, .. } => {
                raw::move_device_raw(layout, rack_id, *index, *to);
            }
            A::SetDeviceFace { rack_id, index, to, .. } => {
                raw::update_device_face_raw(layout, rack_id, *index, *to);
            }
            A::SetDeviceSlot { rack_id, index, to, .. } => {
                raw::update_device_slot_raw(layout, rack_id, *index, *to);
            }
            A::SetDeviceName { rack_id, index, to, .. } => {
                raw::update_device_name_raw(layout, rack_id, *index, to.clone());
            }
            A::SetDeviceColour { rack_id, index, to, .. } => {
                raw::update_device_colour_raw(layout, rack_id, *index, *to);
            }
            A::SetDeviceNotes { rack_id, index, to, .. } => {
                raw::update_device_notes_raw(layout, rack_id, *index, to.clone());
            }
            A::AddDeviceType { index, device_type } => {
                raw::add_device_type_raw(layout, *index, device_type.clone());
            }
            A::UpdateDeviceType { after, .. } => {
                raw::replace_device_type_raw(layout, after.clone());
            }
            A::RemoveDeviceType { device_type, .. } => {
                raw::remove_device_type_raw(layout, &device_type.slug);
            }
            A::AddRack { index, rack } => raw::insert_rack_raw(layout, *index, rack.clone()),
            A::RemoveRack { rack, .. } => {
                raw::remove_rack_raw(layout, &rack.id);
            }
            A::UpdateRack { rack_id, after, .. } => {
                raw::update_rack_raw(layout, rack_id, after);
            }
            A::AddGroup { index, group } => raw::insert_rack_group_raw(layout, *index, group.clone()),
            A::RemoveGroup { group, .. } => {
                raw::remove_rack_group_raw(layout, &group.id);
            }
            A::SetGroupMembers { group_id, to, .. } => {
                raw::set_group_members_raw(layout, group_id, to.clone());
            }
            A::RenameGroup { group_id, to, .. } => {
                raw::rename_rack_group_raw(layout, group_id, to.clone());
            }
            A::Batch(commands) => {
                for command in commands {
                    command.execute(layout);
                }
            }
        }
    }

    /// Reverts the command.
    pub fn undo(&self, layout: &mut Layout) {
        use CommandAction as A;

        match &self.action {
            A::AddDevice { rack_id, index, .. } => {
                raw::remove_device_at_index_raw(layout, rack_id, *index);
            }
            A::RemoveDevice { rack_id, index, device } => {
                raw::place_device_raw(layout, rack_id, *index, device.clone());
            }
            A::MoveDevice { rack_id, index, from, .. } => {
                raw::move_device_raw(layout, rack_id, *index, *from);
            }
            A::SetDeviceFace { rack_id, index, from, .. } => {
                raw::update_device_face_raw(layout, rack_id, *index, *from);
            }
            A::SetDeviceSlot { rack_id, index, from, .. } => {
                raw::update_device_slot_raw(layout, rack_id, *index, *from);
            }
            A::SetDeviceName { rack_id, index, from, .. } => {
                raw::update_device_name_raw(layout, rack_id, *index, from.clone());
            }
            A::SetDeviceColour { rack_id, index, from, .. } => {
                raw::update_device_colour_raw(layout, rack_id, *index, *from);
            }
            A::SetDeviceNotes { rack_id, index, from, .. } => {
                raw::update_device_notes_raw(layout, rack_id, *index, from.clone());
            }
            A::AddDeviceType { device_type, .. } => {
                raw::remove_device_type_raw(layout, &device_type.slug);
            }
            A::UpdateDeviceType { before, .. } => {
                raw::replace_device_type_raw(layout, before.clone());
            }
            A::RemoveDeviceType { index, device_type } => {
                raw::add_device_type_raw(layout, *index, device_type.clone());
            }
            A::AddRack { rack, .. } => {
                raw::remove_rack_raw(layout, &rack.id);
            }
            A::RemoveRack { index, rack } => raw::insert_rack_raw(layout, *index, rack.clone()),
            A::UpdateRack { rack_id, before, .. } => {
                raw::update_rack_raw(layout, rack_id, before);
            }
            A::AddGroup { group, .. } => {
                raw::remove_rack_group_raw(layout, &group.id);
            }
            A::RemoveGroup { index, group } => {
                raw::insert_rack_group_raw(layout, *index, group.clone());
            }
            A::SetGroupMembers { group_id, from, .. } => {
                raw::set_group_members_raw(layout, group_id, from.clone());
            }
            A::RenameGroup { group_id, from, .. } => {
                raw::rename_rack_group_raw(layout, group_id, from.clone());
            }
            A::Batch(commands) => {
                for command in commands.iter().rev() {
                    command.undo(layout);
                }
            }
        }
    }
}

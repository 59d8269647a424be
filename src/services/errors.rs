//! Errors returned by recorded layout operations.

use std::fmt;

/// Why a recorded operation was rejected.
///
/// `Display` produces the user-facing message. A rejected operation never
/// changes the layout or the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// The block overlaps existing devices.
    Collision {
        /// Label of the device being placed or moved
        device: String,
        /// Target position label (e.g. "U5")
        position: String,
        /// Labels of every blocking device
        blockers: Vec<String>,
    },
    /// The block does not fit inside the rack or container.
    OutOfBounds {
        /// Label of the device
        device: String,
        /// Target position label
        position: String,
        /// Height of the rack or container in U
        limit: String,
    },
    /// The device does not fit a container slot (width, height, or category).
    SlotMismatch {
        /// Label of the child device
        device: String,
        /// Slot id
        slot_id: String,
    },
    /// The half-width side is already taken at this position.
    SlotOccupied {
        /// Label of the device
        device: String,
        /// Requested side
        slot: String,
    },
    /// Slug not in the device library.
    UnknownDeviceType(String),
    /// Rack id not in the layout.
    UnknownRack(String),
    /// Group id not in the layout.
    UnknownGroup(String),
    /// No device at this index.
    UnknownDevice {
        /// Rack id
        rack_id: String,
        /// Requested index
        index: usize,
    },
    /// Slot id not defined on the container type.
    UnknownSlot(String),
    /// The target device has no slots.
    NotAContainer(String),
    /// Slug already in the device library.
    DuplicateDeviceType(String),
    /// Rack height differs from its bayed group.
    GroupHeightMismatch {
        /// Group name
        group: String,
        /// Height shared by the group
        group_height: u32,
        /// Height of the offending rack
        rack_height: u32,
    },
    /// Height change on a rack that belongs to a bayed group.
    BayedHeightLocked {
        /// Rack name
        rack: String,
        /// Group name
        group: String,
    },
    /// Group would have fewer than two members.
    GroupTooSmall {
        /// Member count
        count: usize,
    },
    /// Rack already belongs to a group.
    RackAlreadyGrouped {
        /// Rack name
        rack: String,
        /// Group name
        group: String,
    },
    /// Rack is not a member of the group.
    NotInGroup {
        /// Rack name
        rack: String,
        /// Group name
        group: String,
    },
    /// Field-level validation failure.
    Invalid(String),
}

impl fmt::Display for MutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collision { device, position, blockers } => {
                let names = blockers
                    .iter()
                    .map(|b| format!("'{b}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Cannot place '{device}' at {position}: blocked by {names}")
            }
            Self::OutOfBounds { device, position, limit } => {
                write!(f, "Cannot place '{device}' at {position}: it does not fit within {limit}")
            }
            Self::SlotMismatch { device, slot_id } => {
                write!(f, "'{device}' does not fit slot '{slot_id}' (width, height, or category)")
            }
            Self::SlotOccupied { device, slot } => {
                write!(f, "Cannot move '{device}' to the {slot} side: it is already occupied")
            }
            Self::UnknownDeviceType(slug) => write!(f, "Device type '{slug}' not found"),
            Self::UnknownRack(id) => write!(f, "Rack '{id}' not found"),
            Self::UnknownGroup(id) => write!(f, "Rack group '{id}' not found"),
            Self::UnknownDevice { rack_id, index } => {
                write!(f, "No device at index {index} in rack '{rack_id}'")
            }
            Self::UnknownSlot(id) => write!(f, "Slot '{id}' not found on container"),
            Self::NotAContainer(name) => write!(f, "'{name}' has no slots to hold devices"),
            Self::DuplicateDeviceType(slug) => write!(f, "Device type '{slug}' already exists"),
            Self::GroupHeightMismatch { group, group_height, rack_height } => write!(
                f,
                "Rack height {rack_height}U does not match bayed group '{group}' height {group_height}U"
            ),
            Self::BayedHeightLocked { rack, group } => write!(
                f,
                "Cannot change height of '{rack}': it is part of bayed group '{group}'"
            ),
            Self::GroupTooSmall { count } => {
                write!(f, "A rack group needs at least 2 racks, got {count}")
            }
            Self::RackAlreadyGrouped { rack, group } => {
                write!(f, "Rack '{rack}' already belongs to group '{group}'")
            }
            Self::NotInGroup { rack, group } => {
                write!(f, "Rack '{rack}' is not a member of group '{group}'")
            }
            Self::Invalid(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for MutationError {}

impl From<anyhow::Error> for MutationError {
    fn from(error: anyhow::Error) -> Self {
        Self::Invalid(error.to_string())
    }
}

/// Result of a recorded operation.
pub type MutationResult<T> = Result<T, MutationError>;

//! Placement validation.
//!
//! - [`placement`]: rack-level geometry and collision checks
//! - [`container`]: checks for children inside container slots
//! - [`report`]: audit of an entire loaded layout

pub mod container;
pub mod placement;
pub mod report;

pub use container::{can_place_in_container, can_place_in_slot};
pub use placement::{
    can_place_device, find_collisions, find_valid_drop_positions, is_slot_occupied,
    snap_to_nearest_valid_position, snap_to_nearest_valid_position_for,
};
pub use report::{LayoutValidator, ValidationReport};

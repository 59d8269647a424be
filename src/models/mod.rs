//! Data models for rack layouts, devices, and device types.
//!
//! Models are plain serde structures independent of validation and history.

pub mod colour;
pub mod custom_fields;
pub mod device_type;
pub mod layout;
pub mod placed_device;
pub mod rack;

pub use colour::Colour;
pub use custom_fields::{CustomFields, FieldValue};
pub use device_type::{DeviceCategory, DeviceType, Slot};
pub use layout::{DisplayMode, Layout, LayoutSettings};
pub use placed_device::{
    do_faces_collide, do_slots_overlap, DeviceFace, PlacedDevice, PlacementImages, SlotPosition,
};
pub use rack::{LayoutPreset, Rack, RackGroup, RackProperties};

//! Shared test fixtures for integration and E2E CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use rackplan::models::{
    DeviceCategory, DeviceFace, DeviceType, Layout, LayoutPreset, PlacedDevice, Rack, RackGroup,
    Slot, SlotPosition,
};
use rackplan::services::LayoutService;
use rackplan::units::to_internal;
use std::path::PathBuf;
use tempfile::TempDir;

/// Device library used across tests.
///
/// - `server-2u`: 2U, half depth, full width
/// - `switch-1u`: 1U, half depth, full width
/// - `ups-2u`: 2U, full depth
/// - `patch-half`: 1U, half width
/// - `blade`: 1U, half width, server category
/// - `chassis-2u`: 2U container with two half-width 2U bays
pub fn test_library() -> Vec<DeviceType> {
    vec![
        DeviceType::new("server-2u", 2.0)
            .unwrap()
            .with_model("PowerEdge R740")
            .with_category(DeviceCategory::Server),
        DeviceType::new("switch-1u", 1.0)
            .unwrap()
            .with_model("Core Switch")
            .with_category(DeviceCategory::Network),
        DeviceType::new("ups-2u", 2.0)
            .unwrap()
            .full_depth()
            .with_category(DeviceCategory::Power),
        DeviceType::new("patch-half", 1.0).unwrap().half_width(),
        DeviceType::new("blade", 1.0)
            .unwrap()
            .half_width()
            .with_category(DeviceCategory::Server),
        DeviceType::new("chassis-2u", 2.0)
            .unwrap()
            .with_slot(Slot::new("bay-1", 0.5, 2.0))
            .with_slot(Slot::new("bay-2", 0.5, 2.0)),
    ]
}

/// Empty layout with one rack of `height` U and the test library.
pub fn test_layout_single_rack(height: u32) -> Layout {
    let mut layout = Layout::new("Test Layout").unwrap();
    layout.racks.push(Rack::new("Rack A", height, 19).unwrap());
    layout.device_types = test_library();
    layout
}

/// Layout with a few non-overlapping devices in a 12U rack.
pub fn test_layout_populated() -> Layout {
    let mut layout = test_layout_single_rack(12);
    let rack = &mut layout.racks[0];
    rack.devices.push(
        PlacedDevice::new("server-2u", to_internal(1.0), DeviceFace::Front, SlotPosition::Full)
            .with_name("web-01"),
    );
    rack.devices.push(PlacedDevice::new(
        "switch-1u",
        to_internal(12.0),
        DeviceFace::Front,
        SlotPosition::Full,
    ));
    rack.devices.push(PlacedDevice::new(
        "ups-2u",
        to_internal(3.0),
        DeviceFace::Both,
        SlotPosition::Full,
    ));
    layout
}

/// Layout whose first rack holds two overlapping front devices.
pub fn test_layout_with_collision() -> Layout {
    let mut layout = test_layout_populated();
    layout.racks[0].devices.push(
        PlacedDevice::new("switch-1u", to_internal(2.0), DeviceFace::Front, SlotPosition::Full)
            .with_name("intruder"),
    );
    layout
}

/// Layout with a full-depth device stored on a single face (warning only).
pub fn test_layout_with_warning() -> Layout {
    let mut layout = test_layout_single_rack(12);
    layout.racks[0].devices.push(PlacedDevice::new(
        "ups-2u",
        to_internal(1.0),
        DeviceFace::Front,
        SlotPosition::Full,
    ));
    layout
}

/// Two 42U racks in a bayed group plus a loose 24U rack.
pub fn test_layout_bayed() -> Layout {
    let mut layout = Layout::new("Bayed").unwrap();
    let a = Rack::new("Bay 1", 42, 19).unwrap();
    let b = Rack::new("Bay 2", 42, 19).unwrap();
    let c = Rack::new("Short", 24, 19).unwrap();
    layout.rack_groups.push(RackGroup::new(
        "Row A",
        LayoutPreset::Bayed,
        vec![a.id.clone(), b.id.clone()],
    ));
    layout.racks = vec![a, b, c];
    layout.device_types = test_library();
    layout
}

/// Writes `layout` to a JSON file in a fresh temp dir.
pub fn create_temp_layout_file(layout: &Layout) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let layout_path = temp_dir.path().join("test_layout.json");
    LayoutService::save(layout, &layout_path).expect("Failed to write layout file");
    (layout_path, temp_dir)
}

/// Path to the rackplan binary.
pub fn rackplan_bin() -> &'static str {
    env!("CARGO_BIN_EXE_rackplan")
}

/// Writes an empty config file so CLI tests do not read the user's config.
pub fn create_temp_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[history]\nmax_depth = 50\n").expect("Failed to write config");
    path
}

//! End-to-end tests for `rackplan add-rack`.

use std::process::{Command, Output};

mod fixtures;
use fixtures::*;

use rackplan::services::LayoutService;
use tempfile::TempDir;

fn add_rack(config: &std::path::Path, layout: &std::path::Path, extra: &[&str]) -> Output {
    Command::new(rackplan_bin())
        .args(["--config", config.to_str().unwrap()])
        .args(["add-rack", "--layout", layout.to_str().unwrap()])
        .args(extra)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_add_rack_uses_configured_defaults() {
    let (layout_path, temp_dir) = create_temp_layout_file(&test_layout_single_rack(12));
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "[defaults]\nrack_height = 24\nrack_width = 10\n").unwrap();

    let output = add_rack(&config_path, &layout_path, &["--name", "Edge"]);

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let saved = LayoutService::load(&layout_path).unwrap();
    let rack = saved.racks.iter().find(|r| r.name == "Edge").unwrap();
    assert_eq!((rack.height, rack.width), (24, 10));
}

#[test]
fn test_add_rack_flags_override_defaults() {
    let (layout_path, temp_dir) = create_temp_layout_file(&test_layout_single_rack(12));
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "[defaults]\nrack_height = 24\n").unwrap();

    let output = add_rack(&config_path, &layout_path, &["--name", "Tall", "--height", "48"]);
    assert_eq!(output.status.code(), Some(0));

    let saved = LayoutService::load(&layout_path).unwrap();
    let rack = saved.racks.iter().find(|r| r.name == "Tall").unwrap();
    assert_eq!((rack.height, rack.width), (48, 19));
}

#[test]
fn test_add_rack_rejects_bad_height() {
    let (layout_path, _temp_dir) = create_temp_layout_file(&test_layout_single_rack(12));
    let config_dir = TempDir::new().unwrap();
    let config_path = create_temp_config(&config_dir);
    let before = std::fs::read_to_string(&layout_path).unwrap();

    let output = add_rack(&config_path, &layout_path, &["--name", "Huge", "--height", "500"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(std::fs::read_to_string(&layout_path).unwrap(), before);
}

//! Lists where a device type can be dropped in a rack.

use crate::cli::common::{load_layout, parse_face, parse_slot, print_json, CliError, CliResult};
use crate::config::Config;
use crate::units::{format_u, to_human};
use crate::validation::find_valid_drop_positions;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// List valid drop positions for a device type in a rack
#[derive(Debug, Clone, Args)]
pub struct PositionsArgs {
    /// Path to layout JSON file
    #[arg(short, long, value_name = "FILE")]
    pub layout: PathBuf,

    /// Rack id or name
    #[arg(short, long)]
    pub rack: String,

    /// Device type slug
    #[arg(short, long)]
    pub device: String,

    /// Face: front, rear or both (defaults to the configured face)
    #[arg(long)]
    pub face: Option<String>,

    /// Slot: left, right or full
    #[arg(long)]
    pub slot: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct PositionsResponse {
    rack: String,
    device: String,
    face: String,
    slot: String,
    /// Bottom positions in U, rounded to three decimals
    positions: Vec<f64>,
    /// Bottom positions in 1/6 U grid units, exact
    internal_positions: Vec<i32>,
}

fn rounded_u(internal: i32) -> f64 {
    (to_human(internal) * 1000.0).round() / 1000.0
}

impl PositionsArgs {
    /// Execute the positions command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let layout = load_layout(&self.layout)?;
        let rack = layout
            .racks
            .iter()
            .find(|r| r.id == self.rack || r.name == self.rack)
            .ok_or_else(|| CliError::validation(format!("Rack '{}' not found", self.rack)))?;
        let device_type = layout.get_device_type(&self.device).ok_or_else(|| {
            CliError::validation(format!("Device type '{}' not found", self.device))
        })?;

        // Same face and slot rules as `place`
        let face = device_type.pinned_face(parse_face(self.face.as_deref(), config.defaults.face)?);
        let slot = device_type.normalized_slot(parse_slot(self.slot.as_deref())?);

        let positions = find_valid_drop_positions(
            rack,
            &layout.device_types,
            device_type.u_height,
            face,
            slot,
        );
        tracing::debug!(rack = %rack.name, count = positions.len(), "drop positions");

        if self.json {
            return print_json(&PositionsResponse {
                rack: rack.name.clone(),
                device: device_type.slug.clone(),
                face: face.to_string(),
                slot: slot.to_string(),
                positions: positions.iter().map(|&p| rounded_u(p)).collect(),
                internal_positions: positions.clone(),
            });
        }

        if positions.is_empty() {
            println!(
                "No room for {} ({}U) in {} on the {face} face",
                device_type.display_name(),
                device_type.u_height,
                rack.name
            );
            return Ok(());
        }

        println!(
            "{} ({}U) fits {} in {} on the {face} face:",
            device_type.display_name(),
            device_type.u_height,
            positions.len(),
            rack.name
        );
        let labels: Vec<String> = positions.iter().map(|&p| format_u(p)).collect();
        for chunk in labels.chunks(12) {
            println!("  {}", chunk.join(" "));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_u() {
        assert!((rounded_u(6) - 1.0).abs() < f64::EPSILON);
        assert!((rounded_u(7) - 1.167).abs() < f64::EPSILON);
        assert!((rounded_u(27) - 4.5).abs() < f64::EPSILON);
    }
}

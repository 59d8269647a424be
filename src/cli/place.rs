//! Places a device in a rack and saves the layout.

use crate::cli::common::{load_layout, parse_face, parse_slot, CliError, CliResult};
use crate::config::Config;
use crate::services::{LayoutService, LayoutStore};
use crate::units::{format_u, to_human, to_internal};
use clap::Args;
use std::path::PathBuf;

/// Place a device in a rack, with the same checks as the editor
#[derive(Debug, Clone, Args)]
pub struct PlaceArgs {
    /// Path to layout JSON file
    #[arg(short, long, value_name = "FILE")]
    pub layout: PathBuf,

    /// Rack id or name
    #[arg(short, long)]
    pub rack: String,

    /// Device type slug
    #[arg(short, long)]
    pub device: String,

    /// Bottom position in U (e.g. 5 or 5.5)
    #[arg(long, value_name = "U")]
    pub at: f64,

    /// Face: front, rear or both (defaults to the configured face)
    #[arg(long)]
    pub face: Option<String>,

    /// Slot: left, right or full
    #[arg(long)]
    pub slot: Option<String>,

    /// Display name for the new device
    #[arg(long)]
    pub name: Option<String>,

    /// Write the result here instead of overwriting the input
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl PlaceArgs {
    /// Execute the place command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let position = to_internal(self.at);
        if !self.at.is_finite() || (to_human(position) - self.at).abs() > 1e-9 {
            return Err(CliError::usage(format!(
                "Position {} is not a multiple of 1/6 U",
                self.at
            )));
        }
        let face = parse_face(self.face.as_deref(), config.defaults.face)?;
        let slot = parse_slot(self.slot.as_deref())?;

        let layout = load_layout(&self.layout)?;
        let rack_id = layout
            .racks
            .iter()
            .find(|r| r.id == self.rack || r.name == self.rack)
            .map(|r| r.id.clone())
            .ok_or_else(|| CliError::validation(format!("Rack '{}' not found", self.rack)))?;

        let mut store = LayoutStore::with_config(config);
        store.load_layout(layout);

        store
            .place_device(&rack_id, &self.device, position, face, slot)
            .map_err(|e| CliError::validation(e.to_string()))?;

        if self.name.is_some() {
            let index = store
                .layout()
                .get_rack(&rack_id)
                .map_or(0, |r| r.devices.len().saturating_sub(1));
            store
                .update_device_name(&rack_id, index, self.name.clone())
                .map_err(|e| CliError::validation(e.to_string()))?;
        }

        let output = self.output.as_ref().unwrap_or(&self.layout);
        LayoutService::save(store.layout(), output)
            .map_err(|e| CliError::io(format!("Failed to save layout: {e:#}")))?;
        store.mark_clean();

        println!(
            "✓ Placed {} at {} in {}",
            self.device,
            format_u(position),
            self.rack
        );
        println!("  Saved to {}", output.display());
        Ok(())
    }
}

//! Adds an empty rack to a layout and saves it.

use crate::cli::common::{load_layout, CliError, CliResult};
use crate::config::Config;
use crate::services::{LayoutService, LayoutStore};
use clap::Args;
use std::path::PathBuf;

/// Add an empty rack, sized from the configured defaults unless overridden
#[derive(Debug, Clone, Args)]
pub struct AddRackArgs {
    /// Path to layout JSON file
    #[arg(short, long, value_name = "FILE")]
    pub layout: PathBuf,

    /// Rack name
    #[arg(short, long)]
    pub name: String,

    /// Height in U (defaults to `defaults.rack_height`)
    #[arg(long)]
    pub height: Option<u32>,

    /// Width in inches, 10 or 19 (defaults to `defaults.rack_width`)
    #[arg(long)]
    pub width: Option<u32>,

    /// Write the result here instead of overwriting the input
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl AddRackArgs {
    /// Execute the add-rack command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let layout = load_layout(&self.layout)?;
        let mut store = LayoutStore::with_config(config);
        store.load_layout(layout);

        let added = match (self.height, self.width) {
            (None, None) => store.add_default_rack(config, &self.name),
            (height, width) => store.add_rack(
                &self.name,
                height.unwrap_or(config.defaults.rack_height),
                width.unwrap_or(config.defaults.rack_width),
            ),
        };
        let rack_id = added.map_err(|e| CliError::validation(e.to_string()))?;

        let output = self.output.as_ref().unwrap_or(&self.layout);
        LayoutService::save(store.layout(), output)
            .map_err(|e| CliError::io(format!("Failed to save layout: {e:#}")))?;
        store.mark_clean();

        let rack = store.layout().get_rack(&rack_id);
        println!(
            "✓ Added rack {} ({}U, {}\")",
            self.name.trim(),
            rack.map_or(0, |r| r.height),
            rack.map_or(0, |r| r.width)
        );
        println!("  Saved to {}", output.display());
        Ok(())
    }
}

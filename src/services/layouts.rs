//! Layout file I/O service.
//!
//! This module centralizes all layout file operations, providing a consistent
//! interface for loading and saving layout documents as JSON.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::models::layout::LAYOUT_VERSION;
use crate::models::Layout;

/// Service for managing layout file I/O operations.
///
/// Loading only checks that the document parses. Run
/// [`crate::validation::LayoutValidator`] on the result before trusting its
/// placements.
pub struct LayoutService;

impl LayoutService {
    /// Loads a layout from a JSON file.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use rackplan::services::LayoutService;
    ///
    /// let layout = LayoutService::load(Path::new("datacenter.json"))?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(path: &Path) -> Result<Layout> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout file: {}", path.display()))?;

        let layout = Self::from_json(&content)
            .with_context(|| format!("Failed to load layout from {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            racks = layout.racks.len(),
            device_types = layout.device_types.len(),
            "loaded layout"
        );
        Ok(layout)
    }

    /// Saves a layout to a JSON file.
    ///
    /// This performs an atomic write using a temp file + rename pattern to ensure
    /// the file is never left in a corrupted state.
    pub fn save(layout: &Layout, path: &Path) -> Result<()> {
        let content = Self::to_json(layout)?;
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write temp layout file: {}", temp_path.display()))?;

        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to save layout to {}", path.display()))?;

        tracing::info!(path = %path.display(), "saved layout");
        Ok(())
    }

    /// Parses a layout document.
    pub fn from_json(content: &str) -> Result<Layout> {
        let layout: Layout = serde_json::from_str(content).context("Invalid layout JSON")?;
        Layout::validate_name(&layout.name)?;

        if layout.version != LAYOUT_VERSION {
            tracing::warn!(
                found = %layout.version,
                expected = LAYOUT_VERSION,
                "layout version differs from this build"
            );
        }
        Ok(layout)
    }

    /// Serializes a layout document as pretty-printed JSON.
    pub fn to_json(layout: &Layout) -> Result<String> {
        serde_json::to_string_pretty(layout).context("Failed to serialize layout")
    }
}

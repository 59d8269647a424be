//! Layout store: the single owner of a layout and its undo history.
//!
//! Every recorded operation validates first and only then builds a
//! [`Command`] and runs it through [`History`]. A rejected operation returns a
//! [`MutationError`] and leaves both the layout and the history untouched.
//!
//! Operations are split by what they touch:
//! - `devices`: placements inside racks and containers
//! - `device_types`: the device library
//! - `racks`: racks and rack groups

mod device_types;
mod devices;
mod racks;

use crate::config::Config;
use crate::history::{Command, History};
use crate::models::{DeviceType, Layout, PlacedDevice, Rack};
use crate::services::errors::{MutationError, MutationResult};
use tracing::debug;

/// Owns a [`Layout`] and the [`History`] of commands applied to it.
///
/// # Examples
///
/// ```
/// use rackplan::models::{DeviceFace, DeviceType, SlotPosition};
/// use rackplan::services::LayoutStore;
/// use rackplan::units::to_internal;
///
/// let mut store = LayoutStore::new();
/// let rack_id = store.add_rack("Rack A", 12, 19)?;
/// store.add_device_type(DeviceType::new("server-2u", 2.0)?)?;
/// store.place_device(&rack_id, "server-2u", to_internal(5.0), DeviceFace::Front, SlotPosition::Full)?;
///
/// assert!(store.undo());
/// assert!(store.layout().racks[0].devices.is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayoutStore {
    layout: Layout,
    history: History,
    dirty: bool,
}

impl LayoutStore {
    /// Creates a store holding an empty layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose history depth comes from `config`.
    #[must_use]
    pub fn with_config(config: &Config) -> Self {
        Self {
            layout: Layout::default(),
            history: History::new(config.history.max_depth),
            dirty: false,
        }
    }

    /// Replaces the layout wholesale, clearing history and the dirty flag.
    pub fn load_layout(&mut self, layout: Layout) {
        debug!(name = %layout.name, racks = layout.racks.len(), "load layout");
        self.layout = layout;
        self.history.clear();
        self.dirty = false;
    }

    /// Starts over with an empty layout.
    pub fn reset(&mut self) {
        debug!("reset layout");
        self.layout = Layout::default();
        self.history.clear();
        self.dirty = false;
    }

    /// Read-only view of the current layout.
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Consumes the store, returning the layout.
    #[must_use]
    pub fn into_layout(self) -> Layout {
        self.layout
    }

    /// True if the layout changed since it was loaded or last marked clean.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the layout as saved.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Reverts the last recorded operation.
    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.layout);
        self.dirty |= undone;
        undone
    }

    /// Re-applies the last undone operation.
    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.layout);
        self.dirty |= redone;
        redone
    }

    /// Forgets all undo and redo steps. The layout is unchanged.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// True if there is an operation to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// True if there is an operation to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Description of the operation `undo` would revert.
    #[must_use]
    pub fn undo_description(&self) -> Option<&str> {
        self.history.undo_description()
    }

    /// Description of the operation `redo` would re-apply.
    #[must_use]
    pub fn redo_description(&self) -> Option<&str> {
        self.history.redo_description()
    }

    fn record(&mut self, command: Command) {
        self.history.execute(command, &mut self.layout);
        self.dirty = true;
    }

    fn rack(&self, rack_id: &str) -> MutationResult<&Rack> {
        self.layout
            .get_rack(rack_id)
            .ok_or_else(|| MutationError::UnknownRack(rack_id.to_string()))
    }

    fn device_type(&self, slug: &str) -> MutationResult<&DeviceType> {
        self.layout
            .get_device_type(slug)
            .ok_or_else(|| MutationError::UnknownDeviceType(slug.to_string()))
    }

    fn device(&self, rack_id: &str, index: usize) -> MutationResult<&PlacedDevice> {
        self.rack(rack_id)?
            .devices
            .get(index)
            .ok_or_else(|| MutationError::UnknownDevice {
                rack_id: rack_id.to_string(),
                index,
            })
    }

    fn label(&self, device: &PlacedDevice) -> String {
        device
            .label(self.layout.get_device_type(&device.device_type))
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceFace, SlotPosition};
    use crate::units::to_internal;

    #[test]
    fn test_dirty_tracking() {
        let mut store = LayoutStore::new();
        assert!(!store.is_dirty());

        store.add_rack("A", 12, 19).unwrap();
        assert!(store.is_dirty());

        store.mark_clean();
        assert!(!store.is_dirty());

        store.undo();
        assert!(store.is_dirty());
    }

    #[test]
    fn test_load_layout_clears_history() {
        let mut store = LayoutStore::new();
        store.add_rack("A", 12, 19).unwrap();
        assert!(store.can_undo());

        store.load_layout(Layout::new("Loaded").unwrap());
        assert!(!store.can_undo());
        assert!(!store.is_dirty());
        assert_eq!(store.layout().name, "Loaded");
    }

    #[test]
    fn test_reset() {
        let mut store = LayoutStore::new();
        store.add_rack("A", 12, 19).unwrap();
        store.reset();
        assert!(store.layout().racks.is_empty());
        assert!(!store.can_undo());
        assert!(!store.can_redo());
    }

    #[test]
    fn test_with_config_limits_history() {
        let mut config = Config::new();
        config.history.max_depth = 2;
        let mut store = LayoutStore::with_config(&config);
        for name in ["A", "B", "C"] {
            store.add_rack(name, 12, 19).unwrap();
        }
        assert!(store.undo());
        assert!(store.undo());
        assert!(!store.undo());
        assert_eq!(store.layout().racks.len(), 1);
    }

    #[test]
    fn test_descriptions() {
        let mut store = LayoutStore::new();
        let rack_id = store.add_rack("A", 12, 19).unwrap();
        store
            .add_device_type(DeviceType::new("server", 1.0).unwrap().with_model("R640"))
            .unwrap();
        store
            .place_device(&rack_id, "server", to_internal(3.0), DeviceFace::Front, SlotPosition::Full)
            .unwrap();
        assert_eq!(store.undo_description(), Some("Place R640"));
        store.undo();
        assert_eq!(store.redo_description(), Some("Place R640"));
        store.clear_history();
        assert!(!store.can_redo());
    }
}

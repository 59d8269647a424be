//! Linear undo/redo history.
//!
//! Executing a new command clears the redo stack; undo moves the newest
//! command to the redo stack and redo re-executes it.

pub mod command;

pub use command::{Command, CommandAction};

use crate::models::Layout;
use tracing::debug;

/// Default maximum number of undo steps.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Undo/redo stacks of executed commands.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    max_depth: usize,
}

impl History {
    /// Creates a history keeping at most `max_depth` undo steps (minimum 1).
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Executes `command`, records it, and discards the redo stack.
    pub fn execute(&mut self, command: Command, layout: &mut Layout) {
        debug!(description = %command.description, "execute");
        command.execute(layout);
        self.undo_stack.push(command);
        self.redo_stack.clear();
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Reverts the newest command. Returns false if there is nothing to undo.
    pub fn undo(&mut self, layout: &mut Layout) -> bool {
        let Some(command) = self.undo_stack.pop() else {
            return false;
        };
        debug!(description = %command.description, "undo");
        command.undo(layout);
        self.redo_stack.push(command);
        true
    }

    /// Re-applies the newest undone command. Returns false if there is nothing to redo.
    pub fn redo(&mut self, layout: &mut Layout) -> bool {
        let Some(command) = self.redo_stack.pop() else {
            return false;
        };
        debug!(description = %command.description, "redo");
        command.execute(layout);
        self.undo_stack.push(command);
        true
    }

    /// Empties both stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Returns true if there are commands to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the command `undo` would revert.
    #[must_use]
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.description.as_str())
    }

    /// Description of the command `redo` would re-apply.
    #[must_use]
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.description.as_str())
    }

    /// Number of undoable steps.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redoable steps.
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rack;

    fn add_rack(name: &str) -> Command {
        Command::new(
            format!("Add rack {name}"),
            CommandAction::AddRack { index: usize::MAX, rack: Rack::new(name, 42, 19).unwrap() },
        )
    }

    #[test]
    fn test_execute_undo_redo() {
        let mut layout = Layout::default();
        let mut history = History::default();

        history.execute(add_rack("A"), &mut layout);
        assert_eq!(layout.racks.len(), 1);
        assert!(history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo_description(), Some("Add rack A"));

        assert!(history.undo(&mut layout));
        assert!(layout.racks.is_empty());
        assert_eq!(history.redo_description(), Some("Add rack A"));

        assert!(history.redo(&mut layout));
        assert_eq!(layout.racks.len(), 1);
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut layout = Layout::default();
        let mut history = History::default();
        assert!(!history.undo(&mut layout));
        assert!(!history.redo(&mut layout));
        assert_eq!(history.undo_description(), None);
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut layout = Layout::default();
        let mut history = History::default();
        history.execute(add_rack("A"), &mut layout);
        history.undo(&mut layout);
        assert!(history.can_redo());

        history.execute(add_rack("B"), &mut layout);
        assert!(!history.can_redo());
        assert_eq!(layout.racks.len(), 1);
        assert_eq!(layout.racks[0].name, "B");
    }

    #[test]
    fn test_max_depth_drops_oldest() {
        let mut layout = Layout::default();
        let mut history = History::new(3);
        for name in ["A", "B", "C", "D", "E"] {
            history.execute(add_rack(name), &mut layout);
        }
        assert_eq!(history.undo_len(), 3);

        let mut undone = 0;
        while history.undo(&mut layout) {
            undone += 1;
        }
        assert_eq!(undone, 3);
        assert_eq!(layout.racks.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut layout = Layout::default();
        let mut history = History::default();
        history.execute(add_rack("A"), &mut layout);
        history.undo(&mut layout);
        history.execute(add_rack("B"), &mut layout);
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}

//! Undo/redo keyboard shortcuts.

use super::manager::HistoryManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Undo,
    Redo,
}

/// A key press as reported by the input layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub key: String,
    /// Ctrl on Linux/Windows, Cmd on macOS
    pub ctrl_or_cmd: bool,
    pub shift: bool,
}

impl Shortcut {
    pub fn new(key: impl Into<String>, ctrl_or_cmd: bool, shift: bool) -> Self {
        Self {
            key: key.into(),
            ctrl_or_cmd,
            shift,
        }
    }

    /// Map the chord to a history action, ignoring it if the history
    /// cannot currently move in that direction
    pub fn resolve(&self, history: &HistoryManager) -> Option<HistoryAction> {
        if !self.ctrl_or_cmd {
            return None;
        }
        let key = self.key.to_ascii_lowercase();

        match (key.as_str(), self.shift) {
            ("z", false) if history.can_undo() => Some(HistoryAction::Undo),
            ("z", true) | ("y", _) if history.can_redo() => Some(HistoryAction::Redo),
            _ => None,
        }
    }

    /// Resolve and perform the action. Returns what was done.
    pub fn dispatch(&self, history: &mut HistoryManager) -> Option<HistoryAction> {
        let action = self.resolve(history)?;
        match action {
            HistoryAction::Undo => history.undo(),
            HistoryAction::Redo => history.redo(),
        };
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Document, Node};

    fn history_with_two_entries() -> HistoryManager {
        let mut history = HistoryManager::new();
        history.set_document(Document::new("m", "M", Node::new("root", "a")));
        history.update_document(|d| {
            let mut next = d.clone();
            next.root.topic = "b".to_string();
            next
        });
        history
    }

    #[test]
    fn test_undo_then_redo_chords() {
        let mut history = history_with_two_entries();

        assert_eq!(Shortcut::new("z", true, true).resolve(&history), None);
        assert_eq!(
            Shortcut::new("z", true, false).dispatch(&mut history),
            Some(HistoryAction::Undo)
        );
        assert_eq!(history.document().unwrap().root.topic, "a");

        assert_eq!(Shortcut::new("z", true, false).resolve(&history), None);
        assert_eq!(
            Shortcut::new("Y", true, false).dispatch(&mut history),
            Some(HistoryAction::Redo)
        );
        assert_eq!(history.document().unwrap().root.topic, "b");
    }

    #[test]
    fn test_plain_keys_are_ignored() {
        let history = history_with_two_entries();
        assert_eq!(Shortcut::new("z", false, false).resolve(&history), None);
        assert_eq!(Shortcut::new("f", true, false).resolve(&history), None);
    }
}

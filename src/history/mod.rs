//! Document History
//!
//! Undo/redo state for an open mind map, a lock-guarded handle for sharing
//! it across tasks, and the keyboard chords that drive it.

pub mod keymap;
pub mod manager;
pub mod shared;

pub use keymap::{HistoryAction, Shortcut};
pub use manager::{HistoryManager, OverflowPolicy, DEFAULT_HISTORY_LIMIT};
pub use shared::{ActiveDocument, SharedHistory};

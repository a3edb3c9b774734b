//! Mind Map History
//!
//! Document model and undo/redo history for a mind-map editor.
//!
//! This library provides:
//! - The mind map document tree and pure structural edits
//! - A bounded undo/redo history manager and a shared async handle
//! - Debounced autosave through a pluggable store
//! - JSON, OPML and Markdown export
//! - Folder hierarchy assembly for the sidebar
//! - Configuration management

pub mod autosave;
pub mod cli;
pub mod config;
pub mod export;
pub mod folders;
pub mod history;
pub mod model;

// Re-exports for clean public API
pub use autosave::{Autosaver, DocumentStore, FileStore};
pub use config::Config;
pub use export::{export, ExportFormat};
pub use folders::{build_folder_tree, build_hierarchy, Folder, MindMapSummary};
pub use history::{HistoryManager, OverflowPolicy, SharedHistory};
pub use model::{Document, Edit, Node};

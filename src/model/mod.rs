//! Mind-map Document Model
//!
//! Tree types shared by the history manager, autosave and export, plus the
//! pure edit operations applied to them.

pub mod document;
pub mod edit;
pub mod node;

pub use document::{BranchPalette, Document, Layout, Theme};
pub use edit::Edit;
pub use node::{Node, NodeMeta, SourceSpan};

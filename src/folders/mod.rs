//! Folder Organisation
//!
//! Backend row types for folders and map summaries, and the builders that
//! assemble them into the nested views the sidebar shows.

pub mod rows;
pub mod tree;

pub use rows::{Folder, MindMapSummary};
pub use tree::{
    build_folder_tree, build_hierarchy, folder_path, move_targets, validate_folder_move,
    FolderNode, Hierarchy, MoveTarget, TreeItem, TreeItemKind, ROOT_TARGET_NAME,
};

//! Mind-map Document
//!
//! The root aggregate held by the history manager and written by autosave.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::node::Node;

/// Layout direction hint for the rendering widget.
///
/// Values this crate does not know are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    RightBalanced,
    Left,
    Right,
    #[serde(untagged)]
    Other(String),
}

/// Branch colouring hint for the rendering widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchPalette {
    Semantic,
    Rainbow,
    #[serde(untagged)]
    Other(String),
}

/// Presentation metadata; carried through untouched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_palette: Option<BranchPalette>,
    /// Keys this crate does not know about, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A complete mind map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub root: Node,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

pub const DEFAULT_TITLE: &str = "New Mind Map";

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>, root: Node) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            root,
            theme: None,
        }
    }

    /// The starter map the editor creates for an id with no stored map
    pub fn new_map(id: impl Into<String>, title: &str) -> Self {
        let title = if title.is_empty() { DEFAULT_TITLE } else { title };

        let root = Node::new("root", "Mind Map").expanded(true).with_children(vec![
            Node::new("child1", "Ideas").expanded(true).with_children(vec![
                Node::new("grandchild1", "Brainstorm"),
                Node::new("grandchild2", "Research"),
            ]),
            Node::new("child2", "Tasks").expanded(true).with_children(vec![
                Node::new("grandchild3", "Plan"),
                Node::new("grandchild4", "Execute"),
            ]),
        ]);

        Self {
            id: id.into(),
            title: title.to_string(),
            root,
            theme: Some(Theme {
                layout: Some(Layout::RightBalanced),
                branch_palette: Some(BranchPalette::Semantic),
                extra: Map::new(),
            }),
        }
    }

    /// Parse a document from its JSON representation
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse mind map JSON")
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize mind map")
    }

    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.root.find(id)
    }

    pub fn node_count(&self) -> usize {
        self.root.count()
    }
}

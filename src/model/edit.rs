//! Structural Edits
//!
//! Pure document transformations emitted by the canvas. Each edit takes the
//! current document by reference and produces the next one, which makes it a
//! ready-made updater for the history manager.

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

use super::document::Document;
use super::node::Node;

/// A single structural change to a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Edit {
    SetTitle {
        title: String,
    },
    SetTopic {
        id: String,
        topic: String,
    },
    AddChild {
        parent: String,
        node: Node,
        #[serde(default)]
        index: Option<usize>,
    },
    Remove {
        id: String,
    },
    Move {
        id: String,
        parent: String,
        #[serde(default)]
        index: Option<usize>,
    },
    SetExpanded {
        id: String,
        expanded: bool,
    },
    SetNotes {
        id: String,
        #[serde(default)]
        notes: Option<String>,
    },
    SetUrl {
        id: String,
        #[serde(default)]
        url: Option<String>,
    },
    SetTags {
        id: String,
        #[serde(default)]
        tags: Option<Vec<String>>,
    },
}

impl Edit {
    /// Apply the edit, returning the new document. The input is untouched.
    pub fn apply(&self, doc: &Document) -> Result<Document> {
        let mut next = doc.clone();

        match self {
            Edit::SetTitle { title } => next.title = title.clone(),
            Edit::SetTopic { id, topic } => node_mut(&mut next, id)?.topic = topic.clone(),
            Edit::SetExpanded { id, expanded } => {
                node_mut(&mut next, id)?.expanded = Some(*expanded)
            }
            Edit::SetNotes { id, notes } => node_mut(&mut next, id)?.notes = notes.clone(),
            Edit::SetUrl { id, url } => node_mut(&mut next, id)?.url = url.clone(),
            Edit::SetTags { id, tags } => node_mut(&mut next, id)?.tags = tags.clone(),
            Edit::AddChild {
                parent,
                node,
                index,
            } => {
                if let Some(dup) = node.iter().find(|n| next.root.contains(&n.id)) {
                    bail!("Node id '{}' already exists in map '{}'", dup.id, doc.id);
                }
                insert_child(node_mut(&mut next, parent)?, node.clone(), *index);
            }
            Edit::Remove { id } => {
                if next.root.id == *id {
                    bail!("Cannot remove the root node");
                }
                next.root
                    .remove_descendant(id)
                    .ok_or_else(|| not_found(id))?;
            }
            Edit::Move { id, parent, index } => {
                if next.root.id == *id {
                    bail!("Cannot move the root node");
                }
                let subtree = next.root.find(id).ok_or_else(|| not_found(id))?;
                if subtree.contains(parent) {
                    bail!("Cannot move node '{}' under itself or its descendant '{}'", id, parent);
                }
                if !next.root.contains(parent) {
                    return Err(not_found(parent));
                }
                let node = next
                    .root
                    .remove_descendant(id)
                    .ok_or_else(|| not_found(id))?;
                insert_child(node_mut(&mut next, parent)?, node, *index);
            }
        }

        Ok(next)
    }

    /// Id of the node the edit targets, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            Edit::SetTitle { .. } => None,
            Edit::AddChild { parent, .. } => Some(parent.as_str()),
            Edit::SetTopic { id, .. }
            | Edit::Remove { id }
            | Edit::Move { id, .. }
            | Edit::SetExpanded { id, .. }
            | Edit::SetNotes { id, .. }
            | Edit::SetUrl { id, .. }
            | Edit::SetTags { id, .. } => Some(id.as_str()),
        }
    }
}

fn node_mut<'a>(doc: &'a mut Document, id: &str) -> Result<&'a mut Node> {
    doc.root.find_mut(id).ok_or_else(|| not_found(id))
}

fn not_found(id: &str) -> anyhow::Error {
    anyhow!("Node '{}' not found", id)
}

/// Out-of-range indices append
fn insert_child(parent: &mut Node, node: Node, index: Option<usize>) {
    let at = index
        .unwrap_or(parent.children.len())
        .min(parent.children.len());
    parent.children.insert(at, node);
}

//! Mind-map Node
//!
//! Recursive tree entity plus the lookup helpers the edit layer needs.

use serde::{Deserialize, Serialize};

/// Source span attached by importers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: u64,
    pub end: u64,
}

/// Import provenance metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timecode: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_span: Option<SourceSpan>,
}

/// A single topic in the mind map tree
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "NodeRow")]
pub struct Node {
    pub id: String,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<NodeMeta>,
    #[serde(default)]
    pub children: Vec<Node>,
}

/// Stored shape of a node. Older maps carry the label as `text`, some
/// rows carry both keys.
#[derive(Deserialize)]
struct NodeRow {
    id: String,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    expanded: Option<bool>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    meta: Option<NodeMeta>,
    #[serde(default)]
    children: Vec<Node>,
}

impl TryFrom<NodeRow> for Node {
    type Error = String;

    fn try_from(row: NodeRow) -> Result<Self, Self::Error> {
        // A non-empty topic wins, then text, then an empty topic
        let topic = match (row.topic, row.text) {
            (Some(topic), _) if !topic.is_empty() => topic,
            (_, Some(text)) => text,
            (Some(topic), None) => topic,
            (None, None) => return Err(format!("node '{}' has no topic", row.id)),
        };

        Ok(Node {
            id: row.id,
            topic,
            expanded: row.expanded,
            notes: row.notes,
            url: row.url,
            tags: row.tags,
            meta: row.meta,
            children: row.children,
        })
    }
}

impl Node {
    /// Create a leaf node
    pub fn new(id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            ..Default::default()
        }
    }

    /// Builder-style helper for attaching children
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Builder-style helper for the expansion hint
    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = Some(expanded);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Find a node by id anywhere in this subtree (including self)
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Mutable variant of [`Node::find`]
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Id of the direct parent of `id`, if `id` is a strict descendant
    pub fn parent_of(&self, id: &str) -> Option<&str> {
        for child in &self.children {
            if child.id == id {
                return Some(&self.id);
            }
            if let Some(parent) = child.parent_of(id) {
                return Some(parent);
            }
        }
        None
    }

    /// Detach the strict descendant `id` and return it with its subtree
    pub fn remove_descendant(&mut self, id: &str) -> Option<Node> {
        if let Some(pos) = self.children.iter().position(|c| c.id == id) {
            return Some(self.children.remove(pos));
        }
        self.children
            .iter_mut()
            .find_map(|child| child.remove_descendant(id))
    }

    /// Depth-first, pre-order iterator over this subtree
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![self] }
    }

    /// Number of nodes in this subtree (including self)
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Depth of the deepest node, the subtree root being depth 0
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Pre-order traversal over a node subtree
pub struct NodeIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reverse push keeps sibling order on pop
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

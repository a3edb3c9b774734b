//! Markdown outline export.

use crate::model::{Document, Node};

pub fn render(doc: &Document) -> String {
    let mut out = String::new();
    write_node(&doc.root, 0, &mut out);
    out
}

fn write_node(node: &Node, level: usize, out: &mut String) {
    let indent = "  ".repeat(level);
    let text = if node.topic.is_empty() {
        "Untitled"
    } else {
        node.topic.as_str()
    };

    if level == 0 {
        out.push_str(&format!("# {}\n", text));
    } else {
        let hashes = "#".repeat((level + 1).min(6));
        out.push_str(&format!("{}{} {}\n", indent, hashes, text));
    }

    if let Some(notes) = node.notes.as_deref().filter(|n| !n.is_empty()) {
        out.push_str(&format!("{indent}\n{indent}{notes}\n"));
    }
    if let Some(url) = node.url.as_deref().filter(|u| !u.is_empty()) {
        out.push_str(&format!("{indent}\n{indent}[Link]({url})\n"));
    }

    if !node.is_leaf() {
        out.push('\n');
        for child in &node.children {
            write_node(child, level + 1, out);
        }
    }
}

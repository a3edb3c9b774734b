//! OPML 2.0 outline export.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::model::{Document, Node};

/// Render `doc` as OPML, stamping both head dates with `generated_at`
pub fn render(doc: &Document, generated_at: OffsetDateTime) -> String {
    let stamp = generated_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string());
    let title = if doc.title.is_empty() {
        "Mind Map"
    } else {
        doc.title.as_str()
    };

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<opml version=\"2.0\">\n");
    out.push_str("  <head>\n");
    out.push_str(&format!("    <title>{}</title>\n", escape_xml(title)));
    out.push_str(&format!("    <dateCreated>{}</dateCreated>\n", stamp));
    out.push_str(&format!("    <dateModified>{}</dateModified>\n", stamp));
    out.push_str("  </head>\n");
    out.push_str("  <body>\n");
    write_outline(&doc.root, 0, &mut out);
    out.push('\n');
    out.push_str("  </body>\n");
    out.push_str("</opml>");
    out
}

fn write_outline(node: &Node, level: usize, out: &mut String) {
    let indent = "  ".repeat(level + 2);
    let text = if node.topic.is_empty() {
        "Untitled"
    } else {
        node.topic.as_str()
    };

    let mut attrs = format!("text=\"{}\"", escape_xml(text));
    if let Some(notes) = node.notes.as_deref().filter(|n| !n.is_empty()) {
        attrs.push_str(&format!(" _note=\"{}\"", escape_xml(notes)));
    }
    if let Some(url) = node.url.as_deref().filter(|u| !u.is_empty()) {
        attrs.push_str(&format!(" url=\"{}\"", escape_xml(url)));
    }

    if node.is_leaf() {
        out.push_str(&format!("{}<outline {} />", indent, attrs));
        return;
    }

    out.push_str(&format!("{}<outline {}>\n", indent, attrs));
    for child in &node.children {
        write_outline(child, level + 1, out);
        out.push('\n');
    }
    out.push_str(&format!("{}</outline>", indent));
}

pub fn escape_xml(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_leaf_root() {
        let doc = Document::new("m", "", Node::new("root", ""));
        let opml = render(&doc, OffsetDateTime::UNIX_EPOCH);
        assert!(opml.contains("<title>Mind Map</title>"));
        assert!(opml.contains("    <outline text=\"Untitled\" />\n  </body>"));
        assert!(opml.contains("<dateCreated>1970-01-01T00:00:00Z</dateCreated>"));
    }
}

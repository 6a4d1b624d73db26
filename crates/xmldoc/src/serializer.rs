//! Format-exact XML text rendering.
//!
//! The output format is fixed and reproduced byte-for-byte: the
//! `<?xml version="1.0" ?>` header, every entity tag on its own line
//! indented with one tab per nesting level, childless entities
//! self-closed, and an entity whose single child is a text node rendered
//! inline (`<name>text</name>`). A text node whose parent has more than
//! one child goes on its own line instead.

use crate::document::XmlDocument;
use crate::node::{NodeId, NodeKind};
use crate::tree::XmlTree;
use crate::visit::{walk, XmlVisitor};

const HEADER: &str = "<?xml version=\"1.0\" ?>";

/// Escape `&`, `<`, `>`, `"` and `'` in attribute values and text
/// content. Single pass over the characters, so an ampersand is never
/// escaped twice.
fn escape_into(out: &mut String, raw: &str) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}

struct XmlSerializer {
    out: String,
    depth: usize,
}

impl XmlSerializer {
    fn new() -> Self {
        Self {
            out: String::with_capacity(4096),
            depth: 0,
        }
    }

    fn newline_indent(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth {
            self.out.push('\t');
        }
    }
}

impl XmlVisitor for XmlSerializer {
    fn on_entity_enter(&mut self, tree: &XmlTree, id: NodeId) -> bool {
        let node = &tree[id];
        if let NodeKind::Entity {
            name, attributes, ..
        } = node.kind()
        {
            self.newline_indent(self.depth);
            self.out.push('<');
            self.out.push_str(name);
            for attribute in attributes {
                self.out.push(' ');
                self.out.push_str(&attribute.name);
                self.out.push_str("=\"");
                escape_into(&mut self.out, &attribute.value);
                self.out.push('"');
            }
            if node.children().is_empty() {
                self.out.push('/');
            }
            self.out.push('>');
        }
        self.depth += 1;
        true
    }

    fn on_text(&mut self, tree: &XmlTree, id: NodeId) {
        let node = &tree[id];
        // a lone text child stays inline with the opening tag
        if let Some(parent) = node.parent() {
            if tree[parent].children().len() > 1 {
                self.newline_indent(self.depth);
            }
        }
        if let NodeKind::Text { value, .. } = node.kind() {
            escape_into(&mut self.out, value);
        }
    }

    fn on_entity_exit(&mut self, tree: &XmlTree, id: NodeId) {
        self.depth -= 1;
        let node = &tree[id];
        let children = node.children();
        if children.is_empty() {
            // already self-closed on entry
            return;
        }
        let inline_text = children.len() == 1 && tree[children[0]].is_text();
        if !inline_text {
            self.newline_indent(self.depth);
        }
        if let NodeKind::Entity { name, .. } = node.kind() {
            self.out.push_str("</");
            self.out.push_str(name);
            self.out.push('>');
        }
    }
}

/// Serialize a document to its exact textual form.
pub fn serialize(document: &XmlDocument) -> String {
    let mut serializer = XmlSerializer::new();
    serializer.out.push_str(HEADER);
    // the root id was validated at document construction
    let _ = walk(document.tree(), document.root(), &mut serializer);
    serializer.out
}

//! Node storage types.
//!
//! The payload for each node variant (entity name and attributes, text
//! value) lives in `NodeKind`; navigation links (parent, children) are
//! stored in `XmlNode`, the arena slot type.

use crate::observe::{EntityEvent, Registry, TextEvent};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Node identifier (index into the tree arena).
pub type NodeId = u32;

/// A name/value attribute pair.
///
/// Entities keep attributes unique by name, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// The kind of a node and its payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeKind {
    /// A named node owning attributes and child nodes.
    Entity {
        name: String,
        attributes: Vec<Attribute>,
        #[serde(skip)]
        observers: Registry<EntityEvent>,
    },
    /// A leaf holding character data.
    Text {
        value: String,
        #[serde(skip)]
        observers: Registry<TextEvent>,
    },
}

/// A node slot in the arena: payload plus navigation links.
///
/// The parent link is a non-owning index; the child list is the single
/// owning edge, so a node has at most one parent at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XmlNode {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
}

impl XmlNode {
    pub(crate) fn entity(name: String, attributes: Vec<Attribute>) -> Self {
        Self {
            kind: NodeKind::Entity {
                name,
                attributes,
                observers: Registry::default(),
            },
            parent: None,
            children: SmallVec::new(),
        }
    }

    pub(crate) fn text(value: String) -> Self {
        Self {
            kind: NodeKind::Text {
                value,
                observers: Registry::default(),
            },
            parent: None,
            children: SmallVec::new(),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in document order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Check if node is an entity.
    pub fn is_entity(&self) -> bool {
        matches!(self.kind, NodeKind::Entity { .. })
    }

    /// Check if node is text.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    /// Entity name, if this is an entity.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Entity { name, .. } => Some(name),
            NodeKind::Text { .. } => None,
        }
    }

    /// Text value, if this is a text node.
    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { value, .. } => Some(value),
            NodeKind::Entity { .. } => None,
        }
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }

    /// Attributes in insertion order (empty for text nodes).
    pub fn attributes(&self) -> &[Attribute] {
        match &self.kind {
            NodeKind::Entity { attributes, .. } => attributes,
            NodeKind::Text { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_accessors() {
        let node = XmlNode::entity(
            "root".to_string(),
            vec![Attribute {
                name: "id".to_string(),
                value: "1".to_string(),
            }],
        );

        assert!(node.is_entity());
        assert!(!node.is_text());
        assert_eq!(node.name(), Some("root"));
        assert_eq!(node.value(), None);
        assert_eq!(node.attr("id"), Some("1"));
        assert_eq!(node.attr("missing"), None);
        assert_eq!(node.parent(), None);
        assert!(node.children().is_empty());
    }

    #[test]
    fn text_accessors() {
        let node = XmlNode::text("hi".to_string());

        assert!(node.is_text());
        assert_eq!(node.value(), Some("hi"));
        assert_eq!(node.name(), None);
        assert!(node.attributes().is_empty());
    }
}

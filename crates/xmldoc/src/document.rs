//! Document wrapper: one arena plus the fixed id of its root entity.

use crate::error::{Result, XmlError};
use crate::node::NodeId;
use crate::serializer;
use crate::tree::XmlTree;
use serde::{Deserialize, Serialize};

/// An XML document.
///
/// The root id is fixed for the document's lifetime; to point at a
/// different root, build a new document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XmlDocument {
    tree: XmlTree,
    root: NodeId,
}

impl XmlDocument {
    /// Wrap a tree, pinning `root` as the document root.
    ///
    /// Fails when `root` is stale or not an entity.
    pub fn new(tree: XmlTree, root: NodeId) -> Result<Self> {
        if !tree.node(root)?.is_entity() {
            return Err(XmlError::NotAnEntity(root));
        }
        Ok(Self { tree, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn tree(&self) -> &XmlTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut XmlTree {
        &mut self.tree
    }

    /// Render the document to its exact textual form.
    pub fn serialize(&self) -> String {
        serializer::serialize(self)
    }

    /// Consume the document, returning the tree and the root id.
    pub fn into_parts(self) -> (XmlTree, NodeId) {
        (self.tree, self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_an_entity_root() {
        let mut tree = XmlTree::new();
        let root = tree.new_entity("root").unwrap();
        let document = XmlDocument::new(tree, root).unwrap();
        assert_eq!(document.root(), root);
    }

    #[test]
    fn rejects_text_root() {
        let mut tree = XmlTree::new();
        let text = tree.new_text("hi").unwrap();
        assert!(matches!(
            XmlDocument::new(tree, text),
            Err(XmlError::NotAnEntity(_))
        ));
    }

    #[test]
    fn rejects_stale_root() {
        let tree = XmlTree::new();
        assert!(matches!(
            XmlDocument::new(tree, 7),
            Err(XmlError::NodeNotFound(7))
        ));
    }
}

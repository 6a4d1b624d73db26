//! In-memory XML document model.
//!
//! A mutable, observable tree of entities and text nodes:
//!
//! - **Arena storage**: [`XmlTree`] owns every node; navigation uses
//!   [`NodeId`] indices, the parent back-reference is non-owning, and a
//!   node has at most one parent at any time.
//! - **Change notification**: each node carries a transient observer
//!   registry; every mutation notifies synchronously, in registration
//!   order. Interactive front-ends keep themselves in sync from these
//!   events instead of re-deriving state.
//! - **Visitor protocol**: one traversal contract ([`XmlVisitor`] /
//!   [`walk`]) drives search, serialization, and filtering alike.
//! - **Serializer**: [`XmlDocument::serialize`] renders the fixed textual
//!   format, byte for byte.
//! - **Filter**: [`filter`] builds a pruned structural copy, retaining
//!   the ancestor chain of every accepted node.
//! - **Generator**: [`generate`] marshals a structured value into a tree,
//!   driven by compile-time [`Marshal`] descriptors.
//!
//! Trees are built programmatically or generated from values and then
//! serialized; there is no XML text parser here.

pub mod document;
pub mod error;
pub mod filter;
pub mod generate;
pub mod node;
pub mod observe;
pub mod serializer;
pub mod tree;
pub mod visit;

pub use document::XmlDocument;
pub use error::{Result, XmlError};
pub use filter::filter;
pub use generate::{generate, Field, Marshal, Shape};
pub use node::{Attribute, NodeId, NodeKind, XmlNode};
pub use observe::{EntityEvent, ObserverId, Registry, TextEvent};
pub use serializer::serialize;
pub use tree::XmlTree;
pub use visit::{walk, XmlVisitor};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_and_serialize() {
        let mut tree = XmlTree::new();
        let root = tree.new_entity("root").unwrap();
        let text = tree.new_text("hi").unwrap();
        tree.append_child(root, text).unwrap();

        let document = XmlDocument::new(tree, root).unwrap();
        assert_eq!(
            document.serialize(),
            "<?xml version=\"1.0\" ?>\n<root>hi</root>"
        );
    }
}

//! Predicate-driven structural copy with ancestor retention.
//!
//! Filtering keeps every node the predicate accepts, plus the ancestor
//! chain needed to reach it: an entity that fails the predicate survives
//! as long as something below it was kept. The copy is built into a fresh
//! arena; the source tree is never touched.

use crate::document::XmlDocument;
use crate::error::{Result, XmlError};
use crate::node::{NodeId, XmlNode};
use crate::tree::XmlTree;
use crate::visit::{walk, XmlVisitor};

struct TreeFilter<F> {
    predicate: F,
    result: XmlTree,
    root: Option<NodeId>,
    current: Option<NodeId>,
    accepted: Vec<bool>,
}

impl<F: Fn(&XmlNode) -> bool> XmlVisitor for TreeFilter<F> {
    fn on_text(&mut self, tree: &XmlTree, id: NodeId) {
        if !(self.predicate)(&tree[id]) {
            return;
        }
        if let Some(current) = self.current {
            let copy = tree.copy_shallow(id, &mut self.result);
            self.result.attach(current, copy);
        }
    }

    fn on_entity_enter(&mut self, tree: &XmlTree, id: NodeId) -> bool {
        let copy = tree.copy_shallow(id, &mut self.result);
        if self.root.is_none() {
            self.root = Some(copy);
        }
        self.accepted.push((self.predicate)(&tree[id]));
        if let Some(current) = self.current {
            self.result.attach(current, copy);
        }
        self.current = Some(copy);
        // pruning happens on exit, so always descend
        true
    }

    fn on_entity_exit(&mut self, _tree: &XmlTree, _id: NodeId) {
        let Some(current) = self.current else {
            return;
        };
        let parent = self.result[current].parent();
        let accepted = self.accepted.pop().unwrap_or(false);
        if !accepted && self.result[current].children().is_empty() {
            match parent {
                Some(parent) => {
                    tracing::debug!("pruned rejected entity copy {}", current);
                    self.result.detach(parent, current);
                }
                None => {
                    tracing::debug!("pruned rejected root copy");
                    self.root = None;
                }
            }
        }
        self.current = parent;
    }
}

/// Build a pruned copy of the subtree at `root`, keeping nodes accepted
/// by `predicate` and the ancestor chain down to each of them.
///
/// Returns `Ok(None)` when nothing was retained. The returned document
/// owns its own arena.
pub fn filter<F>(tree: &XmlTree, root: NodeId, predicate: F) -> Result<Option<XmlDocument>>
where
    F: Fn(&XmlNode) -> bool,
{
    if !tree.node(root)?.is_entity() {
        return Err(XmlError::NotAnEntity(root));
    }

    let mut pass = TreeFilter {
        predicate,
        result: XmlTree::new(),
        root: None,
        current: None,
        accepted: Vec::new(),
    };
    walk(tree, root, &mut pass)?;

    match pass.root {
        Some(retained) => Ok(Some(XmlDocument::new(pass.result, retained)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (XmlTree, NodeId) {
        let mut tree = XmlTree::new();
        let root = tree.new_entity("root").unwrap();
        let child = tree.new_entity("child").unwrap();
        let text = tree.new_text("A match").unwrap();
        tree.append_child(child, text).unwrap();
        tree.append_child(root, child).unwrap();
        let other = tree.new_entity("other").unwrap();
        let noise = tree.new_text("nothing here").unwrap();
        tree.append_child(other, noise).unwrap();
        tree.append_child(root, other).unwrap();
        (tree, root)
    }

    fn contains_a(node: &XmlNode) -> bool {
        node.name().is_some_and(|name| name.contains('A'))
            || node.value().is_some_and(|value| value.contains('A'))
    }

    #[test]
    fn retains_matches_and_their_ancestors() {
        let (tree, root) = sample();
        let document = filter(&tree, root, contains_a).unwrap().unwrap();

        let result = document.tree();
        let kept_root = document.root();
        assert_eq!(result.name(kept_root).unwrap(), "root");

        let children = result.children(kept_root).unwrap();
        assert_eq!(children.len(), 1);
        let kept_child = children[0];
        assert_eq!(result.name(kept_child).unwrap(), "child");

        let grandchildren = result.children(kept_child).unwrap();
        assert_eq!(grandchildren.len(), 1);
        assert_eq!(result.value(grandchildren[0]).unwrap(), "A match");
    }

    #[test]
    fn nothing_retained_is_none() {
        let (tree, root) = sample();
        let result = filter(&tree, root, |node| {
            node.name().is_some_and(|name| name == "absent")
        })
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn accepted_root_survives_alone() {
        let (tree, root) = sample();
        let document = filter(&tree, root, |node| {
            node.name().is_some_and(|name| name == "root")
        })
        .unwrap()
        .unwrap();

        let result = document.tree();
        assert_eq!(result.name(document.root()).unwrap(), "root");
        assert!(result.children(document.root()).unwrap().is_empty());
    }

    #[test]
    fn copies_carry_attributes() {
        let mut tree = XmlTree::new();
        let root = tree.new_entity("root").unwrap();
        tree.append_attribute(root, "kept", "yes").unwrap();

        let document = filter(&tree, root, |_| true).unwrap().unwrap();
        assert_eq!(document.tree()[document.root()].attr("kept"), Some("yes"));
    }

    #[test]
    fn source_tree_is_untouched() {
        let (tree, root) = sample();
        let before = tree.len();
        let _ = filter(&tree, root, contains_a).unwrap();

        assert_eq!(tree.len(), before);
        assert_eq!(tree.children(root).unwrap().len(), 2);
    }

    #[test]
    fn text_root_rejected() {
        let mut tree = XmlTree::new();
        let text = tree.new_text("hi").unwrap();
        assert!(matches!(
            filter(&tree, text, |_| true),
            Err(XmlError::NotAnEntity(_))
        ));
    }
}

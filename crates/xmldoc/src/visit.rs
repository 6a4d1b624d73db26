//! Traversal protocol for the XML tree.
//!
//! One visitor contract drives search, serialization, and filtering: a
//! hook when a text node is reached, a hook on entering an entity (which
//! may refuse descent), and a hook on leaving it. Dispatch is a plain
//! match over [`NodeKind`]; the driver is iterative.

use crate::error::Result;
use crate::node::{NodeId, NodeKind};
use crate::tree::XmlTree;

/// Visitor over the tree structure. Every hook has a neutral default.
pub trait XmlVisitor {
    /// Called when a text node is reached.
    fn on_text(&mut self, _tree: &XmlTree, _id: NodeId) {}

    /// Called on reaching an entity, before its children. Returning
    /// `false` suppresses descent; [`on_entity_exit`](Self::on_entity_exit)
    /// still runs for symmetry.
    fn on_entity_enter(&mut self, _tree: &XmlTree, _id: NodeId) -> bool {
        true
    }

    /// Called after all children of an entity have been visited, or
    /// immediately when descent was suppressed.
    fn on_entity_exit(&mut self, _tree: &XmlTree, _id: NodeId) {}
}

enum Step {
    Enter(NodeId),
    Exit(NodeId),
}

/// Drive a visitor over the subtree rooted at `root`: pre-order entry,
/// children left to right in stored order, matching post-order exit.
///
/// Fails only when `root` is stale; child ids reached from a live root
/// are live by construction.
pub fn walk<V>(tree: &XmlTree, root: NodeId, visitor: &mut V) -> Result<()>
where
    V: XmlVisitor + ?Sized,
{
    tree.node(root)?;

    let mut stack = vec![Step::Enter(root)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(id) => match tree[id].kind() {
                NodeKind::Text { .. } => visitor.on_text(tree, id),
                NodeKind::Entity { .. } => {
                    let descend = visitor.on_entity_enter(tree, id);
                    stack.push(Step::Exit(id));
                    if descend {
                        // reversed so children pop left-to-right
                        for &child in tree[id].children().iter().rev() {
                            stack.push(Step::Enter(child));
                        }
                    }
                }
            },
            Step::Exit(id) => visitor.on_entity_exit(tree, id),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XmlError;

    struct Recorder {
        events: Vec<String>,
        skip: Option<NodeId>,
    }

    impl XmlVisitor for Recorder {
        fn on_text(&mut self, tree: &XmlTree, id: NodeId) {
            self.events
                .push(format!("text:{}", tree[id].value().unwrap_or_default()));
        }

        fn on_entity_enter(&mut self, tree: &XmlTree, id: NodeId) -> bool {
            self.events
                .push(format!("enter:{}", tree[id].name().unwrap_or_default()));
            self.skip != Some(id)
        }

        fn on_entity_exit(&mut self, tree: &XmlTree, id: NodeId) {
            self.events
                .push(format!("exit:{}", tree[id].name().unwrap_or_default()));
        }
    }

    fn sample() -> (XmlTree, NodeId, NodeId) {
        let mut tree = XmlTree::new();
        let root = tree.new_entity("root").unwrap();
        let child = tree.new_entity("child").unwrap();
        let text = tree.new_text("hi").unwrap();
        tree.append_child(child, text).unwrap();
        tree.append_child(root, child).unwrap();
        let sibling = tree.new_entity("sibling").unwrap();
        tree.append_child(root, sibling).unwrap();
        (tree, root, child)
    }

    #[test]
    fn preorder_entry_postorder_exit() {
        let (tree, root, _) = sample();
        let mut recorder = Recorder {
            events: Vec::new(),
            skip: None,
        };
        walk(&tree, root, &mut recorder).unwrap();

        assert_eq!(
            recorder.events,
            vec![
                "enter:root",
                "enter:child",
                "text:hi",
                "exit:child",
                "enter:sibling",
                "exit:sibling",
                "exit:root",
            ]
        );
    }

    #[test]
    fn suppressed_descent_still_exits() {
        let (tree, root, child) = sample();
        let mut recorder = Recorder {
            events: Vec::new(),
            skip: Some(child),
        };
        walk(&tree, root, &mut recorder).unwrap();

        assert_eq!(
            recorder.events,
            vec![
                "enter:root",
                "enter:child",
                "exit:child",
                "enter:sibling",
                "exit:sibling",
                "exit:root",
            ]
        );
    }

    #[test]
    fn stale_root_rejected() {
        let tree = XmlTree::new();
        let mut recorder = Recorder {
            events: Vec::new(),
            skip: None,
        };
        let err = walk(&tree, 0, &mut recorder).unwrap_err();
        assert!(matches!(err, XmlError::NodeNotFound(0)));
    }
}

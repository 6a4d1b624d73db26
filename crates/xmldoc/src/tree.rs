//! The arena that owns every node, and all tree mutations.
//!
//! Navigation uses `NodeId` indices instead of pointers, so the parent
//! back-reference is non-owning and the child list is the single owning
//! edge. Nodes are created detached, linked with [`XmlTree::append_child`],
//! unlinked with [`XmlTree::remove_child`], and stay allocated (reachable
//! or not) until the arena is dropped.
//!
//! Every mutation notifies the affected node's observers synchronously,
//! after the state change, before the call returns. The arena provides no
//! locking; concurrent mutation is the caller's problem.

use crate::error::{Result, XmlError};
use crate::node::{Attribute, NodeId, NodeKind, XmlNode};
use crate::observe::{EntityEvent, ObserverId, TextEvent};
use crate::visit::{walk, XmlVisitor};
use serde::{Deserialize, Serialize};

fn validated_name(s: &str) -> Result<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(XmlError::BlankName);
    }
    Ok(trimmed.to_string())
}

fn validated_value(s: &str) -> Result<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(XmlError::BlankValue);
    }
    Ok(trimmed.to_string())
}

/// Arena storage for XML nodes.
///
/// One arena may hold several disjoint trees (detached roots); a
/// [`crate::XmlDocument`] pins one entity as a document root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XmlTree {
    nodes: Vec<XmlNode>,
}

impl XmlTree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Number of allocated nodes, reachable or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Result<&XmlNode> {
        self.nodes
            .get(id as usize)
            .ok_or(XmlError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut XmlNode> {
        self.nodes
            .get_mut(id as usize)
            .ok_or(XmlError::NodeNotFound(id))
    }

    fn alloc(&mut self, node: XmlNode) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    /// Create a detached entity. The name is trimmed and must not be
    /// blank.
    pub fn new_entity(&mut self, name: &str) -> Result<NodeId> {
        let name = validated_name(name)?;
        Ok(self.alloc(XmlNode::entity(name, Vec::new())))
    }

    /// Create a detached text node. The value is trimmed and must not be
    /// blank.
    pub fn new_text(&mut self, value: &str) -> Result<NodeId> {
        let value = validated_value(value)?;
        Ok(self.alloc(XmlNode::text(value)))
    }

    /// Entity name.
    pub fn name(&self, id: NodeId) -> Result<&str> {
        self.node(id)?.name().ok_or(XmlError::NotAnEntity(id))
    }

    /// Text value.
    pub fn value(&self, id: NodeId) -> Result<&str> {
        self.node(id)?.value().ok_or(XmlError::NotAText(id))
    }

    /// Parent id, `None` for a detached node or root.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent())
    }

    /// Child ids in document order.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(self.node(id)?.children())
    }

    /// Rename an entity. Emits `NameChanged`.
    pub fn set_name(&mut self, id: NodeId, name: &str) -> Result<()> {
        let name = validated_name(name)?;
        match &mut self.node_mut(id)?.kind {
            NodeKind::Entity {
                name: slot,
                observers,
                ..
            } => {
                *slot = name;
                observers.notify(&EntityEvent::NameChanged);
            }
            NodeKind::Text { .. } => return Err(XmlError::NotAnEntity(id)),
        }
        tracing::trace!("renamed entity {}", id);
        Ok(())
    }

    /// Replace a text node's value. Emits `ValueChanged`.
    pub fn set_value(&mut self, id: NodeId, value: &str) -> Result<()> {
        let value = validated_value(value)?;
        match &mut self.node_mut(id)?.kind {
            NodeKind::Text {
                value: slot,
                observers,
            } => {
                *slot = value;
                observers.notify(&TextEvent::ValueChanged);
            }
            NodeKind::Entity { .. } => return Err(XmlError::NotAText(id)),
        }
        tracing::trace!("changed text value of {}", id);
        Ok(())
    }

    /// Insert or overwrite an attribute. Overwriting keeps the attribute's
    /// original insertion position. Emits `AttributeAppended`.
    pub fn append_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        let name = validated_name(name)?;
        match &mut self.node_mut(id)?.kind {
            NodeKind::Entity {
                attributes,
                observers,
                ..
            } => {
                match attributes.iter_mut().find(|attribute| attribute.name == name) {
                    Some(attribute) => attribute.value = value.to_string(),
                    None => attributes.push(Attribute {
                        name: name.clone(),
                        value: value.to_string(),
                    }),
                }
                observers.notify(&EntityEvent::AttributeAppended { name });
            }
            NodeKind::Text { .. } => return Err(XmlError::NotAnEntity(id)),
        }
        Ok(())
    }

    /// Remove an attribute. Removing an absent name leaves the entity
    /// unchanged, but `AttributeRemoved` fires either way.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<()> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Entity {
                attributes,
                observers,
                ..
            } => {
                attributes.retain(|attribute| attribute.name != name);
                observers.notify(&EntityEvent::AttributeRemoved {
                    name: name.to_string(),
                });
                Ok(())
            }
            NodeKind::Text { .. } => Err(XmlError::NotAnEntity(id)),
        }
    }

    /// Append `child` at the end of `parent`'s children.
    ///
    /// A node linked elsewhere is detached from its prior parent first, so
    /// the old parent notifies `ChildRemoved` before the new one notifies
    /// `ChildAppended`. Ownership transfers; it never duplicates.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(child)?;
        if !self.node(parent)?.is_entity() {
            return Err(XmlError::NotAnEntity(parent));
        }
        // ids make "append an ancestor under its own descendant"
        // expressible, which the pointer model never could
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(XmlError::WouldCycle { parent, child });
            }
            cursor = self.node(id)?.parent();
        }

        if let Some(old_parent) = self.node(child)?.parent() {
            self.detach(old_parent, child);
        }
        self.attach(parent, child);
        Ok(())
    }

    /// Unlink `child` from `parent`. A no-op, with no notification, when
    /// `child` is not currently a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(child)?;
        if !self.node(parent)?.is_entity() {
            return Err(XmlError::NotAnEntity(parent));
        }
        self.detach(parent, child);
        Ok(())
    }

    /// Link a live, detached child under a live entity. Callers uphold
    /// both preconditions.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child as usize].parent = Some(parent);
        let node = &mut self.nodes[parent as usize];
        node.children.push(child);
        if let NodeKind::Entity { observers, .. } = &mut node.kind {
            observers.notify(&EntityEvent::ChildAppended { child });
        }
        tracing::trace!("appended child {} under {}", child, parent);
    }

    /// Unlink `child` from a live entity `parent`, if linked there.
    pub(crate) fn detach(&mut self, parent: NodeId, child: NodeId) {
        let node = &mut self.nodes[parent as usize];
        let Some(position) = node.children.iter().position(|&c| c == child) else {
            return;
        };
        node.children.remove(position);
        self.nodes[child as usize].parent = None;
        if let NodeKind::Entity { observers, .. } = &mut self.nodes[parent as usize].kind {
            observers.notify(&EntityEvent::ChildRemoved { child });
        }
        tracing::trace!("removed child {} from {}", child, parent);
    }

    /// Shallow-copy a node into `dest` as a detached node: name/value and
    /// attributes travel, children and observers do not.
    pub(crate) fn copy_shallow(&self, id: NodeId, dest: &mut XmlTree) -> NodeId {
        let copy = match self[id].kind() {
            NodeKind::Entity {
                name, attributes, ..
            } => XmlNode::entity(name.clone(), attributes.clone()),
            NodeKind::Text { value, .. } => XmlNode::text(value.clone()),
        };
        dest.alloc(copy)
    }

    /// Shallow copy of an entity into `dest`.
    pub fn copy_entity_into(&self, id: NodeId, dest: &mut XmlTree) -> Result<NodeId> {
        if !self.node(id)?.is_entity() {
            return Err(XmlError::NotAnEntity(id));
        }
        Ok(self.copy_shallow(id, dest))
    }

    /// Shallow copy of a text node into `dest`.
    pub fn copy_text_into(&self, id: NodeId, dest: &mut XmlTree) -> Result<NodeId> {
        if !self.node(id)?.is_text() {
            return Err(XmlError::NotAText(id));
        }
        Ok(self.copy_shallow(id, dest))
    }

    /// Register an observer on an entity node.
    pub fn observe_entity(
        &mut self,
        id: NodeId,
        observer: impl FnMut(&EntityEvent) + 'static,
    ) -> Result<ObserverId> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Entity { observers, .. } => Ok(observers.subscribe(observer)),
            NodeKind::Text { .. } => Err(XmlError::NotAnEntity(id)),
        }
    }

    /// Register an observer on a text node.
    pub fn observe_text(
        &mut self,
        id: NodeId,
        observer: impl FnMut(&TextEvent) + 'static,
    ) -> Result<ObserverId> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Text { observers, .. } => Ok(observers.subscribe(observer)),
            NodeKind::Entity { .. } => Err(XmlError::NotAText(id)),
        }
    }

    /// Detach an entity observer. Returns whether it was still registered.
    pub fn unobserve_entity(&mut self, id: NodeId, observer: ObserverId) -> Result<bool> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Entity { observers, .. } => Ok(observers.unsubscribe(observer)),
            NodeKind::Text { .. } => Err(XmlError::NotAnEntity(id)),
        }
    }

    /// Detach a text observer. Returns whether it was still registered.
    pub fn unobserve_text(&mut self, id: NodeId, observer: ObserverId) -> Result<bool> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Text { observers, .. } => Ok(observers.unsubscribe(observer)),
            NodeKind::Entity { .. } => Err(XmlError::NotAText(id)),
        }
    }

    /// Run a visitor over the subtree rooted at `root`.
    pub fn accept<V>(&self, root: NodeId, visitor: &mut V) -> Result<()>
    where
        V: XmlVisitor + ?Sized,
    {
        walk(self, root, visitor)
    }

    /// Collect every node under `root` (inclusive) satisfying `predicate`,
    /// in pre-order encounter order.
    pub fn find<F>(&self, root: NodeId, predicate: F) -> Result<Vec<NodeId>>
    where
        F: Fn(&XmlNode) -> bool,
    {
        struct Search<F> {
            predicate: F,
            found: Vec<NodeId>,
        }

        impl<F: Fn(&XmlNode) -> bool> XmlVisitor for Search<F> {
            fn on_text(&mut self, tree: &XmlTree, id: NodeId) {
                if (self.predicate)(&tree[id]) {
                    self.found.push(id);
                }
            }

            fn on_entity_enter(&mut self, tree: &XmlTree, id: NodeId) -> bool {
                if (self.predicate)(&tree[id]) {
                    self.found.push(id);
                }
                true
            }
        }

        let mut search = Search {
            predicate,
            found: Vec::new(),
        };
        walk(self, root, &mut search)?;
        Ok(search.found)
    }
}

impl std::ops::Index<NodeId> for XmlTree {
    type Output = XmlNode;

    /// Panics on a stale id; use [`XmlTree::node`] for fallible lookup.
    fn index(&self, id: NodeId) -> &XmlNode {
        &self.nodes[id as usize]
    }
}

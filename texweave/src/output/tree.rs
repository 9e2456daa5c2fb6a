//! Arena holding every output node of one conversion.
//!
//! Nodes are addressed by [`NodeId`]. A node is owned by at most one parent, either as an
//! argument or as a body child; the `parent` field is a back-reference, not an ownership
//! edge. [`OutputTree::attach`] moves a node: it is removed from its previous owner before
//! being appended to the new one, so it is never listed twice and never orphaned.

use super::nodes::NodeKind;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Index of a node inside an [`OutputTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which of the parent's lists a node is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Argument,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    #[error("node {child} cannot be attached under itself or its own descendant {parent}")]
    Cycle { parent: NodeId, child: NodeId },
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputNode {
    pub kind: NodeKind,
    args: Vec<NodeId>,
    children: Vec<NodeId>,
    #[serde(skip)]
    parent: Option<(NodeId, Slot)>,
}

impl OutputNode {
    pub fn args(&self) -> &[NodeId] {
        &self.args
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent.map(|(id, _)| id)
    }

    pub fn slot(&self) -> Option<Slot> {
        self.parent.map(|(_, slot)| slot)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OutputTree {
    nodes: Vec<OutputNode>,
}

impl OutputTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached node.
    pub fn insert(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(OutputNode {
            kind,
            args: Vec::new(),
            children: Vec::new(),
            parent: None,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&OutputNode> {
        self.nodes.get(id.0)
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|node| &node.kind)
    }

    pub fn kind_mut(&mut self, id: NodeId) -> Option<&mut NodeKind> {
        self.nodes.get_mut(id.0).map(|node| &mut node.kind)
    }

    pub fn add_argument(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.attach(parent, child, Slot::Argument)
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.attach(parent, child, Slot::Child)
    }

    /// Append `child` to `parent`'s list for `slot`, detaching it from any previous owner.
    pub fn attach(&mut self, parent: NodeId, child: NodeId, slot: Slot) -> Result<(), TreeError> {
        self.check(parent)?;
        self.check(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(TreeError::Cycle { parent, child });
        }
        self.detach(child);
        let owner = &mut self.nodes[parent.0];
        match slot {
            Slot::Argument => owner.args.push(child),
            Slot::Child => owner.children.push(child),
        }
        self.nodes[child.0].parent = Some((parent, slot));
        Ok(())
    }

    /// Remove `id` from its owner's list. Detached nodes are left untouched.
    pub fn detach(&mut self, id: NodeId) {
        let Some((parent, slot)) = self.nodes.get_mut(id.0).and_then(|n| n.parent.take()) else {
            return;
        };
        let owner = &mut self.nodes[parent.0];
        let list = match slot {
            Slot::Argument => &mut owner.args,
            Slot::Child => &mut owner.children,
        };
        if let Some(pos) = list.iter().position(|&n| n == id) {
            list.remove(pos);
        }
    }

    /// Whether `candidate` is `node` or one of its ancestors.
    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.nodes[id.0].parent();
        }
        false
    }

    fn check(&self, id: NodeId) -> Result<(), TreeError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(TreeError::UnknownNode(id))
        }
    }
}

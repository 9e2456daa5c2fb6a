//! Phase one: build the output tree
//!
//!     Each source node is dispatched through the [`Reader`]. A `Produced` node gets its
//!     source arguments and then its content converted, each under its own fork of the
//!     context, and attached in order; an `Opaque` node is used as-is.
//!
//!     Two walks produce the same tree:
//!
//!     - [`Traversal::Recursive`] follows the call stack.
//!     - [`Traversal::Iterative`] keeps a stack of open frames, each holding the produced
//!       node, its context and the source children still to convert. Nesting depth is then
//!       bounded by memory instead of the thread's stack.

use crate::context::Context;
use crate::diagnostics::Diagnostic;
use crate::error::ConvertError;
use crate::options::Traversal;
use crate::output::{render, NodeId, OutputTree, RenderEnv, Slot};
use crate::reader::Reader;
use crate::source::SourceNode;
use std::collections::HashMap;

/// Result of phase one.
#[derive(Debug)]
pub struct Conversion {
    pub tree: OutputTree,
    pub root: NodeId,
    /// Label id -> tag, complete once the whole document was traversed
    pub labels: HashMap<String, String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Conversion {
    /// Run phase two over the finished tree.
    pub fn render(&self, env: &RenderEnv<'_>) -> String {
        let env = RenderEnv {
            labels: Some(&self.labels),
            ..env.clone()
        };
        render(&self.tree, self.root, &env)
    }
}

/// Convert `source` with the visitors of `reader`.
pub fn convert(
    source: &SourceNode,
    reader: &mut Reader,
    traversal: Traversal,
) -> Result<Conversion, ConvertError> {
    let mut ctx = Context::new();
    let root = match traversal {
        Traversal::Recursive => convert_recursive(source, reader, &mut ctx)?,
        Traversal::Iterative => convert_iterative(source, reader, ctx.clone())?,
    };
    let state = ctx.take_state();
    log::debug!(
        "converted {} nodes ({:?}), {} labels, {} diagnostics",
        state.tree.len(),
        traversal,
        state.labels.len(),
        state.diagnostics.len()
    );
    Ok(Conversion {
        tree: state.tree,
        root,
        labels: state.labels,
        diagnostics: state.diagnostics,
    })
}

/// Source arguments then content, each tagged with the slot it lands in.
fn pending(node: &SourceNode) -> Vec<(&SourceNode, Slot)> {
    match node {
        SourceNode::Environment(group) | SourceNode::Command(group) => group
            .args
            .iter()
            .map(|arg| (arg, Slot::Argument))
            .chain(group.content.iter().map(|child| (child, Slot::Child)))
            .collect(),
        SourceNode::Token(_) => Vec::new(),
    }
}

/// Dispatch one node; the flag tells whether its source children must be converted too.
fn dispatch(
    node: &SourceNode,
    reader: &mut Reader,
    ctx: &mut Context,
) -> Result<(NodeId, bool), ConvertError> {
    let result = reader.dispatch(node, ctx)?;
    let id = result.node().ok_or_else(|| ConvertError::ChainExhausted {
        construct: node.describe(),
    })?;
    let descend = result.recurse() && !matches!(node, SourceNode::Token(_));
    Ok((id, descend))
}

fn convert_recursive(
    node: &SourceNode,
    reader: &mut Reader,
    ctx: &mut Context,
) -> Result<NodeId, ConvertError> {
    let (id, descend) = dispatch(node, reader, ctx)?;
    if descend {
        for (child, slot) in pending(node) {
            let mut child_ctx = ctx.fork(id);
            let converted = convert_recursive(child, reader, &mut child_ctx)?;
            ctx.attach(id, converted, slot)?;
        }
    }
    Ok(id)
}

/// An open node of the iterative walk.
struct Frame<'s> {
    id: NodeId,
    ctx: Context,
    pending: std::vec::IntoIter<(&'s SourceNode, Slot)>,
    /// Where the finished node attaches in its parent
    slot: Slot,
}

fn convert_iterative<'s>(
    source: &'s SourceNode,
    reader: &mut Reader,
    mut ctx: Context,
) -> Result<NodeId, ConvertError> {
    let (root, descend) = dispatch(source, reader, &mut ctx)?;
    if !descend {
        return Ok(root);
    }
    let mut stack = vec![Frame {
        id: root,
        ctx,
        pending: pending(source).into_iter(),
        slot: Slot::Child,
    }];

    while let Some(frame) = stack.last_mut() {
        if let Some((node, slot)) = frame.pending.next() {
            let mut child_ctx = frame.ctx.fork(frame.id);
            let (id, descend) = dispatch(node, reader, &mut child_ctx)?;
            if descend {
                stack.push(Frame {
                    id,
                    ctx: child_ctx,
                    pending: pending(node).into_iter(),
                    slot,
                });
            } else {
                frame.ctx.attach(frame.id, id, slot)?;
            }
            continue;
        }

        let Some(done) = stack.pop() else { break };
        match stack.last() {
            Some(parent) => parent.ctx.attach(parent.id, done.id, done.slot)?,
            None => return Ok(done.id),
        }
    }
    Ok(root)
}

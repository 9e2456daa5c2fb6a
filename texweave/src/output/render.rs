//! Phase two: serialize a finished output tree.
//!
//! The tree is walked bottom-up with an explicit stack, so rendering depth is not bounded
//! by the call stack. References are resolved here by plain lookups in the completed
//! label table.

use super::nodes::{RenderEnv, Rendered};
use super::tree::{NodeId, OutputTree};

/// Render the subtree rooted at `root`.
pub fn render(tree: &OutputTree, root: NodeId, env: &RenderEnv<'_>) -> String {
    let mut rendered: Vec<Option<String>> = vec![None; tree.len()];
    let mut stack = vec![(root, false)];

    while let Some((id, expanded)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        if !expanded {
            stack.push((id, true));
            for &child in node.children().iter().rev() {
                stack.push((child, false));
            }
            for &arg in node.args().iter().rev() {
                stack.push((arg, false));
            }
            continue;
        }

        let take = |ids: &[NodeId], rendered: &mut Vec<Option<String>>| -> Vec<String> {
            ids.iter()
                .map(|id| rendered[id.index()].take().unwrap_or_default())
                .collect()
        };
        let arg_markup = take(node.args(), &mut rendered);
        let child_markup = take(node.children(), &mut rendered);
        let args = pair(tree, node.args(), &arg_markup);
        let children = pair(tree, node.children(), &child_markup);

        rendered[id.index()] = Some(node.kind.render(&args, &children, env));
    }

    rendered
        .get_mut(root.index())
        .and_then(Option::take)
        .unwrap_or_default()
}

fn pair<'a>(tree: &'a OutputTree, ids: &[NodeId], markup: &'a [String]) -> Vec<Rendered<'a>> {
    ids.iter()
        .zip(markup)
        .filter_map(|(&id, markup)| {
            tree.kind(id).map(|kind| Rendered {
                kind,
                markup: markup.as_str(),
            })
        })
        .collect()
}

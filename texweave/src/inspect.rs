//! Debugging views of the source and output trees
//!
//! Treeviz encodes nesting with box-drawing connectors, one node per line:
//!
//!     <prefix><connector> <icon> <label> (truncated to 30 characters)
//!
//! Example (output tree):
//!
//! ⧉ root
//! └─ ⧉ document
//!    ├─ § section 1
//!    │  └─ { braces
//!    │     └─ ◦ Introduction
//!    ├─ ∴ theorem Theorem 1.1
//!    └─ ◦ See also
//!
//! Icons
//!     Structure:  root/document ⧉, section §, theorem ∴, proof □, list ☰, item •
//!     Groups:     braces {, options [, styled 𝐼, maketitle ⊤
//!     Leaves:     text/markup ◦, raw 𝒱, math √, hidden ∅
//!     References: label #, ref ⊕, cite †, bibliography ☷
//!
//! The JSON views are for tooling: the source tree in its input shape, the output tree
//! nested with `args` and `children` lists.

use crate::error::ConvertError;
use crate::output::{Kind, NodeId, NodeKind, OutputTree};
use crate::source::{SourceNode, TokenCategory};
use serde_json::{json, Value};

const LABEL_WIDTH: usize = 30;

/// Icon for an output node kind
pub fn get_icon(kind: Kind) -> &'static str {
    match kind {
        Kind::Root | Kind::Document => "⧉",
        Kind::Section | Kind::StarredSection => "§",
        Kind::Theorem => "∴",
        Kind::Proof => "□",
        Kind::Enumerate | Kind::Itemize => "☰",
        Kind::Item | Kind::Bibitem => "•",
        Kind::Braces => "{",
        Kind::Options => "[",
        Kind::Styled | Kind::Emphasis => "𝐼",
        Kind::MakeTitle | Kind::Title => "⊤",
        Kind::Text | Kind::Markup => "◦",
        Kind::Raw => "𝒱",
        Kind::Math => "√",
        Kind::Hidden => "∅",
        Kind::Label => "#",
        Kind::Ref => "⊕",
        Kind::Cite => "†",
        Kind::Bibliography => "☷",
        Kind::Abstract | Kind::Author | Kind::Address => "○",
    }
}

fn truncate(text: &str) -> String {
    let flat = text.replace('\n', "↵");
    if flat.chars().count() <= LABEL_WIDTH {
        return flat;
    }
    let mut out: String = flat.chars().take(LABEL_WIDTH - 1).collect();
    out.push('…');
    out
}

fn output_label(kind: &NodeKind) -> String {
    let detail = match kind {
        NodeKind::Text { text } => return truncate(text),
        NodeKind::Markup { html } => return truncate(html),
        NodeKind::Raw { source } => return truncate(source),
        NodeKind::Section { number, .. } => number.to_string(),
        NodeKind::Theorem { name, tag, .. } => match tag {
            Some(tag) => format!("{name} {tag}"),
            None => name.clone(),
        },
        NodeKind::Styled { style } => format!("{style:?}").to_lowercase(),
        NodeKind::Label { id, .. } => id.clone(),
        NodeKind::Ref { label } => label.clone(),
        NodeKind::Cite { keys } => keys.join(", "),
        NodeKind::Bibitem { key, .. } => key.clone(),
        NodeKind::Math { delimiter } => delimiter.clone(),
        NodeKind::Braces { italic: true } => "italic".to_string(),
        _ => String::new(),
    };
    if detail.is_empty() {
        kind.label().to_string()
    } else {
        truncate(&format!("{} {detail}", kind.label()))
    }
}

/// Indented tree of the output, starting at `root`.
pub fn output_treeviz(tree: &OutputTree, root: NodeId) -> String {
    let mut out = String::new();
    let Some(node) = tree.get(root) else {
        return out;
    };
    out.push_str(&format!(
        "{} {}\n",
        get_icon(node.kind.kind()),
        output_label(&node.kind)
    ));
    let parts: Vec<_> = node.args().iter().chain(node.children()).copied().collect();
    for (i, &id) in parts.iter().enumerate() {
        format_output_node(tree, id, "", i + 1 == parts.len(), &mut out);
    }
    out
}

fn format_output_node(tree: &OutputTree, id: NodeId, prefix: &str, is_last: bool, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let connector = if is_last { "└─" } else { "├─" };
    out.push_str(&format!(
        "{prefix}{connector} {} {}\n",
        get_icon(node.kind.kind()),
        output_label(&node.kind)
    ));
    let child_prefix = format!("{prefix}{}", if is_last { "   " } else { "│  " });
    let parts: Vec<_> = node.args().iter().chain(node.children()).copied().collect();
    for (i, &child) in parts.iter().enumerate() {
        format_output_node(tree, child, &child_prefix, i + 1 == parts.len(), out);
    }
}

fn source_line(node: &SourceNode) -> (&'static str, String) {
    match node {
        SourceNode::Environment(g) => ("⊞", truncate(&g.name)),
        SourceNode::Command(g) => ("ƒ", truncate(&format!("\\{}", g.name))),
        SourceNode::Token(t) => {
            let icon = match t.category {
                TokenCategory::Text => "◦",
                TokenCategory::Comment => "%",
                TokenCategory::EscapedLiteral => "\\",
            };
            (icon, truncate(&t.text))
        }
    }
}

fn source_parts(node: &SourceNode) -> Vec<&SourceNode> {
    match node {
        SourceNode::Environment(g) | SourceNode::Command(g) => {
            g.args.iter().chain(&g.content).collect()
        }
        SourceNode::Token(_) => Vec::new(),
    }
}

/// Indented tree of the parsed source.
pub fn source_treeviz(source: &SourceNode) -> String {
    let (icon, label) = source_line(source);
    let mut out = format!("{icon} {label}\n");
    let parts = source_parts(source);
    for (i, part) in parts.iter().enumerate() {
        format_source_node(part, "", i + 1 == parts.len(), &mut out);
    }
    out
}

fn format_source_node(node: &SourceNode, prefix: &str, is_last: bool, out: &mut String) {
    let connector = if is_last { "└─" } else { "├─" };
    let (icon, label) = source_line(node);
    out.push_str(&format!("{prefix}{connector} {icon} {label}\n"));
    let child_prefix = format!("{prefix}{}", if is_last { "   " } else { "│  " });
    let parts = source_parts(node);
    for (i, part) in parts.iter().enumerate() {
        format_source_node(part, &child_prefix, i + 1 == parts.len(), out);
    }
}

/// The source tree as pretty-printed JSON, in the shape the converter reads.
pub fn source_json(source: &SourceNode) -> Result<String, ConvertError> {
    Ok(serde_json::to_string_pretty(source)?)
}

/// The output tree as nested, pretty-printed JSON.
pub fn output_json(tree: &OutputTree, root: NodeId) -> Result<String, ConvertError> {
    Ok(serde_json::to_string_pretty(&output_value(tree, root)?)?)
}

fn output_value(tree: &OutputTree, id: NodeId) -> Result<Value, ConvertError> {
    let Some(node) = tree.get(id) else {
        return Ok(Value::Null);
    };
    let mut value = serde_json::to_value(&node.kind)?;
    let nested = |ids: &[NodeId]| -> Result<Vec<Value>, ConvertError> {
        ids.iter().map(|&child| output_value(tree, child)).collect()
    };
    if let Value::Object(map) = &mut value {
        if !node.args().is_empty() {
            map.insert("args".to_string(), json!(nested(node.args())?));
        }
        if !node.children().is_empty() {
            map.insert("children".to_string(), json!(nested(node.children())?));
        }
    }
    Ok(value)
}

//! Base markup visitor
//!
//! Handles document structure, sectioning, lists, front matter, references and plain text.
//! Numbering and label tags are read from the context history, so this visitor keeps no
//! state of its own.

use super::required_text;
use crate::context::Context;
use crate::error::ConvertError;
use crate::output::{Kind, NodeKind, Style, UNRESOLVED};
use crate::source::{Group, Token, TokenCategory, BRACE_GROUP, BRACKET_GROUP, ROOT};
use crate::visitor::{VisitResult, Visitor};
use html_escape::encode_text;

const BASE_CSS: &str = include_str!("../../assets/css/base.css");
const POPUP_JS: &str = include_str!("../../assets/js/popup.js");

/// Kinds that expose a tag to `\label` while open.
const TAGGED: [Kind; 3] = [Kind::Section, Kind::StarredSection, Kind::Theorem];

/// Kinds whose tag stays active after they are closed.
const SECTIONING: [Kind; 2] = [Kind::Section, Kind::StarredSection];

/// Commands that only matter to a TeX engine.
const HIDDEN_COMMANDS: [&str; 4] = ["documentclass", "usepackage", "hspace", "vspace"];

#[derive(Debug, Default)]
pub struct TexVisitor;

impl Visitor for TexVisitor {
    fn name(&self) -> &str {
        "tex"
    }

    fn handle_environment(
        &mut self,
        env: &Group,
        ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        let kind = match env.name.as_str() {
            ROOT => NodeKind::Root,
            "document" => NodeKind::Document,
            "proof" => NodeKind::Proof,
            "enumerate" => NodeKind::Enumerate,
            "itemize" => NodeKind::Itemize,
            "abstract" => NodeKind::Abstract,
            "thebibliography" => NodeKind::Bibliography,
            BRACKET_GROUP => NodeKind::Options,
            BRACE_GROUP => NodeKind::Braces { italic: false },
            _ => return Ok(VisitResult::NoMatch),
        };
        Ok(VisitResult::Produced(ctx.produce(kind)))
    }

    fn handle_command(
        &mut self,
        cmd: &Group,
        ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        let name = cmd.name.as_str();
        if HIDDEN_COMMANDS.contains(&name) {
            return Ok(VisitResult::Opaque(ctx.produce(NodeKind::Hidden)));
        }
        let kind = match name {
            "section" => {
                let previous = ctx
                    .most_recent_of_kind(Kind::Section)
                    .and_then(|id| {
                        ctx.inspect(id, |kind| match kind {
                            NodeKind::Section { number, .. } => Some(*number),
                            _ => None,
                        })
                    })
                    .flatten()
                    .unwrap_or(0);
                NodeKind::Section {
                    number: previous + 1,
                    anchor: None,
                }
            }
            "section*" => NodeKind::StarredSection { anchor: None },
            "item" => NodeKind::Item,
            "title" => NodeKind::Title,
            "author" => NodeKind::Author,
            "address" => NodeKind::Address,
            "emph" => NodeKind::Styled { style: Style::Emph },
            "textit" => NodeKind::Styled {
                style: Style::Italic,
            },
            "textbf" => NodeKind::Styled { style: Style::Bold },
            "maketitle" => return make_title(ctx),
            "label" => return label(cmd, ctx),
            "em" => return emphasis(ctx),
            "ref" => {
                let label = required_text(cmd, 0, "label key", ctx)?;
                return Ok(VisitResult::Opaque(ctx.produce(NodeKind::Ref { label })));
            }
            "cite" => {
                let keys = required_text(cmd, 0, "citation key", ctx)?
                    .split(',')
                    .map(str::trim)
                    .filter(|key| !key.is_empty())
                    .map(str::to_string)
                    .collect();
                return Ok(VisitResult::Opaque(ctx.produce(NodeKind::Cite { keys })));
            }
            "bibitem" => {
                let key = required_text(cmd, 0, "bibliography key", ctx)?;
                let display = cmd
                    .bracket_arg()
                    .map(|opt| opt.inner_source().trim().to_string())
                    .filter(|display| !display.is_empty())
                    .unwrap_or_else(|| key.clone());
                return Ok(VisitResult::Opaque(
                    ctx.produce(NodeKind::Bibitem { key, display }),
                ));
            }
            "pageref" => {
                return Err(ConvertError::Unsupported {
                    construct: "\\pageref".to_string(),
                    reason: "page references have no meaning in HTML output".to_string(),
                    path: ctx.ancestor_path(),
                })
            }
            _ => return Ok(VisitResult::NoMatch),
        };
        Ok(VisitResult::Produced(ctx.produce(kind)))
    }

    fn handle_token(
        &mut self,
        token: &Token,
        ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        let kind = match token.category {
            TokenCategory::Text => NodeKind::markup(typeset(&token.text)),
            TokenCategory::Comment => NodeKind::Hidden,
            TokenCategory::EscapedLiteral => match token.text.as_str() {
                "\\\\" => NodeKind::markup("<br>"),
                // a bare dollar would open inline math on the client
                "\\$" => NodeKind::text("\\$"),
                text => NodeKind::text(text.strip_prefix('\\').unwrap_or(text)),
            },
        };
        Ok(VisitResult::Opaque(ctx.produce(kind)))
    }

    fn global_style(&self) -> String {
        BASE_CSS.to_string()
    }

    fn global_script(&self) -> String {
        format!("<script>\n{POPUP_JS}</script>")
    }
}

/// Escape text-mode prose and apply its typographic replacements.
fn typeset(text: &str) -> String {
    encode_text(text)
        .replace("\n\n", "<hr>")
        .replace("``", "“")
        .replace("''", "”")
}

/// `\maketitle` adopts the title, authors and addresses produced so far, in document order.
fn make_title(ctx: &mut Context) -> Result<VisitResult, ConvertError> {
    let title = ctx.most_recent_of_kind(Kind::Title);
    let authors = ctx.all_of_kind(Kind::Author);
    let addresses = ctx.all_of_kind(Kind::Address);

    let id = ctx.produce(NodeKind::MakeTitle);
    for part in title
        .into_iter()
        .chain(authors.into_iter().rev())
        .chain(addresses.into_iter().rev())
    {
        ctx.adopt(id, part)?;
    }
    Ok(VisitResult::Opaque(id))
}

/// `\label{key}` captures the tag active right now and anchors the tagged node.
fn label(cmd: &Group, ctx: &mut Context) -> Result<VisitResult, ConvertError> {
    let key = required_text(cmd, 0, "label key", ctx)?;
    let tagged = ctx
        .ancestor_where(|kind| TAGGED.contains(&kind.kind()))
        .or_else(|| ctx.most_recent_of_kinds(&SECTIONING));
    let tag = tagged
        .and_then(|id| ctx.tag_of(id))
        .unwrap_or_else(|| UNRESOLVED.to_string());
    log::trace!("label '{key}' -> {tag}");
    ctx.register_label(key.clone(), tag);

    let anchored = tagged
        .and_then(|id| ctx.update(id, |kind| kind.set_anchor(&key)))
        .unwrap_or(false);
    let id = ctx.produce(NodeKind::Label {
        id: key,
        standalone: !anchored,
    });
    Ok(VisitResult::Opaque(id))
}

/// `\em` italicizes the brace group directly containing it.
fn emphasis(ctx: &mut Context) -> Result<VisitResult, ConvertError> {
    if let Some(parent) = ctx.parent() {
        ctx.update(parent, |kind| {
            if let NodeKind::Braces { italic } = kind {
                *italic = true;
            }
        });
    }
    Ok(VisitResult::Opaque(ctx.produce(NodeKind::Emphasis)))
}

//! Output node kinds and their HTML markup.
//!
//! Every kind renders from its own fields plus the already-rendered markup of its
//! arguments and children ([`Rendered`]). Nothing here reaches back into ancestors;
//! document-wide information (the label table, the shell fragments) is handed in
//! through [`RenderEnv`].

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;
use std::collections::HashMap;

/// Tag shown for references that cannot be resolved and for unnumbered constructs.
pub const UNRESOLVED: &str = "??";

/// The closed set of output node kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// Whole document; renders the HTML shell
    Root,
    /// `document` environment
    Document,
    /// Produces no markup (preamble commands, declarations)
    Hidden,
    /// Plain text, escaped on output
    Text { text: String },
    /// Trusted markup emitted as-is
    Markup { html: String },
    /// Raw source passed through untouched (escaped on output)
    Raw { source: String },
    /// `{...}`; italic when it directly contains `\em`
    Braces { italic: bool },
    /// `[...]` option group
    Options,
    /// `\em` switch
    Emphasis,
    Styled { style: Style },
    Label { id: String, standalone: bool },
    Ref { label: String },
    Cite { keys: Vec<String> },
    Bibliography,
    Bibitem { key: String, display: String },
    Abstract,
    Title,
    Author,
    Address,
    MakeTitle,
    Enumerate,
    Itemize,
    Item,
    Proof,
    Section { number: u32, anchor: Option<String> },
    StarredSection { anchor: Option<String> },
    Math { delimiter: String },
    Theorem {
        name: String,
        tag: Option<String>,
        anchor: Option<String>,
    },
}

/// Fieldless mirror of [`NodeKind`], used for context lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Root,
    Document,
    Hidden,
    Text,
    Markup,
    Raw,
    Braces,
    Options,
    Emphasis,
    Styled,
    Label,
    Ref,
    Cite,
    Bibliography,
    Bibitem,
    Abstract,
    Title,
    Author,
    Address,
    MakeTitle,
    Enumerate,
    Itemize,
    Item,
    Proof,
    Section,
    StarredSection,
    Math,
    Theorem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Emph,
    Italic,
    Bold,
}

impl Style {
    fn element(self) -> &'static str {
        match self {
            Style::Emph => "em",
            Style::Italic => "i",
            Style::Bold => "strong",
        }
    }
}

/// Markup of an already-rendered argument or child, with the kind that produced it.
#[derive(Debug, Clone, Copy)]
pub struct Rendered<'a> {
    pub kind: &'a NodeKind,
    pub markup: &'a str,
}

/// Document-wide inputs of the render phase.
#[derive(Debug, Clone, Default)]
pub struct RenderEnv<'a> {
    pub labels: Option<&'a HashMap<String, String>>,
    pub title: &'a str,
    pub styles: &'a str,
    pub scripts: &'a str,
}

impl NodeKind {
    pub fn text(text: impl Into<String>) -> Self {
        NodeKind::Text { text: text.into() }
    }

    pub fn markup(html: impl Into<String>) -> Self {
        NodeKind::Markup { html: html.into() }
    }

    pub fn raw(source: impl Into<String>) -> Self {
        NodeKind::Raw {
            source: source.into(),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            NodeKind::Root => Kind::Root,
            NodeKind::Document => Kind::Document,
            NodeKind::Hidden => Kind::Hidden,
            NodeKind::Text { .. } => Kind::Text,
            NodeKind::Markup { .. } => Kind::Markup,
            NodeKind::Raw { .. } => Kind::Raw,
            NodeKind::Braces { .. } => Kind::Braces,
            NodeKind::Options => Kind::Options,
            NodeKind::Emphasis => Kind::Emphasis,
            NodeKind::Styled { .. } => Kind::Styled,
            NodeKind::Label { .. } => Kind::Label,
            NodeKind::Ref { .. } => Kind::Ref,
            NodeKind::Cite { .. } => Kind::Cite,
            NodeKind::Bibliography => Kind::Bibliography,
            NodeKind::Bibitem { .. } => Kind::Bibitem,
            NodeKind::Abstract => Kind::Abstract,
            NodeKind::Title => Kind::Title,
            NodeKind::Author => Kind::Author,
            NodeKind::Address => Kind::Address,
            NodeKind::MakeTitle => Kind::MakeTitle,
            NodeKind::Enumerate => Kind::Enumerate,
            NodeKind::Itemize => Kind::Itemize,
            NodeKind::Item => Kind::Item,
            NodeKind::Proof => Kind::Proof,
            NodeKind::Section { .. } => Kind::Section,
            NodeKind::StarredSection { .. } => Kind::StarredSection,
            NodeKind::Math { .. } => Kind::Math,
            NodeKind::Theorem { .. } => Kind::Theorem,
        }
    }

    /// Numbering tag exposed to labels, for kinds that carry one.
    pub fn tag(&self) -> Option<String> {
        match self {
            NodeKind::Section { number, .. } => Some(number.to_string()),
            NodeKind::StarredSection { .. } => Some(UNRESOLVED.to_string()),
            NodeKind::Theorem { tag, .. } => {
                Some(tag.clone().unwrap_or_else(|| UNRESOLVED.to_string()))
            }
            _ => None,
        }
    }

    /// Give a tagged node the id a label points at. Only the first label wins.
    pub fn set_anchor(&mut self, id: &str) -> bool {
        match self {
            NodeKind::Section { anchor, .. }
            | NodeKind::StarredSection { anchor }
            | NodeKind::Theorem { anchor, .. }
                if anchor.is_none() =>
            {
                *anchor = Some(id.to_string());
                true
            }
            _ => false,
        }
    }

    /// Short name used in ancestor paths, diagnostics and tree views.
    pub fn label(&self) -> &'static str {
        match self.kind() {
            Kind::Root => "root",
            Kind::Document => "document",
            Kind::Hidden => "hidden",
            Kind::Text => "text",
            Kind::Markup => "markup",
            Kind::Raw => "raw",
            Kind::Braces => "braces",
            Kind::Options => "options",
            Kind::Emphasis => "emphasis",
            Kind::Styled => "styled",
            Kind::Label => "label",
            Kind::Ref => "ref",
            Kind::Cite => "cite",
            Kind::Bibliography => "bibliography",
            Kind::Bibitem => "bibitem",
            Kind::Abstract => "abstract",
            Kind::Title => "title",
            Kind::Author => "author",
            Kind::Address => "address",
            Kind::MakeTitle => "maketitle",
            Kind::Enumerate => "enumerate",
            Kind::Itemize => "itemize",
            Kind::Item => "item",
            Kind::Proof => "proof",
            Kind::Section => "section",
            Kind::StarredSection => "section*",
            Kind::Math => "math",
            Kind::Theorem => "theorem",
        }
    }

    pub fn render(
        &self,
        args: &[Rendered<'_>],
        children: &[Rendered<'_>],
        env: &RenderEnv<'_>,
    ) -> String {
        let body = || concat(children);
        match self {
            NodeKind::Root => render_shell(&body(), env),
            NodeKind::Document | NodeKind::Options => body(),
            NodeKind::Hidden | NodeKind::Emphasis => String::new(),
            NodeKind::Text { text } => encode_text(text).into_owned(),
            NodeKind::Markup { html } => html.clone(),
            NodeKind::Raw { source } => encode_text(source).into_owned(),
            NodeKind::Braces { italic: true } => format!("<i>{}</i>", body()),
            NodeKind::Braces { italic: false } => body(),
            NodeKind::Styled { style } => {
                let el = style.element();
                format!("<{el}>{}{}</{el}>", concat(args), body())
            }
            NodeKind::Label { id, standalone } => {
                if *standalone {
                    format!("<span id=\"{}\"></span>", attr(id))
                } else {
                    String::new()
                }
            }
            NodeKind::Ref { label } => {
                let tag = env
                    .labels
                    .and_then(|labels| labels.get(label))
                    .map(String::as_str)
                    .unwrap_or(UNRESOLVED);
                format!(
                    "<a class=\"ref\" href=\"#{}\">{}</a>",
                    attr(label),
                    encode_text(tag)
                )
            }
            NodeKind::Cite { keys } => keys
                .iter()
                .map(|key| {
                    format!(
                        "<a class=\"cite\" href=\"#{}\">[{}]</a>",
                        attr(key),
                        encode_text(key)
                    )
                })
                .collect::<Vec<_>>()
                .join(", "),
            NodeKind::Bibliography => render_bibliography(children),
            NodeKind::Bibitem { display, .. } => encode_text(display).into_owned(),
            NodeKind::Abstract => {
                format!("<div class=\"abstract\"><h3>Abstract</h3>{}</div>", body())
            }
            NodeKind::Title => format!("<h1>{}</h1>", required(args)),
            NodeKind::Author => format!("<div class=\"author\">{}</div>", required(args)),
            NodeKind::Address => format!("<div class=\"address\">{}</div>", required(args)),
            NodeKind::MakeTitle => format!("<div class=\"maketitle\">{}</div>", body()),
            NodeKind::Enumerate => format!("<ol>{}</ol>", body()),
            NodeKind::Itemize => format!("<ul>{}</ul>", body()),
            NodeKind::Item => format!("<li>{}</li>", body()),
            NodeKind::Proof => format!(
                "<details><summary>Proof</summary><div class=\"proof-content\">{} □</div></details>",
                body()
            ),
            NodeKind::Section { number, anchor } => format!(
                "<h2{}>{number} {}</h2>{}",
                id_attr(anchor),
                required(args),
                body()
            ),
            NodeKind::StarredSection { anchor } => {
                format!("<h2{}>{}</h2>{}", id_attr(anchor), required(args), body())
            }
            NodeKind::Math { delimiter } => format!("{delimiter}{}{delimiter}", body()),
            NodeKind::Theorem { name, tag, anchor } => {
                let mut heading = encode_text(name).into_owned();
                if let Some(tag) = tag {
                    heading.push(' ');
                    heading.push_str(tag);
                }
                let note = concat_where(args, |kind| kind == Kind::Options);
                if !note.is_empty() {
                    heading.push_str(&format!(" ({note})"));
                }
                format!(
                    "<div class=\"theorem\"{}><span class=\"theorem-label\">{heading}.</span> {}</div>",
                    id_attr(anchor),
                    body()
                )
            }
        }
    }
}

fn concat(parts: &[Rendered<'_>]) -> String {
    parts.iter().map(|part| part.markup).collect()
}

fn concat_where(parts: &[Rendered<'_>], keep: impl Fn(Kind) -> bool) -> String {
    parts
        .iter()
        .filter(|part| keep(part.kind.kind()))
        .map(|part| part.markup)
        .collect()
}

/// Mandatory arguments only; bracket options are not part of a title or heading.
fn required(args: &[Rendered<'_>]) -> String {
    concat_where(args, |kind| kind != Kind::Options)
}

fn attr(value: &str) -> String {
    encode_double_quoted_attribute(value).into_owned()
}

fn id_attr(anchor: &Option<String>) -> String {
    anchor
        .as_deref()
        .map(|id| format!(" id=\"{}\"", attr(id)))
        .unwrap_or_default()
}

/// Group a flat child list into `(bibitem, entry body)` pairs in one ordered pass.
fn render_bibliography(children: &[Rendered<'_>]) -> String {
    let mut html = String::from("<h2>Bibliography</h2>");
    let mut entries: Vec<(&str, &str, String)> = Vec::new();
    for child in children {
        match child.kind {
            NodeKind::Bibitem { key, display } => entries.push((key, display, String::new())),
            _ => match entries.last_mut() {
                Some((_, _, content)) => content.push_str(child.markup),
                None => html.push_str(child.markup),
            },
        }
    }
    for (key, display, content) in entries {
        html.push_str(&format!(
            "<div class=\"references\"><div class=\"reference-item\">\
             <span class=\"ref-label\">[{}]</span>\
             <div class=\"ref-content\" id=\"{}\">{content}</div>\
             </div></div>",
            encode_text(display),
            attr(key)
        ));
    }
    html
}

fn render_shell(body: &str, env: &RenderEnv<'_>) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <meta name=\"generator\" content=\"texweave\">\n\
         <title>{}</title>\n{}\n<style>\n{}\n</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        encode_text(env.title),
        env.scripts,
        env.styles
    )
}

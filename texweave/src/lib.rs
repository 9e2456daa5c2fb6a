//! Interactive HTML from parsed LaTeX-like documents
//!
//!     The input is a document tree produced by an external LaTeX parser (environments, commands
//!     and tokens, read from JSON). The output is a single self-contained HTML page: numbered
//!     sections and theorems, collapsible proofs, hover popups on references and citations, and
//!     math left in place for a client-side renderer.
//!
//! Architecture
//!
//!     Conversion runs in two phases:
//!
//!     1. Convert (./convert.rs): every source node is dispatched through a chain of visitors
//!        (./reader.rs). The first visitor that recognizes the node produces an output node; the
//!        fallback visitor at the end of the chain recognizes everything. Visitors see a
//!        [`Context`] that scopes values along the nesting and shares document-wide state
//!        (output tree, creation history, label table, diagnostics).
//!     2. Render (./output/render.rs): the finished output tree is rendered bottom-up. Only
//!        here are label references resolved, so forward references work.
//!
//!     Extensions (`amsthm`, `amsmath`) join the chain when the document asks for them with
//!     `\usepackage`, or when preloaded through [`ConvertOptions`].
//!
//!     This is a pure lib: no printing, no environment variables, no file access. The shell
//!     lives in texweave-cli.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── source.rs               # input tree, JSON shape and source reconstruction
//!     ├── context.rs              # scoped values, ancestors, document state
//!     ├── visitor.rs              # Visitor trait and VisitResult
//!     ├── reader.rs               # visitor chain and extension registry
//!     ├── convert.rs              # phase one, recursive and iterative walks
//!     ├── options.rs
//!     ├── diagnostics.rs
//!     ├── inspect.rs              # treeviz and JSON views for debugging
//!     ├── output
//!     │   ├── tree.rs             # arena of output nodes
//!     │   ├── nodes.rs            # node kinds and their markup
//!     │   └── render.rs           # phase two
//!     ├── visitors
//!     │   ├── tex.rs
//!     │   ├── math_mode.rs
//!     │   ├── amsthm.rs
//!     │   ├── amsmath.rs
//!     │   └── fallback.rs
//!     └── assets                  # CSS and JS embedded in the page
//!
//! Testing
//!     tests
//!     ├── lib.rs                  # aggregates the modules below
//!     ├── common/mod.rs           # source tree builders
//!     ├── numbering.rs
//!     ├── references.rs
//!     ├── dispatch.rs
//!     └── document.rs
//!
//!     Unit tests live next to the code they cover.

pub mod context;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod inspect;
pub mod options;
pub mod output;
pub mod reader;
pub mod source;
pub mod visitor;
pub mod visitors;

pub use context::{Context, ScopeValue};
pub use convert::{convert, Conversion};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::ConvertError;
pub use options::{ConvertOptions, Traversal};
pub use output::{NodeId, NodeKind, OutputTree, RenderEnv};
pub use reader::{ExtensionRegistry, Reader};
pub use source::{Group, SourceNode, Token, TokenCategory};
pub use visitor::{VisitResult, Visitor};

/// A rendered page together with what the conversion reported along the way.
#[derive(Debug)]
pub struct Output {
    pub html: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Convert a source tree into a complete HTML page.
pub fn to_html(source: &SourceNode, options: &ConvertOptions) -> Result<String, ConvertError> {
    convert_document(source, options).map(|output| output.html)
}

/// Parse a JSON source tree and convert it into a complete HTML page.
pub fn json_to_html(json: &str, options: &ConvertOptions) -> Result<String, ConvertError> {
    let source = SourceNode::from_json(json)?;
    to_html(&source, options)
}

/// Convert and render, keeping the diagnostics.
pub fn convert_document(
    source: &SourceNode,
    options: &ConvertOptions,
) -> Result<Output, ConvertError> {
    let mut reader = Reader::from_options(options);
    let conversion = convert(source, &mut reader, options.traversal)?;

    // Styles and scripts are collected after traversal so that extensions activated by
    // `\usepackage` contribute theirs.
    let mut styles = reader.global_styles();
    if let Some(css) = options.custom_css.as_deref().filter(|css| !css.is_empty()) {
        styles.push('\n');
        styles.push_str(css);
    }
    let scripts = reader.global_scripts();

    let html = conversion.render(&RenderEnv {
        labels: None,
        title: &options.title,
        styles: &styles,
        scripts: &scripts,
    });
    Ok(Output {
        html,
        diagnostics: conversion.diagnostics,
    })
}

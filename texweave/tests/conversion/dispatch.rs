//! Visitor chain behavior observed through whole conversions

use crate::common::*;
use pretty_assertions::assert_eq;
use texweave::{
    convert_document, ConvertError, ConvertOptions, DiagnosticKind, SourceNode, TokenCategory,
};

fn theorem_paper(preamble: Vec<SourceNode>) -> SourceNode {
    let mut preamble = preamble;
    preamble.push(newtheorem("theorem", "Theorem"));
    paper(
        preamble,
        vec![SourceNode::env(
            "theorem",
            vec![],
            vec![SourceNode::text("x")],
        )],
    )
}

#[test]
fn test_extension_takes_over_once_package_is_used() {
    let source = theorem_paper(vec![usepackage("amsthm")]);
    let output = convert_document(&source, &ConvertOptions::default()).unwrap();
    assert_eq!(
        body_of(&output.html),
        "<div class=\"theorem\"><span class=\"theorem-label\">Theorem 1.</span> x</div>"
    );
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_without_package_fallback_passes_source_through() {
    let source = theorem_paper(vec![]);
    let output = convert_document(&source, &ConvertOptions::default()).unwrap();
    assert_eq!(
        body_of(&output.html),
        "\\newtheorem{theorem}{Theorem} \\begin{theorem}x\\end{theorem}"
    );
    let kinds: Vec<_> = output.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::UnknownCommand,
            DiagnosticKind::UnknownEnvironment
        ]
    );
    assert_eq!(output.diagnostics[1].path, vec!["root", "document"]);
}

#[test]
fn test_disabled_package_is_not_activated() {
    let source = theorem_paper(vec![usepackage("amsthm")]);
    let options = ConvertOptions {
        enabled_packages: vec!["amsmath".to_string()],
        ..ConvertOptions::default()
    };
    let html = texweave::to_html(&source, &options).unwrap();
    assert!(body_of(&html).contains("\\begin{theorem}x\\end{theorem}"));
    assert!(!html.contains("theorem-label"));
}

#[test]
fn test_preloaded_package_needs_no_usepackage() {
    let source = theorem_paper(vec![]);
    let options = ConvertOptions::default().with_preload(&["amsthm"]);
    let html = texweave::to_html(&source, &options).unwrap();
    assert!(body_of(&html).contains("Theorem 1."));
}

#[test]
fn test_one_usepackage_can_list_several_packages() {
    let source = paper(
        vec![usepackage("amsthm, amsmath")],
        vec![SourceNode::env(
            "align*",
            vec![],
            vec![SourceNode::text("a &= b")],
        )],
    );
    let output = convert_document(&source, &ConvertOptions::default()).unwrap();
    assert_eq!(
        body_of(&output.html),
        "\\begin{align*}a &amp;= b\\end{align*}"
    );
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_adjacent_text_concatenates() {
    let source = paper(
        vec![],
        vec![
            SourceNode::text("one "),
            SourceNode::cmd_with_text("textbf", "two"),
            SourceNode::text(" three"),
        ],
    );
    assert_eq!(render_body(&source), "one <strong>two</strong> three");
}

#[test]
fn test_escaped_dollars_stay_escaped_for_mathjax() {
    let dollar = || SourceNode::token(TokenCategory::EscapedLiteral, "\\$");
    let source = paper(
        vec![],
        vec![
            SourceNode::text("costs "),
            dollar(),
            SourceNode::text("5 and "),
            dollar(),
            SourceNode::text("10"),
        ],
    );
    assert_eq!(render_body(&source), "costs \\$5 and \\$10");
}

#[test]
fn test_newcommand_passes_through_with_diagnostic() {
    let source = paper(
        vec![SourceNode::cmd(
            "newcommand",
            vec![
                SourceNode::brace(vec![SourceNode::cmd("R", vec![])]),
                SourceNode::brace(vec![SourceNode::text("x")]),
            ],
        )],
        vec![SourceNode::text("body")],
    );
    let output = convert_document(&source, &ConvertOptions::default()).unwrap();
    assert_eq!(body_of(&output.html), "\\newcommand{\\R}{x} body");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind, DiagnosticKind::UnknownCommand);
    assert_eq!(output.diagnostics[0].name, "newcommand");
}

#[test]
fn test_unsupported_construct_aborts_conversion() {
    let source = paper(
        vec![],
        vec![section("A"), SourceNode::cmd_with_text("pageref", "x")],
    );
    let err = texweave::to_html(&source, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::Unsupported { .. }));
    assert_eq!(
        err.to_string(),
        "unsupported construct '\\pageref' at root > document: \
         page references have no meaning in HTML output"
    );
}

#[test]
fn test_malformed_json_is_an_error() {
    let err = texweave::json_to_html("{\"kind\": \"environment\"", &ConvertOptions::default())
        .unwrap_err();
    assert!(matches!(err, ConvertError::Source(_)));
}

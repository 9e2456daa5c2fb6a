//! Labels, references and citations resolve over the whole document

use crate::common::*;
use texweave::{ConvertOptions, SourceNode, Traversal};

#[test]
fn test_forward_reference_resolves_to_section_number() {
    let source = paper(
        vec![],
        vec![
            SourceNode::text("See "),
            reference("sec:b"),
            SourceNode::text("."),
            section("A"),
            section("B"),
            label("sec:b"),
        ],
    );
    assert_eq!(
        render_body(&source),
        "See <a class=\"ref\" href=\"#sec:b\">2</a>.<h2>1 A</h2><h2 id=\"sec:b\">2 B</h2>"
    );
}

#[test]
fn test_label_inside_theorem_takes_its_tag() {
    let source = paper(
        vec![usepackage("amsthm"), newtheorem("lemma", "Lemma")],
        vec![
            section("A"),
            SourceNode::env(
                "lemma",
                vec![],
                vec![label("lem:key"), SourceNode::text("Body")],
            ),
            reference("lem:key"),
        ],
    );
    let body = render_body(&source);
    assert!(body.contains(
        "<div class=\"theorem\" id=\"lem:key\"><span class=\"theorem-label\">Lemma 1.1.</span> Body</div>"
    ));
    assert!(body.ends_with("<a class=\"ref\" href=\"#lem:key\">1.1</a>"));
}

#[test]
fn test_forward_reference_to_theorem_in_second_section() {
    let source = paper(
        vec![usepackage("amsthm"), newtheorem("theorem", "Theorem")],
        vec![
            reference("thm:b"),
            section("A"),
            section("B"),
            SourceNode::env(
                "theorem",
                vec![],
                vec![label("thm:b"), SourceNode::text("Claim")],
            ),
            reference("thm:b"),
        ],
    );
    let body = render_body(&source);
    assert!(body.starts_with("<a class=\"ref\" href=\"#thm:b\">2.1</a>"));
    assert!(body.contains("<div class=\"theorem\" id=\"thm:b\"><span class=\"theorem-label\">Theorem 2.1.</span>"));
    assert!(body.ends_with("<a class=\"ref\" href=\"#thm:b\">2.1</a>"));
}

#[test]
fn test_label_after_closed_theorem_takes_section_tag() {
    let source = paper(
        vec![usepackage("amsthm"), newtheorem("theorem", "Theorem")],
        vec![
            section("A"),
            SourceNode::env("theorem", vec![], vec![SourceNode::text("T")]),
            SourceNode::text("text after "),
            label("sec:a"),
            reference("sec:a"),
        ],
    );
    assert_eq!(
        render_body(&source),
        "<h2 id=\"sec:a\">1 A</h2>\
         <div class=\"theorem\"><span class=\"theorem-label\">Theorem 1.1.</span> T</div>\
         text after <a class=\"ref\" href=\"#sec:a\">1</a>"
    );
}

#[test]
fn test_unknown_and_untagged_labels_render_placeholder() {
    let source = paper(
        vec![],
        vec![
            label("intro"),
            reference("intro"),
            reference("nowhere"),
        ],
    );
    assert_eq!(
        render_body(&source),
        "<span id=\"intro\"></span>\
         <a class=\"ref\" href=\"#intro\">??</a>\
         <a class=\"ref\" href=\"#nowhere\">??</a>"
    );
}

#[test]
fn test_redefined_label_keeps_last_tag() {
    let source = paper(
        vec![],
        vec![
            section("A"),
            label("dup"),
            section("B"),
            label("dup"),
            reference("dup"),
        ],
    );
    let body = render_body(&source);
    assert!(body.ends_with("<a class=\"ref\" href=\"#dup\">2</a>"));
}

#[test]
fn test_citations_link_to_bibliography_entries() {
    let source = paper(
        vec![],
        vec![
            SourceNode::cmd_with_text("cite", "knuth84, lamport94"),
            SourceNode::env(
                "thebibliography",
                vec![SourceNode::brace(vec![SourceNode::text("9")])],
                vec![
                    SourceNode::cmd_with_text("bibitem", "knuth84"),
                    SourceNode::text("The TeXbook"),
                    SourceNode::cmd(
                        "bibitem",
                        vec![
                            SourceNode::bracket(vec![SourceNode::text("L94")]),
                            SourceNode::brace(vec![SourceNode::text("lamport94")]),
                        ],
                    ),
                    SourceNode::text("LaTeX"),
                ],
            ),
        ],
    );
    let body = render_body(&source);
    assert!(body.starts_with(
        "<a class=\"cite\" href=\"#knuth84\">[knuth84]</a>, \
         <a class=\"cite\" href=\"#lamport94\">[lamport94]</a>"
    ));
    assert!(body.contains(
        "<span class=\"ref-label\">[knuth84]</span><div class=\"ref-content\" id=\"knuth84\">The TeXbook</div>"
    ));
    assert!(body.contains(
        "<span class=\"ref-label\">[L94]</span><div class=\"ref-content\" id=\"lamport94\">LaTeX</div>"
    ));
}

#[test]
fn test_references_resolve_in_iterative_walk() {
    let source = paper(
        vec![],
        vec![reference("s"), section("Only"), label("s")],
    );
    let options = ConvertOptions::default().with_traversal(Traversal::Iterative);
    let html = texweave::to_html(&source, &options).unwrap();
    assert!(body_of(&html).starts_with("<a class=\"ref\" href=\"#s\">1</a>"));
}

//! Section and theorem numbering across whole documents

use crate::common::*;
use texweave::{ConvertOptions, SourceNode, Traversal};

fn theorem(body: &str) -> SourceNode {
    SourceNode::env("theorem", vec![], vec![SourceNode::text(body)])
}

fn with_theorems(body: Vec<SourceNode>) -> SourceNode {
    paper(
        vec![usepackage("amsthm"), newtheorem("theorem", "Theorem")],
        body,
    )
}

fn theorem_html(heading: &str, body: &str) -> String {
    format!(
        "<div class=\"theorem\"><span class=\"theorem-label\">{heading}.</span> {body}</div>"
    )
}

#[test]
fn test_sections_are_numbered_in_order() {
    let source = paper(vec![], vec![section("One"), section("Two"), section("Three")]);
    assert_eq!(
        render_body(&source),
        "<h2>1 One</h2><h2>2 Two</h2><h2>3 Three</h2>"
    );
}

#[test]
fn test_starred_section_takes_no_number() {
    let source = paper(
        vec![],
        vec![section("One"), starred_section("Aside"), section("Two")],
    );
    assert_eq!(
        render_body(&source),
        "<h2>1 One</h2><h2>Aside</h2><h2>2 Two</h2>"
    );
}

#[test]
fn test_theorem_counter_restarts_per_section() {
    let source = with_theorems(vec![
        section("A"),
        theorem("first"),
        theorem("second"),
        section("B"),
        theorem("third"),
    ]);
    let body = render_body(&source);
    assert_eq!(
        body,
        [
            "<h2>1 A</h2>".to_string(),
            theorem_html("Theorem 1.1", "first"),
            theorem_html("Theorem 1.2", "second"),
            "<h2>2 B</h2>".to_string(),
            theorem_html("Theorem 2.1", "third"),
        ]
        .concat()
    );
}

#[test]
fn test_theorems_outside_numbered_sections_count_plainly() {
    let source = with_theorems(vec![
        theorem("a"),
        section("A"),
        theorem("b"),
        starred_section("Appendix"),
        theorem("c"),
        theorem("d"),
    ]);
    let body = render_body(&source);
    assert!(body.contains(&theorem_html("Theorem 1", "a")));
    assert!(body.contains(&theorem_html("Theorem 1.1", "b")));
    assert!(body.contains(&theorem_html("Theorem 1", "c")));
    assert!(body.contains(&theorem_html("Theorem 2", "d")));
}

#[test]
fn test_numbering_matches_between_traversals() {
    let source = with_theorems(vec![
        section("A"),
        theorem("x"),
        section("B"),
        theorem("y"),
        theorem("z"),
    ]);
    let recursive = texweave::to_html(&source, &ConvertOptions::default()).unwrap();
    let iterative = texweave::to_html(
        &source,
        &ConvertOptions::default().with_traversal(Traversal::Iterative),
    )
    .unwrap();
    assert_eq!(recursive, iterative);
    assert!(iterative.contains("Theorem 2.2."));
}

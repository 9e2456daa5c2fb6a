//! Whole papers, from the JSON source tree to the finished page

use crate::common::*;
use pretty_assertions::assert_eq;
use texweave::{ConvertOptions, Group, SourceNode, Traversal};

fn item(text: &str) -> SourceNode {
    SourceNode::Command(Group {
        name: "item".to_string(),
        args: vec![],
        content: vec![SourceNode::text(text)],
    })
}

fn sample_paper() -> SourceNode {
    paper(
        vec![
            SourceNode::cmd_with_text("documentclass", "article"),
            usepackage("amsthm"),
            newtheorem("theorem", "Theorem"),
            SourceNode::cmd_with_text("title", "On Things"),
            SourceNode::cmd_with_text("author", "Ada"),
            SourceNode::cmd_with_text("author", "Bob"),
            SourceNode::cmd_with_text("address", "Somewhere"),
        ],
        vec![
            SourceNode::cmd("maketitle", vec![]),
            SourceNode::env("abstract", vec![], vec![SourceNode::text("Short.")]),
            section("Intro"),
            SourceNode::text("Let "),
            SourceNode::env(
                "$",
                vec![],
                vec![SourceNode::text("x<1"), SourceNode::cmd("alpha", vec![])],
            ),
            SourceNode::text("."),
            SourceNode::env("proof", vec![], vec![SourceNode::text("Trivial.")]),
            SourceNode::env("itemize", vec![], vec![item("a"), item("b")]),
            SourceNode::brace(vec![
                SourceNode::cmd("em", vec![]),
                SourceNode::text("slanted"),
            ]),
        ],
    )
}

#[test]
fn test_full_paper_body() {
    let body = render_body(&sample_paper());
    assert_eq!(
        body,
        [
            "<div class=\"maketitle\"><h1>On Things</h1>",
            "<div class=\"author\">Ada</div><div class=\"author\">Bob</div>",
            "<div class=\"address\">Somewhere</div></div>",
            "<div class=\"abstract\"><h3>Abstract</h3>Short.</div>",
            "<h2>1 Intro</h2>",
            "Let $x&lt;1\\alpha$.",
            "<details><summary>Proof</summary><div class=\"proof-content\">Trivial. □</div></details>",
            "<ul><li>a</li><li>b</li></ul>",
            "<i>slanted</i>",
        ]
        .concat()
    );
}

#[test]
fn test_page_shell_collects_styles_and_scripts() {
    let options = ConvertOptions {
        custom_css: Some("body { color: red; }".to_string()),
        ..ConvertOptions::default().with_title("Things & Stuff")
    };
    let html = texweave::to_html(&sample_paper(), &options).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
    assert!(html.contains("<title>Things &amp; Stuff</title>"));
    assert!(html.contains("<script id=\"MathJax-script\" async src=\"https://cdnjs.cloudflare.com/"));

    let base = html.find("font-family").unwrap();
    let theorem = html.find(".theorem {").unwrap();
    let custom = html.find("body { color: red; }").unwrap();
    assert!(base < theorem && theorem < custom);
}

#[test]
fn test_theorem_styles_only_when_package_used() {
    let source = paper(vec![], vec![SourceNode::text("plain")]);
    let html = texweave::to_html(&source, &ConvertOptions::default()).unwrap();
    assert!(!html.contains(".theorem {"));
    assert!(html.contains("font-family"));
}

#[test]
fn test_json_source_converts() {
    let json = r#"{
        "kind": "environment",
        "name": "[tex]",
        "content": [
            {
                "kind": "environment",
                "name": "document",
                "content": [
                    {
                        "kind": "command",
                        "name": "section",
                        "args": [
                            {
                                "kind": "environment",
                                "name": "BraceGroup",
                                "content": [{"kind": "token", "category": "text", "text": "Start"}]
                            }
                        ]
                    },
                    {"kind": "token", "category": "comment", "text": "% hidden"},
                    {"kind": "token", "category": "text", "text": "``Quoted''"}
                ]
            }
        ]
    }"#;
    let html = texweave::json_to_html(json, &ConvertOptions::default()).unwrap();
    assert_eq!(body_of(&html), "<h2>1 Start</h2>“Quoted”");
}

#[test]
fn test_traversals_render_identical_pages() {
    let source = sample_paper();
    let recursive = texweave::to_html(&source, &ConvertOptions::default()).unwrap();
    let iterative = texweave::to_html(
        &source,
        &ConvertOptions::default().with_traversal(Traversal::Iterative),
    )
    .unwrap();
    assert_eq!(recursive, iterative);
}

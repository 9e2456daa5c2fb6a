//! Source tree builders shared by the integration tests.

use texweave::source::ROOT;
use texweave::{ConvertOptions, SourceNode};

/// `[tex]` root holding a preamble and a `document` environment.
pub fn paper(preamble: Vec<SourceNode>, body: Vec<SourceNode>) -> SourceNode {
    let mut content = preamble;
    content.push(SourceNode::env("document", vec![], body));
    SourceNode::env(ROOT, vec![], content)
}

pub fn section(title: &str) -> SourceNode {
    SourceNode::cmd_with_text("section", title)
}

pub fn starred_section(title: &str) -> SourceNode {
    SourceNode::cmd_with_text("section*", title)
}

pub fn label(key: &str) -> SourceNode {
    SourceNode::cmd_with_text("label", key)
}

pub fn reference(key: &str) -> SourceNode {
    SourceNode::cmd_with_text("ref", key)
}

pub fn usepackage(names: &str) -> SourceNode {
    SourceNode::cmd_with_text("usepackage", names)
}

pub fn newtheorem(env: &str, display: &str) -> SourceNode {
    SourceNode::cmd(
        "newtheorem",
        vec![
            SourceNode::brace(vec![SourceNode::text(env)]),
            SourceNode::brace(vec![SourceNode::text(display)]),
        ],
    )
}

/// Everything between `<body>` and `</body>` of the page.
pub fn body_of(html: &str) -> &str {
    let start = html.find("<body>\n").map(|i| i + "<body>\n".len()).unwrap_or(0);
    let end = html.rfind("\n</body>").unwrap_or(html.len());
    &html[start..end]
}

pub fn render_body(source: &SourceNode) -> String {
    let html = texweave::to_html(source, &ConvertOptions::default()).unwrap();
    body_of(&html).to_string()
}

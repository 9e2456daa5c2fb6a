//! Source tree handed over by the external parser.
//!
//! The parser splits LaTeX-like markup into three node kinds: environments, commands
//! and tokens. It follows a few naming conventions the visitors rely on:
//!
//! | markup               | node                                 |
//! |----------------------|--------------------------------------|
//! | whole document       | environment `[tex]`                  |
//! | `{...}`              | environment `BraceGroup`             |
//! | `[...]`              | environment `BracketGroup`           |
//! | `$...$`, `$$...$$`   | environment `$`, `$$`                |
//! | `\begin{x}..\end{x}` | environment `x`                      |
//! | `\x{..}`             | command `x`, groups as arguments     |
//!
//! The tree arrives as JSON and is read with serde; see [`SourceNode::from_json`].

use serde::{Deserialize, Serialize};
use std::fmt;

pub const ROOT: &str = "[tex]";
pub const BRACE_GROUP: &str = "BraceGroup";
pub const BRACKET_GROUP: &str = "BracketGroup";

/// A node of the parsed source tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceNode {
    Environment(Group),
    Command(Group),
    Token(Token),
}

/// Named node with ordered arguments and ordered content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub args: Vec<SourceNode>,
    #[serde(default)]
    pub content: Vec<SourceNode>,
}

/// Leaf carrying raw categorized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub category: TokenCategory,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCategory {
    Text,
    Comment,
    EscapedLiteral,
}

impl SourceNode {
    /// Read a source tree from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn env(name: impl Into<String>, args: Vec<SourceNode>, content: Vec<SourceNode>) -> Self {
        SourceNode::Environment(Group {
            name: name.into(),
            args,
            content,
        })
    }

    pub fn cmd(name: impl Into<String>, args: Vec<SourceNode>) -> Self {
        SourceNode::Command(Group {
            name: name.into(),
            args,
            content: Vec::new(),
        })
    }

    pub fn brace(content: Vec<SourceNode>) -> Self {
        Self::env(BRACE_GROUP, Vec::new(), content)
    }

    pub fn bracket(content: Vec<SourceNode>) -> Self {
        Self::env(BRACKET_GROUP, Vec::new(), content)
    }

    /// `\name{text}` with a single brace argument holding plain text.
    pub fn cmd_with_text(name: impl Into<String>, text: &str) -> Self {
        Self::cmd(name, vec![Self::brace(vec![Self::text(text)])])
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::token(TokenCategory::Text, text)
    }

    pub fn token(category: TokenCategory, text: impl Into<String>) -> Self {
        SourceNode::Token(Token {
            category,
            text: text.into(),
        })
    }

    /// Environment or command name; tokens have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            SourceNode::Environment(g) | SourceNode::Command(g) => Some(&g.name),
            SourceNode::Token(_) => None,
        }
    }

    /// Short human-readable identification used in diagnostics and errors.
    pub fn describe(&self) -> String {
        match self {
            SourceNode::Environment(g) => format!("environment '{}'", g.name),
            SourceNode::Command(g) => format!("\\{}", g.name),
            SourceNode::Token(t) => format!("{:?} token", t.category),
        }
    }
}

impl Group {
    /// Brace-group arguments, skipping bracket options.
    pub fn brace_args(&self) -> impl Iterator<Item = &Group> {
        self.args.iter().filter_map(|arg| match arg {
            SourceNode::Environment(g) if g.name == BRACE_GROUP => Some(g),
            _ => None,
        })
    }

    /// First bracket-group argument, if any.
    pub fn bracket_arg(&self) -> Option<&Group> {
        self.args.iter().find_map(|arg| match arg {
            SourceNode::Environment(g) if g.name == BRACKET_GROUP => Some(g),
            _ => None,
        })
    }

    /// Raw text of the `index`-th brace argument (e.g. the key of `\label{key}`).
    pub fn brace_text(&self, index: usize) -> Option<String> {
        self.brace_args().nth(index).map(Group::inner_source)
    }

    /// Raw markup of the content, without the group's own delimiters.
    pub fn inner_source(&self) -> String {
        let mut out = String::new();
        push_all(&mut out, &self.content);
        out
    }

    /// Raw markup of this group read as a command: `\name` followed by its arguments.
    pub fn command_source(&self) -> String {
        let mut out = format!("\\{}", self.name);
        push_all(&mut out, &self.args);
        push_all(&mut out, &self.content);
        out
    }

    /// Raw markup of this group read as an environment.
    pub fn environment_source(&self) -> String {
        let mut out = String::new();
        match self.name.as_str() {
            ROOT => push_all(&mut out, &self.content),
            BRACE_GROUP => {
                out.push('{');
                push_all(&mut out, &self.content);
                out.push('}');
            }
            BRACKET_GROUP => {
                out.push('[');
                push_all(&mut out, &self.content);
                out.push(']');
            }
            "$" | "$$" => {
                out.push_str(&self.name);
                push_all(&mut out, &self.content);
                out.push_str(&self.name);
            }
            name => {
                out.push_str(&format!("\\begin{{{name}}}"));
                push_all(&mut out, &self.args);
                push_all(&mut out, &self.content);
                out.push_str(&format!("\\end{{{name}}}"));
            }
        }
        out
    }
}

fn push_all(out: &mut String, nodes: &[SourceNode]) {
    for node in nodes {
        match node {
            SourceNode::Token(t) => out.push_str(&t.text),
            SourceNode::Command(g) => out.push_str(&g.command_source()),
            SourceNode::Environment(g) => out.push_str(&g.environment_source()),
        }
    }
}

/// Raw markup, as close to the original source as the tree allows.
///
/// Used wherever a construct is passed through untouched (math, unknown commands).
impl fmt::Display for SourceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceNode::Token(t) => f.write_str(&t.text),
            SourceNode::Command(g) => f.write_str(&g.command_source()),
            SourceNode::Environment(g) => f.write_str(&g.environment_source()),
        }
    }
}

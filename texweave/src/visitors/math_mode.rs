//! Math mode
//!
//! `$...$` and `$$...$$` open math mode for their subtree. Inside it every environment and
//! command is passed through as raw source and text is only escaped, so the client-side
//! renderer sees the math exactly as written.

use crate::context::{Context, ScopeValue};
use crate::error::ConvertError;
use crate::output::NodeKind;
use crate::source::{Group, Token, TokenCategory};
use crate::visitor::{VisitResult, Visitor};
use html_escape::encode_double_quoted_attribute;

/// Scope key set on the math delimiter node.
pub const MATH_MODE: &str = "math_mode";

const MATHJAX_CONFIG: &str = include_str!("../../assets/js/mathjax-config.js");

#[derive(Debug)]
pub struct MathModeVisitor {
    mathjax_url: String,
}

impl MathModeVisitor {
    pub fn new(mathjax_url: &str) -> Self {
        MathModeVisitor {
            mathjax_url: mathjax_url.to_string(),
        }
    }
}

impl Visitor for MathModeVisitor {
    fn name(&self) -> &str {
        "math_mode"
    }

    fn handle_environment(
        &mut self,
        env: &Group,
        ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        if env.name == "$" || env.name == "$$" {
            ctx.register_local(MATH_MODE, ScopeValue::Flag(true));
            let id = ctx.produce(NodeKind::Math {
                delimiter: env.name.clone(),
            });
            return Ok(VisitResult::Produced(id));
        }
        if ctx.flag(MATH_MODE) {
            return Ok(VisitResult::Opaque(
                ctx.produce(NodeKind::raw(env.environment_source())),
            ));
        }
        Ok(VisitResult::NoMatch)
    }

    fn handle_command(
        &mut self,
        cmd: &Group,
        ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        if ctx.flag(MATH_MODE) || cmd.name == "eqref" {
            return Ok(VisitResult::Opaque(
                ctx.produce(NodeKind::raw(cmd.command_source())),
            ));
        }
        Ok(VisitResult::NoMatch)
    }

    fn handle_token(
        &mut self,
        token: &Token,
        ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        if !ctx.flag(MATH_MODE) {
            return Ok(VisitResult::NoMatch);
        }
        let kind = match token.category {
            TokenCategory::Comment => NodeKind::Hidden,
            TokenCategory::Text | TokenCategory::EscapedLiteral => NodeKind::raw(&token.text),
        };
        Ok(VisitResult::Opaque(ctx.produce(kind)))
    }

    fn global_script(&self) -> String {
        format!(
            "<script>\n{MATHJAX_CONFIG}</script>\n<script id=\"MathJax-script\" async src=\"{}\"></script>",
            encode_double_quoted_attribute(&self.mathjax_url)
        )
    }
}

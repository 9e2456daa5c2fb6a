//! Fallback visitor: matches every node.
//!
//! Unknown environments and commands are emitted as their raw source and never descended
//! into. Each one is logged and recorded as a [`Diagnostic`] unless reporting is off.

use crate::context::Context;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::ConvertError;
use crate::output::NodeKind;
use crate::source::{Group, Token};
use crate::visitor::{VisitResult, Visitor};

#[derive(Debug)]
pub struct FallbackVisitor {
    report_unknown: bool,
}

impl FallbackVisitor {
    pub fn new(report_unknown: bool) -> Self {
        FallbackVisitor { report_unknown }
    }

    fn report(&self, ctx: &Context, kind: DiagnosticKind, name: &str) {
        if !self.report_unknown {
            return;
        }
        let diagnostic = Diagnostic::new(kind, name, ctx.ancestor_path());
        log::warn!("{diagnostic}");
        ctx.record(diagnostic);
    }
}

impl Default for FallbackVisitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Visitor for FallbackVisitor {
    fn name(&self) -> &str {
        "fallback"
    }

    fn handle_environment(
        &mut self,
        env: &Group,
        ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        self.report(ctx, DiagnosticKind::UnknownEnvironment, &env.name);
        Ok(VisitResult::Opaque(
            ctx.produce(NodeKind::raw(env.environment_source())),
        ))
    }

    fn handle_command(
        &mut self,
        cmd: &Group,
        ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        self.report(ctx, DiagnosticKind::UnknownCommand, &cmd.name);
        // The parser swallows the space after a control word; put one back.
        let source = format!("{} ", cmd.command_source());
        Ok(VisitResult::Opaque(ctx.produce(NodeKind::raw(source))))
    }

    fn handle_token(
        &mut self,
        token: &Token,
        ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        self.report(ctx, DiagnosticKind::UnknownToken, &token.text);
        Ok(VisitResult::Opaque(ctx.produce(NodeKind::text(&token.text))))
    }
}

//! `amsmath` extension: display math environments pass through raw.

use crate::context::Context;
use crate::error::ConvertError;
use crate::output::NodeKind;
use crate::source::Group;
use crate::visitor::{VisitResult, Visitor};

const DISPLAY_ENVIRONMENTS: [&str; 6] = [
    "equation",
    "equation*",
    "align",
    "align*",
    "gather",
    "multline",
];

#[derive(Debug, Default)]
pub struct AmsMathVisitor;

impl Visitor for AmsMathVisitor {
    fn name(&self) -> &str {
        "amsmath"
    }

    fn handle_environment(
        &mut self,
        env: &Group,
        ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        if !DISPLAY_ENVIRONMENTS.contains(&env.name.as_str()) {
            return Ok(VisitResult::NoMatch);
        }
        Ok(VisitResult::Opaque(
            ctx.produce(NodeKind::raw(env.environment_source())),
        ))
    }

    fn handle_command(
        &mut self,
        cmd: &Group,
        ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        if cmd.name != "hdots" {
            return Ok(VisitResult::NoMatch);
        }
        Ok(VisitResult::Opaque(ctx.produce(NodeKind::raw("\\dots"))))
    }
}

//! Visitor trait definition
//!
//! A visitor translates one source node into at most one output node plus a recursion
//! directive. Visitors are stacked in a [`Reader`](crate::reader::Reader); the first one that
//! matches wins.

use crate::context::Context;
use crate::error::ConvertError;
use crate::output::NodeId;
use crate::source::{Group, Token};

/// Outcome of a single handler call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitResult {
    /// Not handled; dispatch moves on to the next visitor
    NoMatch,
    /// Node produced; the converter recurses into the source arguments and content
    Produced(NodeId),
    /// Node produced and complete; arguments and content are not visited
    Opaque(NodeId),
}

impl VisitResult {
    pub fn node(self) -> Option<NodeId> {
        match self {
            VisitResult::NoMatch => None,
            VisitResult::Produced(id) | VisitResult::Opaque(id) => Some(id),
        }
    }

    pub fn recurse(self) -> bool {
        matches!(self, VisitResult::Produced(_))
    }
}

/// Trait for conversion handlers
///
/// Each handler receives the source node and the context for that node. Unimplemented
/// handlers decline with [`VisitResult::NoMatch`].
///
/// # Examples
///
/// ```ignore
/// struct Rule;
///
/// impl Visitor for Rule {
///     fn name(&self) -> &str {
///         "rule"
///     }
///
///     fn handle_command(&mut self, cmd: &Group, ctx: &mut Context) -> Result<VisitResult, ConvertError> {
///         if cmd.name != "hrule" {
///             return Ok(VisitResult::NoMatch);
///         }
///         Ok(VisitResult::Opaque(ctx.produce(NodeKind::markup("<hr>"))))
///     }
/// }
/// ```
pub trait Visitor {
    /// Name used in logs and `--list-packages` (e.g. "tex", "amsthm")
    fn name(&self) -> &str;

    fn handle_environment(
        &mut self,
        _env: &Group,
        _ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        Ok(VisitResult::NoMatch)
    }

    fn handle_command(
        &mut self,
        _cmd: &Group,
        _ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        Ok(VisitResult::NoMatch)
    }

    /// Token handlers must produce leaves; a `Produced` result is treated like `Opaque`.
    fn handle_token(
        &mut self,
        _token: &Token,
        _ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        Ok(VisitResult::NoMatch)
    }

    /// CSS placed in the document head, once per active visitor
    fn global_style(&self) -> String {
        String::new()
    }

    /// Script elements placed in the document head, once per active visitor
    fn global_script(&self) -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl Visitor for Silent {
        fn name(&self) -> &str {
            "silent"
        }
    }

    #[test]
    fn defaults_decline_everything() {
        let mut visitor = Silent;
        let mut ctx = Context::new();
        let group = Group {
            name: "anything".into(),
            args: vec![],
            content: vec![],
        };
        assert_eq!(
            visitor.handle_environment(&group, &mut ctx).unwrap(),
            VisitResult::NoMatch
        );
        assert_eq!(
            visitor.handle_command(&group, &mut ctx).unwrap(),
            VisitResult::NoMatch
        );
        assert!(visitor.global_style().is_empty());
        assert!(visitor.global_script().is_empty());
    }

    #[test]
    fn result_accessors() {
        let ctx = Context::new();
        let id = ctx.produce(crate::output::NodeKind::Document);
        assert!(VisitResult::Produced(id).recurse());
        assert!(!VisitResult::Opaque(id).recurse());
        assert_eq!(VisitResult::Opaque(id).node(), Some(id));
        assert_eq!(VisitResult::NoMatch.node(), None);
    }
}

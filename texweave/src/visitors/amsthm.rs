//! `amsthm` extension: theorem-like environments.
//!
//! `\newtheorem{lemma}{Lemma}` declares an environment; `\newtheorem*{remark}{Remark}` declares
//! an unnumbered one. Every numbered declaration shares one counter, which restarts whenever
//! the enclosing section changes. Tags read `<section>.<n>`, or just `<n>` outside numbered
//! sections.

use super::required_text;
use crate::context::Context;
use crate::error::ConvertError;
use crate::output::{Kind, NodeKind};
use crate::source::Group;
use crate::visitor::{VisitResult, Visitor};
use std::collections::HashMap;

const THEOREM_CSS: &str = include_str!("../../assets/css/theorem.css");

#[derive(Debug, Clone, PartialEq, Eq)]
struct Declaration {
    display: String,
    numbered: bool,
}

#[derive(Debug, Default)]
pub struct TheoremVisitor {
    declared: HashMap<String, Declaration>,
    /// Enclosing tag at the previous numbered theorem; `Some(None)` means untagged
    last_enclosing: Option<Option<String>>,
    counter: u32,
}

impl TheoremVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    fn declare(&mut self, cmd: &Group, numbered: bool, ctx: &Context) -> Result<(), ConvertError> {
        let env = required_text(cmd, 0, "environment name", ctx)?;
        let display = required_text(cmd, 1, "display name", ctx)?;
        log::debug!("declared theorem environment '{env}' as '{display}'");
        self.declared.insert(env, Declaration { display, numbered });
        Ok(())
    }

    /// Next tag for a numbered theorem opened at the current point of traversal.
    fn next_tag(&mut self, ctx: &Context) -> String {
        let enclosing = enclosing_tag(ctx);
        if self.last_enclosing.as_ref() != Some(&enclosing) {
            self.counter = 0;
            self.last_enclosing = Some(enclosing.clone());
        }
        self.counter += 1;
        match enclosing {
            Some(section) => format!("{section}.{}", self.counter),
            None => self.counter.to_string(),
        }
    }
}

/// Number of the most recent section, or `None` when it is starred or absent.
fn enclosing_tag(ctx: &Context) -> Option<String> {
    let id = ctx.most_recent_of_kinds(&[Kind::Section, Kind::StarredSection])?;
    ctx.inspect(id, |kind| match kind {
        NodeKind::Section { number, .. } => Some(number.to_string()),
        _ => None,
    })
    .flatten()
}

impl Visitor for TheoremVisitor {
    fn name(&self) -> &str {
        "amsthm"
    }

    fn handle_environment(
        &mut self,
        env: &Group,
        ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        let Some(declaration) = self.declared.get(&env.name).cloned() else {
            return Ok(VisitResult::NoMatch);
        };
        let tag = declaration.numbered.then(|| self.next_tag(ctx));
        let id = ctx.produce(NodeKind::Theorem {
            name: declaration.display,
            tag,
            anchor: None,
        });
        Ok(VisitResult::Produced(id))
    }

    fn handle_command(
        &mut self,
        cmd: &Group,
        ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        match cmd.name.as_str() {
            "newtheorem" => self.declare(cmd, true, ctx)?,
            "newtheorem*" => self.declare(cmd, false, ctx)?,
            _ => return Ok(VisitResult::NoMatch),
        }
        Ok(VisitResult::Opaque(ctx.produce(NodeKind::Hidden)))
    }

    fn global_style(&self) -> String {
        THEOREM_CSS.to_string()
    }
}

//! Visitor chain and extension registry
//!
//! The [`Reader`] owns the visitors of one conversion. Dispatch tries the most recently added
//! visitor first and ends at the fallback, which matches everything. Extensions are visitors
//! the document itself switches on with `\usepackage{...}`; they are created on demand from
//! the [`ExtensionRegistry`].

use crate::context::Context;
use crate::error::ConvertError;
use crate::options::ConvertOptions;
use crate::source::{Group, SourceNode};
use crate::visitor::{VisitResult, Visitor};
use crate::visitors::{AmsMathVisitor, FallbackVisitor, MathModeVisitor, TexVisitor, TheoremVisitor};
use std::collections::{BTreeSet, HashMap};

/// Command that activates extensions.
pub const PACKAGE_COMMAND: &str = "usepackage";

pub type VisitorFactory = fn() -> Box<dyn Visitor>;

/// Registry of activatable extensions
///
/// Maps a package name (as written in `\usepackage`) to a factory building a fresh visitor.
pub struct ExtensionRegistry {
    factories: HashMap<String, VisitorFactory>,
}

impl ExtensionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ExtensionRegistry {
            factories: HashMap::new(),
        }
    }

    /// Register an extension. An existing entry with the same name is replaced.
    pub fn register(&mut self, name: impl Into<String>, factory: VisitorFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn has(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// All registered extension names (sorted)
    pub fn list_extensions(&self) -> Vec<String> {
        let mut names: Vec<_> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn create(&self, name: &str) -> Option<Box<dyn Visitor>> {
        self.factories.get(name).map(|factory| factory())
    }

    /// Create a registry with the built-in extensions
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("amsthm", || Box::new(TheoremVisitor::new()));
        registry.register("amsmath", || Box::new(AmsMathVisitor));
        registry
    }
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Ordered visitor chain of one conversion.
pub struct Reader {
    visitors: Vec<Box<dyn Visitor>>,
    fallback: Box<dyn Visitor>,
    extensions: ExtensionRegistry,
    /// Extension names `\usepackage` may activate; `None` allows every registered one
    enabled: Option<BTreeSet<String>>,
    active: BTreeSet<String>,
}

impl Reader {
    /// Chain holding only `fallback`, with the built-in extensions available.
    pub fn new(fallback: Box<dyn Visitor>) -> Self {
        Reader {
            visitors: Vec::new(),
            fallback,
            extensions: ExtensionRegistry::default(),
            enabled: None,
            active: BTreeSet::new(),
        }
    }

    /// The standard chain: base markup, then math mode, over the fallback.
    ///
    /// Preloaded packages are activated before returning.
    pub fn from_options(options: &ConvertOptions) -> Self {
        let mut reader = Reader::new(Box::new(FallbackVisitor::new(options.report_unknown)));
        reader.push(Box::new(TexVisitor));
        reader.push(Box::new(MathModeVisitor::new(&options.mathjax_url)));
        reader.enable_only(options.enabled_packages.iter().cloned());
        for package in &options.preload_packages {
            if !reader.activate(package) && !reader.is_active(package) {
                log::warn!("cannot preload package '{package}': not a known, enabled extension");
            }
        }
        reader
    }

    pub fn with_extensions(mut self, extensions: ExtensionRegistry) -> Self {
        self.extensions = extensions;
        self
    }

    /// Restrict activation to the given extension names.
    pub fn enable_only(&mut self, names: impl IntoIterator<Item = String>) {
        self.enabled = Some(names.into_iter().collect());
    }

    /// Append a visitor; it takes precedence over every visitor added before it.
    pub fn push(&mut self, visitor: Box<dyn Visitor>) {
        self.visitors.push(visitor);
    }

    /// Activate the extension `name` once per document.
    ///
    /// Returns `true` only when a visitor was appended.
    pub fn activate(&mut self, name: &str) -> bool {
        if self.active.contains(name) {
            log::debug!("package '{name}' already active");
            return false;
        }
        if self.enabled.as_ref().is_some_and(|enabled| !enabled.contains(name)) {
            log::debug!("package '{name}' is disabled");
            return false;
        }
        let Some(visitor) = self.extensions.create(name) else {
            log::debug!("package '{name}' has no extension");
            return false;
        };
        log::debug!("activating extension '{}'", visitor.name());
        self.visitors.push(visitor);
        self.active.insert(name.to_string());
        true
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains(name)
    }

    /// Names of active extensions (sorted)
    pub fn active_extensions(&self) -> Vec<String> {
        self.active.iter().cloned().collect()
    }

    /// Visitor names in dispatch order, fallback last
    pub fn chain(&self) -> Vec<String> {
        self.visitors
            .iter()
            .rev()
            .chain(std::iter::once(&self.fallback))
            .map(|visitor| visitor.name().to_string())
            .collect()
    }

    /// Hand `node` to the first visitor that matches, activating packages first.
    pub fn dispatch(
        &mut self,
        node: &SourceNode,
        ctx: &mut Context,
    ) -> Result<VisitResult, ConvertError> {
        if let SourceNode::Command(cmd) = node {
            if cmd.name == PACKAGE_COMMAND {
                for package in package_names(cmd) {
                    self.activate(&package);
                }
            }
        }

        let chain = self
            .visitors
            .iter_mut()
            .rev()
            .chain(std::iter::once(&mut self.fallback));
        for visitor in chain {
            let result = match node {
                SourceNode::Environment(env) => visitor.handle_environment(env, ctx)?,
                SourceNode::Command(cmd) => visitor.handle_command(cmd, ctx)?,
                SourceNode::Token(token) => visitor.handle_token(token, ctx)?,
            };
            if result != VisitResult::NoMatch {
                log::trace!("{} handled by '{}'", node.describe(), visitor.name());
                return Ok(result);
            }
        }
        Err(ConvertError::ChainExhausted {
            construct: node.describe(),
        })
    }

    /// CSS of every visitor, fallback first then in registration order
    pub fn global_styles(&self) -> String {
        self.collect(|visitor| visitor.global_style())
    }

    /// Script elements of every visitor, fallback first then in registration order
    pub fn global_scripts(&self) -> String {
        self.collect(|visitor| visitor.global_script())
    }

    fn collect(&self, fragment: impl Fn(&dyn Visitor) -> String) -> String {
        std::iter::once(&self.fallback)
            .chain(&self.visitors)
            .map(|visitor| fragment(visitor.as_ref()))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Package names of a `\usepackage[opts]{a, b}` command; bracket options are ignored.
pub fn package_names(cmd: &Group) -> Vec<String> {
    cmd.brace_text(0)
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::NodeKind;
    use crate::source::Token;

    /// Matches every token and command, producing a marker naming itself.
    struct Marker(&'static str);

    impl Visitor for Marker {
        fn name(&self) -> &str {
            self.0
        }

        fn handle_command(
            &mut self,
            _cmd: &Group,
            ctx: &mut Context,
        ) -> Result<VisitResult, ConvertError> {
            Ok(VisitResult::Opaque(ctx.produce(NodeKind::markup(self.0))))
        }

        fn handle_token(
            &mut self,
            _token: &Token,
            ctx: &mut Context,
        ) -> Result<VisitResult, ConvertError> {
            Ok(VisitResult::Opaque(ctx.produce(NodeKind::markup(self.0))))
        }

        fn global_style(&self) -> String {
            format!("/* {} */", self.0)
        }
    }

    struct Never;

    impl Visitor for Never {
        fn name(&self) -> &str {
            "never"
        }
    }

    fn produced_markup(ctx: &Context, result: VisitResult) -> String {
        let id = result.node().unwrap();
        ctx.inspect(id, |kind| match kind {
            NodeKind::Markup { html } => html.clone(),
            other => panic!("unexpected {other:?}"),
        })
        .unwrap()
    }

    #[test]
    fn test_most_recent_visitor_wins() {
        let mut reader = Reader::new(Box::new(Marker("fallback")));
        reader.push(Box::new(Marker("first")));
        reader.push(Box::new(Marker("second")));
        let mut ctx = Context::new();

        let result = reader.dispatch(&SourceNode::text("x"), &mut ctx).unwrap();
        assert_eq!(produced_markup(&ctx, result), "second");
        assert_eq!(reader.chain(), vec!["second", "first", "fallback"]);
    }

    #[test]
    fn test_fallback_catches_declined_nodes() {
        let mut reader = Reader::new(Box::new(Marker("fallback")));
        reader.push(Box::new(Never));
        let mut ctx = Context::new();

        let result = reader
            .dispatch(&SourceNode::cmd("anything", vec![]), &mut ctx)
            .unwrap();
        assert_eq!(produced_markup(&ctx, result), "fallback");
    }

    #[test]
    fn test_exhausted_chain_is_an_error() {
        let mut reader = Reader::new(Box::new(Never));
        let mut ctx = Context::new();
        let err = reader
            .dispatch(&SourceNode::env("x", vec![], vec![]), &mut ctx)
            .unwrap_err();
        assert!(matches!(err, ConvertError::ChainExhausted { .. }));
    }

    #[test]
    fn test_usepackage_activates_once() {
        let mut reader = Reader::new(Box::new(Never));
        let mut ctx = Context::new();
        let usepackage = SourceNode::cmd(
            "usepackage",
            vec![
                SourceNode::bracket(vec![SourceNode::text("final")]),
                SourceNode::brace(vec![SourceNode::text(" amsthm ,amsmath, graphicx")]),
            ],
        );

        // `Never` declines, so the command itself exhausts the chain after activation.
        let _ = reader.dispatch(&usepackage, &mut ctx);
        let _ = reader.dispatch(&usepackage, &mut ctx);

        assert_eq!(reader.active_extensions(), vec!["amsmath", "amsthm"]);
        assert_eq!(reader.chain(), vec!["amsmath", "amsthm", "never"]);
    }

    #[test]
    fn test_disabled_packages_are_not_activated() {
        let mut reader = Reader::new(Box::new(Never));
        reader.enable_only(["amsmath".to_string()]);
        assert!(!reader.activate("amsthm"));
        assert!(reader.activate("amsmath"));
        assert!(!reader.activate("amsmath"));
        assert!(!reader.activate("unknown"));
    }

    #[test]
    fn test_preload_from_options() {
        let options = ConvertOptions::default().with_preload(&["amsthm"]);
        let reader = Reader::from_options(&options);
        assert!(reader.is_active("amsthm"));
        assert_eq!(reader.chain(), vec!["amsthm", "math_mode", "tex", "fallback"]);
    }

    #[test]
    fn test_styles_collect_fallback_first() {
        let mut reader = Reader::new(Box::new(Marker("fallback")));
        reader.push(Box::new(Marker("a")));
        reader.push(Box::new(Never));
        reader.push(Box::new(Marker("b")));
        assert_eq!(reader.global_styles(), "/* fallback */\n/* a */\n/* b */");
        assert_eq!(reader.global_scripts(), "");
    }

    #[test]
    fn test_registry_lists_defaults() {
        let registry = ExtensionRegistry::default();
        assert_eq!(registry.list_extensions(), vec!["amsmath", "amsthm"]);
        assert!(registry.has("amsthm"));
        assert!(!registry.has("graphicx"));
        assert_eq!(registry.create("amsmath").unwrap().name(), "amsmath");
    }

    #[test]
    fn test_package_names_trim_and_skip_empty() {
        let SourceNode::Command(cmd) = SourceNode::cmd_with_text("usepackage", "a,, b ,") else {
            unreachable!()
        };
        assert_eq!(package_names(&cmd), vec!["a", "b"]);
    }
}

//! Traversal context
//!
//!     A [`Context`] is handed to every visitor call. It has two halves:
//!
//!     - Scoped: a stack of key/value scopes and the chain of open output ancestors. Both are
//!       persistent linked lists, so forking does not copy the enclosing levels. Each
//!       node's arguments and children are converted under their own fork, so siblings never
//!       see each other's local registrations. [`Context::register_up`] writes into the
//!       parent's scope, which later siblings share.
//!     - Document-wide: the output arena, the production history, the label table and the
//!       diagnostics. Every fork of one conversion shares the same [`DocumentState`].
//!
//!     Lookups never hold a borrow across a visitor call: each method borrows the shared state
//!     for the duration of the method only.

use crate::diagnostics::Diagnostic;
use crate::error::ConvertError;
use crate::output::{Kind, NodeId, NodeKind, OutputTree, Slot};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeValue {
    Flag(bool),
    Number(i64),
    Text(String),
}

impl ScopeValue {
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ScopeValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            ScopeValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ScopeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Scope {
    values: RefCell<HashMap<String, ScopeValue>>,
    parent: Option<Rc<Scope>>,
}

#[derive(Debug)]
struct Ancestor {
    id: NodeId,
    parent: Option<Rc<Ancestor>>,
}

/// Everything one conversion accumulates, shared by all forks of its context.
#[derive(Debug, Default)]
pub struct DocumentState {
    pub tree: OutputTree,
    /// Every produced node, in production order
    pub history: Vec<NodeId>,
    /// Label id -> tag captured when the label was registered
    pub labels: HashMap<String, String>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct Context {
    scope: Rc<Scope>,
    ancestors: Option<Rc<Ancestor>>,
    doc: Rc<RefCell<DocumentState>>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Root context: one empty scope, no ancestors, fresh document state.
    pub fn new() -> Self {
        Context {
            scope: Rc::new(Scope::default()),
            ancestors: None,
            doc: Rc::new(RefCell::new(DocumentState::default())),
        }
    }

    /// Context for converting one argument or child of `parent`.
    ///
    /// Pushes a fresh scope and records `parent` as the innermost ancestor. Enclosing scopes
    /// and the document state are shared; dropping the fork pops both again.
    pub fn fork(&self, parent: NodeId) -> Context {
        Context {
            scope: Rc::new(Scope {
                values: RefCell::default(),
                parent: Some(Rc::clone(&self.scope)),
            }),
            ancestors: Some(Rc::new(Ancestor {
                id: parent,
                parent: self.ancestors.clone(),
            })),
            doc: Rc::clone(&self.doc),
        }
    }

    /// Number of scopes on the stack.
    pub fn depth(&self) -> usize {
        self.scopes().count()
    }

    fn scopes(&self) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(self.scope.as_ref()), |scope| scope.parent.as_deref())
    }

    /// Open ancestors, innermost first.
    fn open_ancestors(&self) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.ancestors.as_deref(), |link| link.parent.as_deref())
            .map(|link| link.id)
    }

    pub fn register_local(&self, key: impl Into<String>, value: ScopeValue) {
        self.scope.values.borrow_mut().insert(key.into(), value);
    }

    /// Register into the enclosing scope, visible to later siblings of the current node.
    pub fn register_up(&self, key: impl Into<String>, value: ScopeValue) -> Result<(), ConvertError> {
        let key = key.into();
        match &self.scope.parent {
            Some(scope) => {
                scope.values.borrow_mut().insert(key, value);
                Ok(())
            }
            None => Err(ConvertError::ScopeUnderflow { key }),
        }
    }

    /// Nearest value for `key`, searching outward from the current scope.
    pub fn get(&self, key: &str) -> Option<ScopeValue> {
        self.scopes()
            .find_map(|scope| scope.values.borrow().get(key).cloned())
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key)
            .and_then(|value| value.as_flag())
            .unwrap_or(false)
    }

    /// Create an output node and append it to the history.
    pub fn produce(&self, kind: NodeKind) -> NodeId {
        let mut doc = self.doc.borrow_mut();
        let id = doc.tree.insert(kind);
        doc.history.push(id);
        id
    }

    pub fn attach(&self, parent: NodeId, child: NodeId, slot: Slot) -> Result<(), ConvertError> {
        self.doc.borrow_mut().tree.attach(parent, child, slot)?;
        Ok(())
    }

    /// Move `child` (wherever it currently sits) to the end of `parent`'s body.
    pub fn adopt(&self, parent: NodeId, child: NodeId) -> Result<(), ConvertError> {
        self.attach(parent, child, Slot::Child)
    }

    pub fn kind_of(&self, id: NodeId) -> Option<Kind> {
        self.doc.borrow().tree.kind(id).map(NodeKind::kind)
    }

    pub fn tag_of(&self, id: NodeId) -> Option<String> {
        self.doc.borrow().tree.kind(id).and_then(NodeKind::tag)
    }

    /// Read a node's kind in place.
    pub fn inspect<R>(&self, id: NodeId, f: impl FnOnce(&NodeKind) -> R) -> Option<R> {
        self.doc.borrow().tree.kind(id).map(f)
    }

    /// Mutate a node's kind in place.
    pub fn update<R>(&self, id: NodeId, f: impl FnOnce(&mut NodeKind) -> R) -> Option<R> {
        self.doc.borrow_mut().tree.kind_mut(id).map(f)
    }

    /// The node whose argument or child is being converted.
    pub fn parent(&self) -> Option<NodeId> {
        self.ancestors.as_ref().map(|link| link.id)
    }

    /// Innermost open ancestor of kind `kind`.
    pub fn ancestor_of_kind(&self, kind: Kind) -> Option<NodeId> {
        self.ancestor_where(|k| k.kind() == kind)
    }

    /// Innermost open ancestor whose kind satisfies `pred`.
    pub fn ancestor_where(&self, pred: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        let doc = self.doc.borrow();
        self.open_ancestors()
            .find(|&id| doc.tree.kind(id).is_some_and(&pred))
    }

    /// All produced nodes of kind `kind`, most recent first.
    pub fn all_of_kind(&self, kind: Kind) -> Vec<NodeId> {
        let doc = self.doc.borrow();
        doc.history
            .iter()
            .rev()
            .copied()
            .filter(|&id| doc.tree.kind(id).is_some_and(|k| k.kind() == kind))
            .collect()
    }

    pub fn most_recent_of_kind(&self, kind: Kind) -> Option<NodeId> {
        self.most_recent_of_kinds(&[kind])
    }

    /// Most recently produced node whose kind is any of `kinds`.
    pub fn most_recent_of_kinds(&self, kinds: &[Kind]) -> Option<NodeId> {
        let doc = self.doc.borrow();
        doc.history
            .iter()
            .rev()
            .copied()
            .find(|&id| doc.tree.kind(id).is_some_and(|k| kinds.contains(&k.kind())))
    }

    /// Record `label -> tag`. A repeated label keeps the latest tag.
    pub fn register_label(&self, label: impl Into<String>, tag: impl Into<String>) {
        let label = label.into();
        let tag = tag.into();
        let mut doc = self.doc.borrow_mut();
        if let Some(previous) = doc.labels.get(&label) {
            log::warn!("label '{label}' redefined (was {previous}, now {tag})");
        }
        doc.labels.insert(label, tag);
    }

    pub fn record(&self, diagnostic: Diagnostic) {
        self.doc.borrow_mut().diagnostics.push(diagnostic);
    }

    /// Kind names of the open ancestors, outermost first.
    pub fn ancestor_path(&self) -> Vec<String> {
        let doc = self.doc.borrow();
        let mut path: Vec<String> = self
            .open_ancestors()
            .filter_map(|id| doc.tree.kind(id))
            .map(|kind| kind.label().to_string())
            .collect();
        path.reverse();
        path
    }

    /// Move the accumulated document state out, leaving an empty one behind.
    pub fn take_state(&self) -> DocumentState {
        std::mem::take(&mut *self.doc.borrow_mut())
    }
}

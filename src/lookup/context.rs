//! LookupContext — the state anchoring one resolution request.
//!
//! A context is cheap to construct and stack-scoped to a single
//! resolution call. Its expensive part, the ordered list of visible
//! scopes, is built lazily on first use and memoized for the context's
//! lifetime: the anchor symbol's scope chain, then the global scopes of
//! every document reachable through the (possibly cyclic) include graph,
//! closed under scope expansion to a fixed point.

use std::cell::{OnceCell, RefCell};
use std::collections::VecDeque;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::base::{Control, FileId};
use crate::lookup::diagnostics::{Diagnostic, DiagnosticCollector, codes};
use crate::lookup::expand::{ScopeExpander, ScopeSet};
use crate::lookup::expression::ExprResult;
use crate::lookup::resolve::{NameResolver, ResolveMode};
use crate::model::{Document, Name, Scope, ScopeRef, Snapshot, Symbol, SymbolRef};

/// The transient state for one name- or expression-resolution request.
///
/// Holds the session control, the optional symbol anchoring the request
/// position, the document containing the expression being resolved, the
/// document defining the anchor, and the snapshot of reachable documents.
/// The snapshot is borrowed for the context's lifetime, which is what
/// keeps it immutable while the context is alive.
pub struct LookupContext<'a> {
    control: Arc<Control>,
    anchor: Option<SymbolRef>,
    expression_document: Arc<Document>,
    this_document: Arc<Document>,
    snapshot: &'a Snapshot,
    visible: OnceCell<Vec<ScopeRef>>,
    diagnostics: RefCell<DiagnosticCollector>,
}

impl<'a> LookupContext<'a> {
    /// Create a context anchored at `anchor` (a symbol of
    /// `this_document`), resolving an expression of
    /// `expression_document`, against `snapshot`.
    pub fn new(
        anchor: Option<SymbolRef>,
        expression_document: Arc<Document>,
        this_document: Arc<Document>,
        snapshot: &'a Snapshot,
    ) -> Self {
        let control = expression_document.control().clone();
        Self {
            control,
            anchor,
            expression_document,
            this_document,
            snapshot,
            visible: OnceCell::new(),
            diagnostics: RefCell::new(DiagnosticCollector::new()),
        }
    }

    /// Derive a context anchored at another symbol, keeping the same
    /// expression document and snapshot. Answers `None` when the symbol's
    /// document is not reachable.
    pub fn rebase(&self, anchor: SymbolRef) -> Option<LookupContext<'a>> {
        let this_document = if self.this_document.file() == anchor.file {
            self.this_document.clone()
        } else if self.expression_document.file() == anchor.file {
            self.expression_document.clone()
        } else {
            self.snapshot.get(anchor.file)?.clone()
        };
        Some(LookupContext::new(
            Some(anchor),
            self.expression_document.clone(),
            this_document,
            self.snapshot,
        ))
    }

    pub fn control(&self) -> &Arc<Control> {
        &self.control
    }

    /// The symbol anchoring the lookup position, if any.
    pub fn anchor(&self) -> Option<SymbolRef> {
        self.anchor
    }

    pub fn expression_document(&self) -> &Arc<Document> {
        &self.expression_document
    }

    pub fn this_document(&self) -> &Arc<Document> {
        &self.this_document
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    /// The document for `file`: one of the two documents held directly,
    /// or a snapshot entry.
    pub fn document(&self, file: FileId) -> Option<&Document> {
        if self.this_document.file() == file {
            return Some(&self.this_document);
        }
        if self.expression_document.file() == file {
            return Some(&self.expression_document);
        }
        self.snapshot.get(file).map(Arc::as_ref)
    }

    /// Dereference a scope ref, defensively.
    pub fn scope(&self, scope: ScopeRef) -> Option<&Scope> {
        self.document(scope.file)?.scope(scope.scope)
    }

    /// Dereference a symbol ref, defensively.
    pub fn symbol(&self, symbol: SymbolRef) -> Option<&Symbol> {
        self.document(symbol.file)?.symbol(symbol.symbol)
    }

    /// The member scope of `symbol`, as a cross-document ref.
    pub fn member_scope(&self, symbol: SymbolRef) -> Option<ScopeRef> {
        let members = self.symbol(symbol)?.member_scope()?;
        Some(ScopeRef::new(symbol.file, members))
    }

    // ========================================================================
    // VISIBLE SCOPES
    // ========================================================================

    /// The ordered list of scopes an unqualified lookup at the anchor
    /// position searches, innermost first, with all expansions applied.
    /// Built once per context.
    pub fn visible_scopes(&self) -> &[ScopeRef] {
        self.visible.get_or_init(|| self.build_visible_scopes())
    }

    /// A fresh scope list for resolving names relative to a found
    /// declaration: the result symbol's own scope chain, then this
    /// context's list, expanded once.
    pub fn visible_scopes_for(&self, result: &ExprResult) -> Vec<ScopeRef> {
        let mut scopes = Vec::new();
        if let Some(symbol) = result.symbol {
            scopes.extend(self.scope_chain(symbol));
        }
        scopes.extend_from_slice(self.visible_scopes());
        self.expand(&scopes)
    }

    /// The anchor-style scope chain of `symbol`: owning scope, then each
    /// enclosing scope out to the root of its translation unit.
    pub(crate) fn scope_chain(&self, symbol: SymbolRef) -> Vec<ScopeRef> {
        let mut chain = Vec::new();
        let Some(doc) = self.document(symbol.file) else {
            return chain;
        };
        let Some(sym) = doc.symbol(symbol.symbol) else {
            return chain;
        };
        let mut cursor = sym.scope();
        while let Some(id) = cursor {
            chain.push(ScopeRef::new(symbol.file, id));
            cursor = doc.scope(id).and_then(Scope::enclosing_scope);
        }
        chain
    }

    fn build_visible_scopes(&self) -> Vec<ScopeRef> {
        let mut scopes = Vec::new();

        if let Some(anchor) = self.anchor {
            scopes.extend(self.scope_chain(anchor));
        }

        // Include-graph traversal. The processed set is mandatory:
        // mutual or self inclusion makes this graph cyclic.
        let mut processed: FxHashSet<FileId> = FxHashSet::default();
        processed.insert(self.this_document.file());

        let mut todo: VecDeque<FileId> =
            self.this_document.included_files().iter().copied().collect();
        while let Some(file) = todo.pop_front() {
            if !processed.insert(file) {
                continue;
            }
            if let Some(doc) = self.document(file) {
                scopes.push(ScopeRef::new(file, doc.global_scope()));
                todo.extend(doc.included_files().iter().copied());
            }
        }

        // Each expansion round can surface new using-directives or base
        // classes that themselves need expanding; iterate to closure.
        let mut rounds = 0usize;
        loop {
            let expanded = self.expand(&scopes);
            rounds += 1;
            if expanded.len() == scopes.len() {
                tracing::debug!(scopes = expanded.len(), rounds, "visible-scope closure");
                return expanded;
            }
            scopes = expanded;
        }
    }

    /// One expansion pass over a whole scope list. Order-preserving;
    /// never adds the same scope twice.
    pub fn expand(&self, scopes: &[ScopeRef]) -> Vec<ScopeRef> {
        let mut out = ScopeSet::default();
        let expander = ScopeExpander::new(self);
        for &scope in scopes {
            expander.expand_into(scope, scopes, &mut out);
        }
        out.into_iter().collect()
    }

    // ========================================================================
    // NAME RESOLUTION ENTRY POINTS
    // ========================================================================

    /// Resolve `name` across `scopes` under `mode`. See
    /// [`NameResolver::resolve`].
    pub fn resolve(&self, name: &Name, scopes: &[ScopeRef], mode: ResolveMode) -> Vec<SymbolRef> {
        NameResolver::new(self).resolve(name, scopes, mode)
    }

    /// Resolve `name` accepting only namespaces.
    pub fn resolve_namespace(&self, name: &Name, scopes: &[ScopeRef]) -> Vec<SymbolRef> {
        self.resolve(name, scopes, ResolveMode::NAMESPACE)
    }

    /// Resolve `name` accepting only classes.
    pub fn resolve_class(&self, name: &Name, scopes: &[ScopeRef]) -> Vec<SymbolRef> {
        self.resolve(name, scopes, ResolveMode::CLASS)
    }

    /// Resolve `name` accepting classes and namespaces, the filter
    /// applied to all non-final qualifiers of a qualified name.
    pub fn resolve_class_or_namespace(&self, name: &Name, scopes: &[ScopeRef]) -> Vec<SymbolRef> {
        self.resolve(name, scopes, ResolveMode::CLASS | ResolveMode::NAMESPACE)
    }

    // ========================================================================
    // DIAGNOSTICS
    // ========================================================================

    /// Diagnostics collected so far (unresolved base classes).
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().diagnostics().to_vec()
    }

    /// Take the collected diagnostics, leaving the context's collector
    /// empty.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow_mut().take()
    }

    /// Record the one informational note this engine emits. Processing
    /// continues without the base's members.
    pub(crate) fn report_unresolved_base(&self, class: SymbolRef, base_name: &Name) {
        let Some(doc) = self.document(class.file) else {
            return;
        };
        let pretty = base_name.display(doc.control());
        tracing::info!(file = %doc.file(), "unresolved base class: {pretty}");

        let (line, column) = doc
            .symbol(class.symbol)
            .map(Symbol::location)
            .unwrap_or((0, 0));
        self.diagnostics.borrow_mut().add(
            Diagnostic::info(
                class.file,
                line,
                column,
                format!("unresolved base class `{pretty}`"),
            )
            .with_code(codes::UNRESOLVED_BASE_CLASS),
        );
    }
}

impl std::fmt::Debug for LookupContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupContext")
            .field("anchor", &self.anchor)
            .field("this_document", &self.this_document.file())
            .field("expression_document", &self.expression_document.file())
            .field("visible", &self.visible.get().map(Vec::len))
            .finish()
    }
}

//! NameResolver — matching names against scope lists.
//!
//! A pure filtering/collection pass: the resolver walks the given scopes
//! in order, collects every symbol matching the name under the requested
//! mode, and de-duplicates by identity while preserving traversal order.
//! It performs no ranking; ambiguity is represented by a multi-element
//! result, and failure by an empty one.

use std::ops::BitOr;
use std::sync::Arc;

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;

use crate::base::Identifier;
use crate::lookup::context::LookupContext;
use crate::lookup::expand::{ScopeExpander, ScopeSet};
use crate::model::{Document, Name, QualifiedName, ScopeRef, Symbol, SymbolRef};

/// Bitmask selecting which symbol kinds a lookup accepts.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ResolveMode(u8);

impl ResolveMode {
    /// Match namespace symbols.
    pub const NAMESPACE: ResolveMode = ResolveMode(1 << 0);
    /// Match class symbols.
    pub const CLASS: ResolveMode = ResolveMode(1 << 1);
    /// Match any symbol.
    pub const SYMBOL: ResolveMode = ResolveMode(1 << 2);

    pub fn intersects(self, other: ResolveMode) -> bool {
        self.0 & other.0 != 0
    }

    fn accepts(self, symbol: &Symbol) -> bool {
        (self.intersects(ResolveMode::NAMESPACE) && symbol.is_namespace())
            || (self.intersects(ResolveMode::CLASS) && symbol.is_class())
            || self.intersects(ResolveMode::SYMBOL)
    }
}

impl BitOr for ResolveMode {
    type Output = ResolveMode;

    fn bitor(self, rhs: ResolveMode) -> ResolveMode {
        ResolveMode(self.0 | rhs.0)
    }
}

impl std::fmt::Debug for ResolveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if self.intersects(ResolveMode::NAMESPACE) {
            parts.push("NAMESPACE");
        }
        if self.intersects(ResolveMode::CLASS) {
            parts.push("CLASS");
        }
        if self.intersects(ResolveMode::SYMBOL) {
            parts.push("SYMBOL");
        }
        write!(f, "ResolveMode({})", parts.join(" | "))
    }
}

/// Order-preserving identity set of candidates.
type CandidateSet = IndexSet<SymbolRef, FxBuildHasher>;

/// Resolves names across ordered scope lists.
pub struct NameResolver<'c, 'a> {
    ctx: &'c LookupContext<'a>,
}

impl<'c, 'a> NameResolver<'c, 'a> {
    pub fn new(ctx: &'c LookupContext<'a>) -> Self {
        Self { ctx }
    }

    /// Resolve `name` across `scopes` under `mode`.
    ///
    /// Candidates come back in scope-traversal order, then in declaration
    /// order within a scope. "Not found" is the empty vector.
    pub fn resolve(&self, name: &Name, scopes: &[ScopeRef], mode: ResolveMode) -> Vec<SymbolRef> {
        match name {
            Name::Qualified(q) => self.resolve_qualified(q, scopes, mode),
            Name::Operator(_) => self.resolve_operator(name, scopes),
            Name::Identifier(_) | Name::Destructor(_) | Name::Template { .. } => {
                self.resolve_unqualified(name, scopes, mode)
            }
        }
    }

    /// Qualified lookup: each qualifier must resolve as a class or
    /// namespace; after the first qualifier resolves, the search
    /// collapses into the candidates' member scopes and never falls back
    /// to the outer list. A failed qualifier fails the whole lookup.
    fn resolve_qualified(
        &self,
        q: &QualifiedName,
        scopes: &[ScopeRef],
        mode: ResolveMode,
    ) -> Vec<SymbolRef> {
        let mut current: Vec<ScopeRef> = scopes.to_vec();

        for (index, component) in q.components.iter().enumerate() {
            let is_last = index + 1 == q.components.len();
            let candidates = if is_last {
                self.resolve(component, &current, mode)
            } else {
                self.resolve(
                    component,
                    &current,
                    ResolveMode::CLASS | ResolveMode::NAMESPACE,
                )
            };

            if is_last || candidates.is_empty() {
                return candidates;
            }

            // The next component searches only the member scopes of what
            // this qualifier resolved to. Directive names inside those
            // scopes still resolve against the caller's original list.
            let expander = ScopeExpander::new(self.ctx);
            let mut collapsed = ScopeSet::default();
            for candidate in candidates {
                if let Some(members) = self.ctx.member_scope(candidate) {
                    expander.expand_into(members, scopes, &mut collapsed);
                }
            }
            current = collapsed.into_iter().collect();
        }

        Vec::new()
    }

    fn resolve_unqualified(
        &self,
        name: &Name,
        scopes: &[ScopeRef],
        mode: ResolveMode,
    ) -> Vec<SymbolRef> {
        let mut candidates = CandidateSet::default();
        let Some(query_id) = name.identifier() else {
            return Vec::new();
        };

        for &scope_ref in scopes {
            let Some(doc) = self.ctx.document(scope_ref.file) else {
                continue;
            };
            let Some(scope) = doc.scope(scope_ref.scope) else {
                continue;
            };
            let Some(local_id) = self.local_identifier(doc, query_id) else {
                continue;
            };

            let mut cursor = scope.first_with_identifier(local_id);
            while let Some(sym_id) = cursor {
                let Some(symbol) = doc.symbol(sym_id) else {
                    break;
                };
                cursor = symbol.next_with_same_identifier();

                let Some(sym_name) = symbol.name() else {
                    continue;
                };
                // Symbols declared under a qualified name (out-of-line
                // definitions) are not unqualified-lookup targets.
                if sym_name.is_qualified() {
                    continue;
                }
                // Bucket entries share an identifier slot; re-check the
                // actual identifier and destructor-ness.
                if !sym_name.matches_identifier(local_id) {
                    continue;
                }
                if sym_name.is_destructor() != name.is_destructor() {
                    continue;
                }
                if mode.accepts(symbol) {
                    candidates.insert(SymbolRef::new(scope_ref.file, sym_id));
                }
            }
        }

        candidates.into_iter().collect()
    }

    fn resolve_operator(&self, name: &Name, scopes: &[ScopeRef]) -> Vec<SymbolRef> {
        let mut candidates = CandidateSet::default();
        let Some(kind) = name.operator_kind() else {
            return Vec::new();
        };

        for &scope_ref in scopes {
            let Some(doc) = self.ctx.document(scope_ref.file) else {
                continue;
            };
            let Some(scope) = doc.scope(scope_ref.scope) else {
                continue;
            };

            let mut cursor = scope.first_with_operator(kind);
            while let Some(sym_id) = cursor {
                let Some(symbol) = doc.symbol(sym_id) else {
                    break;
                };
                cursor = symbol.next_with_same_identifier();

                // Operator sets are small; full name equality is the
                // final check.
                if symbol.name() == Some(name) {
                    candidates.insert(SymbolRef::new(scope_ref.file, sym_id));
                }
            }
        }

        candidates.into_iter().collect()
    }

    /// Translate a query identifier into `doc`'s control.
    ///
    /// Documents of one session share one control, so this is normally
    /// the identity. The spelling comparison guards against handles from
    /// a foreign control aliasing unrelated spellings.
    fn local_identifier(&self, doc: &Document, query: Identifier) -> Option<Identifier> {
        if Arc::ptr_eq(self.ctx.control(), doc.control()) {
            return Some(query);
        }
        let spelling = self.ctx.control().identifier_text(query)?;
        doc.control().find_identifier(&spelling)
    }
}

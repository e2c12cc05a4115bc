//! ScopeExpander — the closure that makes implicitly-visible scopes
//! explicit.
//!
//! Given a scope, expansion appends every additional scope it exposes:
//! reopened namespaces, anonymous namespaces and enums, `using namespace`
//! targets, base classes, function argument scopes, and the members of a
//! qualified function name's qualifier. Membership in the output set is
//! checked by scope identity *before* recursing, which is the only thing
//! standing between this computation and infinite recursion on cyclic
//! directive graphs — it is not an optimization.

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;

use crate::lookup::context::LookupContext;
use crate::model::{Document, Name, Scope, ScopeKind, ScopeRef, SymbolKind, SymbolRef};

/// Order-preserving identity set of scopes: iteration yields scopes in
/// first-insertion order, and re-inserting is a no-op.
pub(crate) type ScopeSet = IndexSet<ScopeRef, FxBuildHasher>;

/// Expands scopes into the closure of everything they make visible.
pub(crate) struct ScopeExpander<'c, 'a> {
    ctx: &'c LookupContext<'a>,
}

impl<'c, 'a> ScopeExpander<'c, 'a> {
    pub(crate) fn new(ctx: &'c LookupContext<'a>) -> Self {
        Self { ctx }
    }

    /// Append `scope` and everything it exposes to `out`. `visible` is
    /// the caller's current visibility list, used to resolve names that
    /// appear inside directives (the namespace name of a
    /// `using namespace`, a base-class name).
    pub(crate) fn expand_into(&self, scope: ScopeRef, visible: &[ScopeRef], out: &mut ScopeSet) {
        if !out.insert(scope) {
            return;
        }
        let Some(doc) = self.ctx.document(scope.file) else {
            return;
        };
        let Some(s) = doc.scope(scope.scope) else {
            return;
        };
        match s.kind() {
            ScopeKind::Namespace => self.expand_namespace(doc, scope, s, visible, out),
            ScopeKind::Class => self.expand_class(doc, scope, s, visible, out),
            ScopeKind::Block => self.expand_block(doc, scope, s, visible, out),
            ScopeKind::Function => self.expand_function(doc, scope, s, visible, out),
            ScopeKind::Prototype | ScopeKind::Enum => {}
        }
    }

    fn expand_namespace(
        &self,
        doc: &Document,
        scope: ScopeRef,
        s: &Scope,
        visible: &[ScopeRef],
        out: &mut ScopeSet,
    ) {
        let Some(owner_id) = s.owner() else {
            return;
        };
        let owner_ref = SymbolRef::new(scope.file, owner_id);
        let Some(owner) = doc.symbol(owner_id) else {
            return;
        };
        if !owner.is_namespace() {
            return;
        }

        // Namespaces reopen: `namespace N { }` in several places (or
        // several files) is one logical namespace, so every other
        // namespace sharing this one's name contributes its members.
        if let Some(name) = owner.name() {
            for candidate in self.ctx.resolve_namespace(name, visible) {
                if candidate == owner_ref {
                    continue;
                }
                if let Some(members) = self.ctx.member_scope(candidate) {
                    self.expand_into(members, visible, out);
                }
            }
        }

        for &member_id in s.symbols() {
            let Some(member) = doc.symbol(member_id) else {
                continue;
            };
            match member.kind() {
                // Anonymous namespaces are always visible to their
                // enclosing scope.
                SymbolKind::Namespace { members } if member.name().is_none() => {
                    self.expand_into(ScopeRef::new(scope.file, *members), visible, out);
                }
                SymbolKind::UsingNamespaceDirective => {
                    if let Some(target) = member.name() {
                        for candidate in self.ctx.resolve_namespace(target, visible) {
                            if let Some(members) = self.ctx.member_scope(candidate) {
                                self.expand_into(members, visible, out);
                            }
                        }
                    }
                }
                // Anonymous enums dump their enumerators into the
                // enclosing scope.
                SymbolKind::Enum { members } if member.name().is_none() => {
                    self.expand_into(ScopeRef::new(scope.file, *members), visible, out);
                }
                _ => {}
            }
        }
    }

    fn expand_class(
        &self,
        doc: &Document,
        scope: ScopeRef,
        s: &Scope,
        visible: &[ScopeRef],
        out: &mut ScopeSet,
    ) {
        let Some(owner_id) = s.owner() else {
            return;
        };
        let Some(owner) = doc.symbol(owner_id) else {
            return;
        };
        if !owner.is_class() {
            return;
        }

        for &member_id in s.symbols() {
            let Some(member) = doc.symbol(member_id) else {
                continue;
            };
            match member.kind() {
                SymbolKind::Class { members, .. } if member.name().is_none() => {
                    self.expand_into(ScopeRef::new(scope.file, *members), visible, out);
                }
                SymbolKind::Enum { members } if member.name().is_none() => {
                    self.expand_into(ScopeRef::new(scope.file, *members), visible, out);
                }
                _ => {}
            }
        }

        let bases = owner.base_classes();
        if bases.is_empty() {
            return;
        }

        // Base-class names resolve in a list augmented with the members
        // of every *named* namespace enclosing the class, so that
        // `class D : Base` inside `namespace N` finds `N::Base`.
        let mut class_visible: Vec<ScopeRef> = visible.to_vec();
        let mut cursor = owner.scope();
        while let Some(scope_id) = cursor {
            let Some(enclosing) = doc.scope(scope_id) else {
                break;
            };
            if enclosing.kind() == ScopeKind::Namespace {
                if let Some(ns) = enclosing.owner().and_then(|id| doc.symbol(id)) {
                    if ns.is_namespace() {
                        if let Some(ns_name) = ns.name() {
                            for candidate in self.ctx.resolve_namespace(ns_name, visible) {
                                if let Some(members) = self.ctx.member_scope(candidate) {
                                    let snapshot = class_visible.clone();
                                    let mut grown: ScopeSet =
                                        class_visible.iter().copied().collect();
                                    self.expand_into(members, &snapshot, &mut grown);
                                    class_visible = grown.into_iter().collect();
                                }
                            }
                        }
                    }
                }
            }
            cursor = enclosing.enclosing_scope();
        }

        for base in bases {
            let candidates = self.ctx.resolve_class(&base.name, &class_visible);
            if candidates.is_empty() {
                self.ctx
                    .report_unresolved_base(SymbolRef::new(scope.file, owner_id), &base.name);
                continue;
            }
            for candidate in candidates {
                if let Some(members) = self.ctx.member_scope(candidate) {
                    self.expand_into(members, visible, out);
                }
            }
        }
    }

    fn expand_block(
        &self,
        doc: &Document,
        _scope: ScopeRef,
        s: &Scope,
        visible: &[ScopeRef],
        out: &mut ScopeSet,
    ) {
        for &member_id in s.symbols() {
            let Some(member) = doc.symbol(member_id) else {
                continue;
            };
            if member.is_using_namespace_directive() {
                if let Some(target) = member.name() {
                    for candidate in self.ctx.resolve_namespace(target, visible) {
                        if let Some(members) = self.ctx.member_scope(candidate) {
                            self.expand_into(members, visible, out);
                        }
                    }
                }
            }
        }
    }

    fn expand_function(
        &self,
        doc: &Document,
        scope: ScopeRef,
        s: &Scope,
        visible: &[ScopeRef],
        out: &mut ScopeSet,
    ) {
        let Some(owner_id) = s.owner() else {
            return;
        };
        let Some(owner) = doc.symbol(owner_id) else {
            return;
        };
        let SymbolKind::Function { arguments, .. } = owner.kind() else {
            return;
        };

        // Parameters are visible in the body; the argument scope is
        // appended directly, never expanded.
        out.insert(ScopeRef::new(scope.file, *arguments));

        // A qualified function name (`Class::method`) pulls the
        // qualifier's members into scope: a member function body sees
        // its siblings without `this->`.
        if let Some(Name::Qualified(q)) = owner.name() {
            let Some(qualifier) = q.qualifier() else {
                return;
            };
            for candidate in self.ctx.resolve_class_or_namespace(&qualifier, visible) {
                if let Some(members) = self.ctx.member_scope(candidate) {
                    self.expand_into(members, visible, out);
                }
            }
        }
    }
}

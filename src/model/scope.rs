//! Scopes — containers of declared symbols.
//!
//! A scope stores its symbols in declaration order and additionally keeps
//! a hash index from identifier to the head of a singly-linked chain of
//! same-identifier symbols (the overload chain), plus a parallel index for
//! operator overloads. Scopes form a tree per translation unit through the
//! non-owning `enclosing` back-reference.

use rustc_hash::FxHashMap;
use std::fmt;

use crate::base::{FileId, Identifier};
use crate::model::name::OperatorKind;
use crate::model::symbol::SymbolId;

/// Index of a scope in its document's arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ScopeId(pub(crate) u32);

impl ScopeId {
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

/// A scope together with the document that owns it.
///
/// `ScopeRef` is the identity key used by expansion: two refs are the same
/// scope exactly when they compare equal. Valid only while the owning
/// document is alive.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ScopeRef {
    pub file: FileId,
    pub scope: ScopeId,
}

impl ScopeRef {
    pub fn new(file: FileId, scope: ScopeId) -> Self {
        Self { file, scope }
    }
}

/// What kind of construct a scope belongs to. Drives expansion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Namespace,
    Class,
    Block,
    /// A function body.
    Function,
    /// A declaration-only argument scope; never expanded.
    Prototype,
    /// An enum's member scope; the *enclosing* scope's expansion decides
    /// whether the enumerators become visible.
    Enum,
}

/// An ordered bag of symbols with hash indices for lookup.
#[derive(Debug)]
pub struct Scope {
    kind: ScopeKind,
    /// The symbol this scope belongs to; `None` only for the root
    /// namespace scope of a translation unit.
    owner: Option<SymbolId>,
    enclosing: Option<ScopeId>,
    symbols: Vec<SymbolId>,
    /// Head of the same-identifier overload chain per identifier.
    by_identifier: FxHashMap<Identifier, SymbolId>,
    /// Head of the overload chain per operator kind.
    by_operator: FxHashMap<OperatorKind, SymbolId>,
}

impl Scope {
    pub(crate) fn new(kind: ScopeKind, owner: Option<SymbolId>, enclosing: Option<ScopeId>) -> Self {
        Self {
            kind,
            owner,
            enclosing,
            symbols: Vec::new(),
            by_identifier: FxHashMap::default(),
            by_operator: FxHashMap::default(),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// The symbol owning this scope.
    pub fn owner(&self) -> Option<SymbolId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: SymbolId) {
        self.owner = Some(owner);
    }

    /// The enclosing scope; `None` at the root of the tree.
    pub fn enclosing_scope(&self) -> Option<ScopeId> {
        self.enclosing
    }

    /// Symbols in declaration order.
    pub fn symbols(&self) -> &[SymbolId] {
        &self.symbols
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// First symbol of the overload chain for `identifier`, if any.
    pub fn first_with_identifier(&self, identifier: Identifier) -> Option<SymbolId> {
        self.by_identifier.get(&identifier).copied()
    }

    /// First symbol of the overload chain for `operator`, if any.
    pub fn first_with_operator(&self, operator: OperatorKind) -> Option<SymbolId> {
        self.by_operator.get(&operator).copied()
    }

    pub(crate) fn push_symbol(&mut self, symbol: SymbolId) {
        self.symbols.push(symbol);
    }

    /// Record `symbol` as the chain head for `identifier` if the bucket is
    /// empty; otherwise return the current head so the caller can append
    /// to the chain tail (chains stay in declaration order).
    pub(crate) fn enter_identifier_bucket(
        &mut self,
        identifier: Identifier,
        symbol: SymbolId,
    ) -> Option<SymbolId> {
        match self.by_identifier.entry(identifier) {
            std::collections::hash_map::Entry::Occupied(head) => Some(*head.get()),
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(symbol);
                None
            }
        }
    }

    pub(crate) fn enter_operator_bucket(
        &mut self,
        operator: OperatorKind,
        symbol: SymbolId,
    ) -> Option<SymbolId> {
        match self.by_operator.entry(operator) {
            std::collections::hash_map::Entry::Occupied(head) => Some(*head.get()),
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(symbol);
                None
            }
        }
    }
}

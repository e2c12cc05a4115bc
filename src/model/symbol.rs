//! Symbols — declared program entities.

use std::fmt;

use crate::base::FileId;
use crate::model::name::Name;
use crate::model::scope::ScopeId;
use crate::model::ty::FullySpecifiedType;

/// Index of a symbol in its document's arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SymbolId(pub(crate) u32);

impl SymbolId {
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

/// A symbol together with the document that owns it.
///
/// Candidate lists produced by lookup are lists of `SymbolRef`s; they are
/// identity keys (two refs name the same symbol exactly when equal) and
/// must not outlive the owning document.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SymbolRef {
    pub file: FileId,
    pub symbol: SymbolId,
}

impl SymbolRef {
    pub fn new(file: FileId, symbol: SymbolId) -> Self {
        Self { file, symbol }
    }
}

/// A base-class specifier on a class symbol, by name. Resolution to the
/// actual class happens during scope expansion, not at graph-build time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseClass {
    pub name: Name,
    pub is_virtual: bool,
}

impl BaseClass {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            is_virtual: false,
        }
    }
}

/// What a symbol declares, with the data each kind carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Namespace {
        members: ScopeId,
    },
    Class {
        members: ScopeId,
        bases: Vec<BaseClass>,
    },
    Enum {
        members: ScopeId,
    },
    Enumerator,
    Function {
        /// Parameter scope; appended (not expanded) when the body scope
        /// is expanded.
        arguments: ScopeId,
        /// Body scope; `None` for declarations without a definition.
        body: Option<ScopeId>,
    },
    Block {
        members: ScopeId,
    },
    /// A variable, typedef, or other plain declaration.
    Declaration,
    /// A function parameter.
    Argument,
    /// A `using namespace X;` directive; the symbol's name is the target
    /// namespace's name.
    UsingNamespaceDirective,
}

/// One declared entity: name, type, kind, and the scope it lives in.
#[derive(Clone, Debug)]
pub struct Symbol {
    name: Option<Name>,
    ty: FullySpecifiedType,
    kind: SymbolKind,
    /// Owning scope back-reference; `None` only for the root namespace
    /// symbol of a translation unit.
    scope: Option<ScopeId>,
    line: u32,
    column: u32,
    /// Link to the next symbol sharing this one's identifier bucket in
    /// the owning scope (the overload chain).
    next_with_same_identifier: Option<SymbolId>,
}

impl Symbol {
    pub(crate) fn new(
        name: Option<Name>,
        ty: FullySpecifiedType,
        kind: SymbolKind,
        scope: Option<ScopeId>,
    ) -> Self {
        Self {
            name,
            ty,
            kind,
            scope,
            line: 0,
            column: 0,
            next_with_same_identifier: None,
        }
    }

    pub fn name(&self) -> Option<&Name> {
        self.name.as_ref()
    }

    pub fn ty(&self) -> &FullySpecifiedType {
        &self.ty
    }

    pub fn kind(&self) -> &SymbolKind {
        &self.kind
    }

    /// The scope this symbol is declared in.
    pub fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    /// Declaration position, 0-indexed.
    pub fn location(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    pub(crate) fn set_location(&mut self, line: u32, column: u32) {
        self.line = line;
        self.column = column;
    }

    /// Next symbol in the same-identifier overload chain.
    pub fn next_with_same_identifier(&self) -> Option<SymbolId> {
        self.next_with_same_identifier
    }

    pub(crate) fn set_next_with_same_identifier(&mut self, next: SymbolId) {
        self.next_with_same_identifier = Some(next);
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self.kind, SymbolKind::Namespace { .. })
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, SymbolKind::Class { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function { .. })
    }

    pub fn is_using_namespace_directive(&self) -> bool {
        matches!(self.kind, SymbolKind::UsingNamespaceDirective)
    }

    /// The scope of this symbol's members, for the kinds that have one.
    ///
    /// Functions answer with their body scope: qualified lookup through a
    /// function name collapses into its locals, never its parameters.
    pub fn member_scope(&self) -> Option<ScopeId> {
        match &self.kind {
            SymbolKind::Namespace { members }
            | SymbolKind::Class { members, .. }
            | SymbolKind::Enum { members }
            | SymbolKind::Block { members } => Some(*members),
            SymbolKind::Function { body, .. } => *body,
            SymbolKind::Enumerator
            | SymbolKind::Declaration
            | SymbolKind::Argument
            | SymbolKind::UsingNamespaceDirective => None,
        }
    }

    /// Base-class specifiers, for class symbols.
    pub fn base_classes(&self) -> &[BaseClass] {
        match &self.kind {
            SymbolKind::Class { bases, .. } => bases,
            _ => &[],
        }
    }
}

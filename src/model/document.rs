//! Documents — one parsed translation unit.
//!
//! A document owns the arena of scopes and symbols built for one
//! translation unit, its root namespace, and the list of files it
//! includes. The arena is index-based: scopes and symbols refer to each
//! other through `ScopeId`/`SymbolId`, which stay valid for the
//! document's whole lifetime and are released in bulk when it is dropped.
//!
//! The construction methods here are the surface the upstream parser
//! drives; lookups only ever read.

use std::sync::Arc;

use thiserror::Error;

use crate::base::{Control, FileId};
use crate::model::name::Name;
use crate::model::scope::{Scope, ScopeId, ScopeKind};
use crate::model::symbol::{BaseClass, Symbol, SymbolId, SymbolKind};
use crate::model::ty::{BuiltinKind, FullySpecifiedType};

/// Violations of the symbol-graph contracts, reported by
/// [`Document::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("scope {0:?} participates in an enclosing-scope cycle")]
    ScopeCycle(ScopeId),
    #[error("scope {0:?} refers to an out-of-range enclosing scope")]
    DanglingEnclosing(ScopeId),
    #[error("scope {0:?} refers to an out-of-range owner symbol")]
    DanglingOwner(ScopeId),
    #[error("symbol {0:?} refers to an out-of-range owning scope")]
    DanglingScope(SymbolId),
    #[error("symbol {0:?} has an out-of-range overload chain link")]
    DanglingOverloadLink(SymbolId),
}

/// One parsed translation unit.
pub struct Document {
    file: FileId,
    control: Arc<Control>,
    includes: Vec<FileId>,
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
    global_namespace: SymbolId,
}

impl Document {
    /// Create an empty document for `file`, with its root namespace in
    /// place.
    pub fn new(file: FileId, control: Arc<Control>) -> Self {
        let mut doc = Self {
            file,
            control,
            includes: Vec::new(),
            scopes: Vec::new(),
            symbols: Vec::new(),
            global_namespace: SymbolId(0),
        };

        let members = doc.new_scope(ScopeKind::Namespace, None, None);
        let root = doc.push_symbol(Symbol::new(
            None,
            FullySpecifiedType::unknown(),
            SymbolKind::Namespace { members },
            None,
        ));
        doc.scopes[members.0 as usize].set_owner(root);
        doc.global_namespace = root;
        doc
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn control(&self) -> &Arc<Control> {
        &self.control
    }

    /// The root namespace symbol.
    pub fn global_namespace(&self) -> SymbolId {
        self.global_namespace
    }

    /// The root namespace's member scope, i.e. file-level declarations.
    pub fn global_scope(&self) -> ScopeId {
        // The root namespace always has a member scope.
        self.symbols[self.global_namespace.0 as usize]
            .member_scope()
            .expect("root namespace has members")
    }

    /// Files this translation unit includes, in inclusion order.
    pub fn included_files(&self) -> &[FileId] {
        &self.includes
    }

    /// Record an `#include`d file.
    pub fn add_include(&mut self, file: FileId) {
        self.includes.push(file);
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0 as usize)
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// The member scope of a symbol, for the kinds that have one.
    pub fn members_of(&self, symbol: SymbolId) -> Option<ScopeId> {
        self.symbol(symbol).and_then(Symbol::member_scope)
    }

    // ========================================================================
    // CONSTRUCTION (driven by the upstream parser)
    // ========================================================================

    /// Declare a (possibly anonymous) namespace in `parent`.
    pub fn add_namespace(&mut self, parent: ScopeId, name: Option<Name>) -> SymbolId {
        let sym = self.next_symbol_id();
        let members = self.new_scope(ScopeKind::Namespace, Some(sym), Some(parent));
        self.enter(
            parent,
            Symbol::new(
                name,
                FullySpecifiedType::unknown(),
                SymbolKind::Namespace { members },
                Some(parent),
            ),
        )
    }

    /// Declare a (possibly anonymous) class in `parent`.
    pub fn add_class(
        &mut self,
        parent: ScopeId,
        name: Option<Name>,
        bases: Vec<BaseClass>,
    ) -> SymbolId {
        let sym = self.next_symbol_id();
        let members = self.new_scope(ScopeKind::Class, Some(sym), Some(parent));
        let ty = match &name {
            Some(n) => FullySpecifiedType::named(n.clone()),
            None => FullySpecifiedType::unknown(),
        };
        self.enter(
            parent,
            Symbol::new(name, ty, SymbolKind::Class { members, bases }, Some(parent)),
        )
    }

    /// Declare a (possibly anonymous) enum in `parent`.
    pub fn add_enum(&mut self, parent: ScopeId, name: Option<Name>) -> SymbolId {
        let sym = self.next_symbol_id();
        let members = self.new_scope(ScopeKind::Enum, Some(sym), Some(parent));
        self.enter(
            parent,
            Symbol::new(
                name,
                FullySpecifiedType::unknown(),
                SymbolKind::Enum { members },
                Some(parent),
            ),
        )
    }

    /// Declare an enumerator inside `enum_scope`.
    pub fn add_enumerator(&mut self, enum_scope: ScopeId, name: Name) -> SymbolId {
        self.enter(
            enum_scope,
            Symbol::new(
                Some(name),
                FullySpecifiedType::builtin(BuiltinKind::Int),
                SymbolKind::Enumerator,
                Some(enum_scope),
            ),
        )
    }

    /// Declare a function without a body (a prototype).
    pub fn add_function_declaration(
        &mut self,
        parent: ScopeId,
        name: Name,
        return_type: FullySpecifiedType,
    ) -> SymbolId {
        self.add_function(parent, name, return_type, false)
    }

    /// Define a function with a body scope.
    pub fn add_function_definition(
        &mut self,
        parent: ScopeId,
        name: Name,
        return_type: FullySpecifiedType,
    ) -> SymbolId {
        self.add_function(parent, name, return_type, true)
    }

    fn add_function(
        &mut self,
        parent: ScopeId,
        name: Name,
        return_type: FullySpecifiedType,
        has_body: bool,
    ) -> SymbolId {
        let sym = self.next_symbol_id();
        let arguments = self.new_scope(ScopeKind::Prototype, Some(sym), Some(parent));
        let body = has_body.then(|| self.new_scope(ScopeKind::Function, Some(sym), Some(parent)));
        self.enter(
            parent,
            Symbol::new(
                Some(name),
                FullySpecifiedType::function_returning(return_type),
                SymbolKind::Function { arguments, body },
                Some(parent),
            ),
        )
    }

    /// Declare a parameter of `function`.
    ///
    /// Answers `None` when `function` is not a function symbol.
    pub fn add_argument(
        &mut self,
        function: SymbolId,
        name: Option<Name>,
        ty: FullySpecifiedType,
    ) -> Option<SymbolId> {
        let arguments = match self.symbol(function)?.kind() {
            SymbolKind::Function { arguments, .. } => *arguments,
            _ => return None,
        };
        Some(self.enter(
            arguments,
            Symbol::new(name, ty, SymbolKind::Argument, Some(arguments)),
        ))
    }

    /// The body scope of a function definition.
    pub fn function_body(&self, function: SymbolId) -> Option<ScopeId> {
        match self.symbol(function)?.kind() {
            SymbolKind::Function { body, .. } => *body,
            _ => None,
        }
    }

    /// Declare a variable/typedef-style declaration in `parent`.
    pub fn add_declaration(
        &mut self,
        parent: ScopeId,
        name: Name,
        ty: FullySpecifiedType,
    ) -> SymbolId {
        self.enter(
            parent,
            Symbol::new(Some(name), ty, SymbolKind::Declaration, Some(parent)),
        )
    }

    /// Open an anonymous block inside `parent` (a function body or
    /// another block).
    pub fn add_block(&mut self, parent: ScopeId) -> SymbolId {
        let sym = self.next_symbol_id();
        let members = self.new_scope(ScopeKind::Block, Some(sym), Some(parent));
        self.enter(
            parent,
            Symbol::new(
                None,
                FullySpecifiedType::unknown(),
                SymbolKind::Block { members },
                Some(parent),
            ),
        )
    }

    /// Record a `using namespace target;` directive in `parent`.
    pub fn add_using_namespace(&mut self, parent: ScopeId, target: Name) -> SymbolId {
        self.enter(
            parent,
            Symbol::new(
                Some(target),
                FullySpecifiedType::unknown(),
                SymbolKind::UsingNamespaceDirective,
                Some(parent),
            ),
        )
    }

    /// Set a symbol's declaration position (0-indexed line/column).
    pub fn set_location(&mut self, symbol: SymbolId, line: u32, column: u32) {
        if let Some(sym) = self.symbols.get_mut(symbol.0 as usize) {
            sym.set_location(line, column);
        }
    }

    // ========================================================================
    // CONTRACT VALIDATION
    // ========================================================================

    /// Check the collaborator contracts the lookup engine relies on:
    /// every enclosing-scope chain terminates, and every cross-index in
    /// the arena is in range.
    ///
    /// Lookups never call this; it exists for the parser integration to
    /// assert its output is well-formed.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (index, scope) in self.scopes.iter().enumerate() {
            let id = ScopeId(index as u32);
            if let Some(owner) = scope.owner() {
                if owner.0 as usize >= self.symbols.len() {
                    return Err(ModelError::DanglingOwner(id));
                }
            }

            // Chain termination: no chain can be longer than the arena.
            let mut steps = 0usize;
            let mut cursor = scope.enclosing_scope();
            while let Some(next) = cursor {
                if next.0 as usize >= self.scopes.len() {
                    return Err(ModelError::DanglingEnclosing(id));
                }
                if steps > self.scopes.len() {
                    return Err(ModelError::ScopeCycle(id));
                }
                steps += 1;
                cursor = self.scopes[next.0 as usize].enclosing_scope();
            }
        }

        for (index, symbol) in self.symbols.iter().enumerate() {
            let id = SymbolId(index as u32);
            if let Some(scope) = symbol.scope() {
                if scope.0 as usize >= self.scopes.len() {
                    return Err(ModelError::DanglingScope(id));
                }
            }
            if let Some(next) = symbol.next_with_same_identifier() {
                if next.0 as usize >= self.symbols.len() {
                    return Err(ModelError::DanglingOverloadLink(id));
                }
            }
        }

        Ok(())
    }

    // ========================================================================
    // ARENA INTERNALS
    // ========================================================================

    fn next_symbol_id(&self) -> SymbolId {
        SymbolId(self.symbols.len() as u32)
    }

    fn new_scope(
        &mut self,
        kind: ScopeKind,
        owner: Option<SymbolId>,
        enclosing: Option<ScopeId>,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, owner, enclosing));
        id
    }

    fn push_symbol(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    /// Add `symbol` to `scope`, maintaining the identifier/operator hash
    /// buckets and the same-identifier overload chains in declaration
    /// order.
    fn enter(&mut self, scope: ScopeId, symbol: Symbol) -> SymbolId {
        let id = self.push_symbol(symbol);
        let Some(slot) = self.scopes.get_mut(scope.0 as usize) else {
            return id;
        };
        slot.push_symbol(id);

        let Some(name) = self.symbols[id.0 as usize].name().cloned() else {
            return id;
        };

        let head = if let Some(op) = name.operator_kind() {
            self.scopes[scope.0 as usize].enter_operator_bucket(op, id)
        } else if let Some(identifier) = name.identifier() {
            self.scopes[scope.0 as usize].enter_identifier_bucket(identifier, id)
        } else {
            None
        };

        // Append at the chain tail so walk order stays declaration order.
        if let Some(head) = head {
            let mut tail = head;
            while let Some(next) = self.symbols[tail.0 as usize].next_with_same_identifier() {
                tail = next;
            }
            self.symbols[tail.0 as usize].set_next_with_same_identifier(id);
        }

        id
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("file", &self.file)
            .field("scopes", &self.scopes.len())
            .field("symbols", &self.symbols.len())
            .field("includes", &self.includes)
            .finish()
    }
}

//! # cppmodel-base
//!
//! Core library for C++ symbol graphs, name lookup, and expression
//! resolution.
//!
//! Given a symbol graph built from parsed translation units and a name (or
//! expression) appearing at some position, the engine determines which
//! declared entities that name could refer to, honoring C++ visibility:
//! namespace nesting and reopening, class inheritance, using-directives,
//! block scopes, function argument scopes, and qualified-name traversal.
//!
//! The parser producing the symbol graph is an external collaborator; this
//! crate only reads it. Resolution is best-effort over possibly-incomplete
//! programs: "not found" is an empty candidate list, never an error.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! lookup    → LookupContext, ScopeExpander closure, NameResolver,
//!             ExpressionResolver
//!   ↓
//! model     → Symbol graph: Name, types, Symbol, Scope, Document,
//!             Snapshot, expression nodes
//!   ↓
//! base      → Primitives (FileId, Identifier interning / Control)
//! ```

// ============================================================================
// MODULES (dependency order: base → model → lookup)
// ============================================================================

/// Foundation types: FileId, Identifier interning, Control
pub mod base;

/// The symbol graph: documents, scopes, symbols, names, types
pub mod model;

/// The lookup engine: contexts, scope expansion, name and expression
/// resolution
pub mod lookup;

// Re-export foundation types
pub use base::{Control, FileId, Identifier};

// Re-export the common model and lookup surface
pub use lookup::{ExprResult, ExpressionResolver, LookupContext, NameResolver, ResolveMode};
pub use model::{Document, Name, Snapshot};

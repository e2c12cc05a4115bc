//! The symbol graph — read-only input to the lookup engine.
//!
//! One [`Document`] per translation unit owns an index-based arena of
//! [`Scope`]s and [`Symbol`]s; a [`Snapshot`] maps file identities to the
//! documents a lookup may traverse. [`Name`] and the type model carry the
//! spellings and conservative types the resolvers match on.
//!
//! Everything here is immutable for the duration of any lookup; only the
//! upstream parser constructs and mutates documents, and never
//! concurrently with lookups over the same snapshot.

mod document;
mod expr;
mod name;
mod scope;
mod snapshot;
mod symbol;
mod ty;

pub use document::{Document, ModelError};
pub use expr::{AccessOp, BinaryOp, Expr, LiteralKind, UnaryOp};
pub use name::{Name, OperatorKind, QualifiedName};
pub use scope::{Scope, ScopeId, ScopeKind, ScopeRef};
pub use snapshot::Snapshot;
pub use symbol::{BaseClass, Symbol, SymbolId, SymbolKind, SymbolRef};
pub use ty::{BuiltinKind, FullySpecifiedType, Type};

//! The lookup engine — name and expression resolution.
//!
//! ## Key Types
//!
//! - [`LookupContext`] — transient state anchoring one resolution request,
//!   with the memoized visible-scope list
//! - [`NameResolver`] — matches a (possibly qualified) name against an
//!   ordered scope list under a [`ResolveMode`] filter
//! - [`ExpressionResolver`] — computes the (type, symbol) candidates an
//!   expression could evaluate to
//! - [`ClassResolver`] — maps named types to class symbols through
//!   typedef chains
//! - [`Diagnostic`] — the informational notes expansion can emit
//!
//! ## Resolution pipeline
//!
//! ```text
//! LookupContext::visible_scopes()    ← anchor chain + include graph,
//!     │                                closed under scope expansion
//!     ▼
//! NameResolver::resolve(name, ...)   ← filter + collect, identity de-dup
//!     │
//!     ▼
//! ExpressionResolver::resolve(expr)  ← member-access chains, calls,
//!                                      conservative estimates
//! ```

mod context;
mod diagnostics;
mod expand;
mod expression;
mod resolve;

pub use context::LookupContext;
pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity, codes};
pub use expression::{ClassResolver, ExprResult, ExpressionResolver};
pub use resolve::{NameResolver, ResolveMode};

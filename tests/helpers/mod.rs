//! Shared fixtures for lookup-engine integration tests.
//!
//! Documents are built by hand the way the upstream parser would build
//! them, then frozen behind `Arc` and served through a `Snapshot`.

#![allow(dead_code)]

use std::sync::Arc;

use cppmodel::base::Control;
use cppmodel::lookup::LookupContext;
use cppmodel::model::{
    BuiltinKind, Document, FullySpecifiedType, Name, Snapshot, SymbolId, SymbolRef,
};

/// A fresh single-session control.
pub fn session() -> Arc<Control> {
    Arc::new(Control::new())
}

pub fn ident(control: &Control, spelling: &str) -> Name {
    Name::Identifier(control.identifier(spelling))
}

/// `qualified(&control, &["A", "B"])` is the name `A::B`.
pub fn qualified(control: &Control, parts: &[&str]) -> Name {
    Name::qualified(
        parts.iter().map(|part| ident(control, part)).collect(),
        false,
    )
}

pub fn int_ty() -> FullySpecifiedType {
    FullySpecifiedType::builtin(BuiltinKind::Int)
}

pub fn named_ty(control: &Control, spelling: &str) -> FullySpecifiedType {
    FullySpecifiedType::named(ident(control, spelling))
}

pub fn sym_ref(document: &Document, symbol: SymbolId) -> SymbolRef {
    SymbolRef::new(document.file(), symbol)
}

/// A context anchored at `anchor` inside `document`, with `document`
/// doubling as the expression document.
pub fn context_at<'a>(
    snapshot: &'a Snapshot,
    document: &Arc<Document>,
    anchor: SymbolId,
) -> LookupContext<'a> {
    LookupContext::new(
        Some(SymbolRef::new(document.file(), anchor)),
        document.clone(),
        document.clone(),
        snapshot,
    )
}

/// A context with no anchor symbol.
pub fn context_in<'a>(snapshot: &'a Snapshot, document: &Arc<Document>) -> LookupContext<'a> {
    LookupContext::new(None, document.clone(), document.clone(), snapshot)
}

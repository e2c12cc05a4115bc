//! Tests for name lookup: visible-scope construction, unqualified and
//! qualified resolution, and the candidate-collection rules.

mod helpers;

use std::sync::Arc;

use rstest::rstest;

use cppmodel::base::{Control, FileId};
use cppmodel::lookup::ResolveMode;
use cppmodel::model::{Document, FullySpecifiedType, Name, OperatorKind, ScopeRef, Snapshot};

use helpers::{context_at, context_in, ident, int_ty, named_ty, qualified, session, sym_ref};

#[test]
fn test_simple_function_declaration_resolves() {
    // void foo();
    let control = session();
    let mut doc = Document::new(control.file_id("a.cpp"), control.clone());
    let global = doc.global_scope();
    let foo = doc.add_function_declaration(global, ident(&control, "foo"), FullySpecifiedType::void());
    let doc = Arc::new(doc);

    let snapshot = Snapshot::new();
    let ctx = context_at(&snapshot, &doc, foo);

    let candidates = ctx.resolve(
        &ident(&control, "foo"),
        ctx.visible_scopes(),
        ResolveMode::SYMBOL,
    );
    assert_eq!(candidates, vec![sym_ref(&doc, foo)]);
}

#[test]
fn test_declaration_visible_from_its_own_anchor() {
    let control = session();
    let mut doc = Document::new(control.file_id("a.cpp"), control.clone());
    let global = doc.global_scope();
    let ns = doc.add_namespace(global, Some(ident(&control, "N")));
    let ns_scope = doc.members_of(ns).unwrap();
    let decl = doc.add_declaration(ns_scope, ident(&control, "value"), int_ty());
    let doc = Arc::new(doc);

    let snapshot = Snapshot::new();
    let ctx = context_at(&snapshot, &doc, decl);

    let candidates = ctx.resolve(
        &ident(&control, "value"),
        ctx.visible_scopes(),
        ResolveMode::SYMBOL,
    );
    assert!(candidates.contains(&sym_ref(&doc, decl)));
}

#[test]
fn test_inner_candidate_precedes_outer_and_both_are_kept() {
    // int x; void f() { int x; /* anchor */ }
    let control = session();
    let mut doc = Document::new(control.file_id("a.cpp"), control.clone());
    let global = doc.global_scope();
    let outer = doc.add_declaration(global, ident(&control, "x"), int_ty());
    let f = doc.add_function_definition(global, ident(&control, "f"), FullySpecifiedType::void());
    let body = doc.function_body(f).unwrap();
    let inner = doc.add_declaration(body, ident(&control, "x"), int_ty());
    let doc = Arc::new(doc);

    let snapshot = Snapshot::new();
    let ctx = context_at(&snapshot, &doc, inner);

    let candidates = ctx.resolve(
        &ident(&control, "x"),
        ctx.visible_scopes(),
        ResolveMode::SYMBOL,
    );
    // Shadowing is the caller's business: lookup collects every visible
    // candidate, innermost scope first.
    assert_eq!(
        candidates,
        vec![sym_ref(&doc, inner), sym_ref(&doc, outer)]
    );
}

#[test]
fn test_overload_chain_returns_all_in_declaration_order() {
    let control = session();
    let mut doc = Document::new(control.file_id("a.cpp"), control.clone());
    let global = doc.global_scope();
    let foo = ident(&control, "foo");
    let first = doc.add_function_declaration(global, foo.clone(), FullySpecifiedType::void());
    let second = doc.add_function_declaration(global, foo.clone(), int_ty());
    let third = doc.add_function_declaration(global, foo.clone(), FullySpecifiedType::void());
    let doc = Arc::new(doc);

    let snapshot = Snapshot::new();
    let ctx = context_at(&snapshot, &doc, first);

    let candidates = ctx.resolve(&foo, ctx.visible_scopes(), ResolveMode::SYMBOL);
    assert_eq!(
        candidates,
        vec![
            sym_ref(&doc, first),
            sym_ref(&doc, second),
            sym_ref(&doc, third)
        ]
    );
}

#[test]
fn test_qualified_name_traversal() {
    // namespace A { class B { int m; }; }
    let control = session();
    let mut doc = Document::new(control.file_id("a.cpp"), control.clone());
    let global = doc.global_scope();
    let a = doc.add_namespace(global, Some(ident(&control, "A")));
    let a_scope = doc.members_of(a).unwrap();
    let b = doc.add_class(a_scope, Some(ident(&control, "B")), Vec::new());
    let b_scope = doc.members_of(b).unwrap();
    let m = doc.add_declaration(b_scope, ident(&control, "m"), int_ty());
    let doc = Arc::new(doc);

    let snapshot = Snapshot::new();
    let ctx = context_in(&snapshot, &doc);
    let global_scopes = [ScopeRef::new(doc.file(), doc.global_scope())];

    let b_candidates = ctx.resolve(
        &qualified(&control, &["A", "B"]),
        &global_scopes,
        ResolveMode::CLASS,
    );
    assert_eq!(b_candidates, vec![sym_ref(&doc, b)]);

    let m_candidates = ctx.resolve(
        &qualified(&control, &["A", "B", "m"]),
        &global_scopes,
        ResolveMode::SYMBOL,
    );
    assert_eq!(m_candidates, vec![sym_ref(&doc, m)]);
}

#[test]
fn test_failed_qualifier_yields_empty_without_fallback() {
    // A global `m` must NOT be found through `Missing::m`.
    let control = session();
    let mut doc = Document::new(control.file_id("a.cpp"), control.clone());
    let global = doc.global_scope();
    doc.add_declaration(global, ident(&control, "m"), int_ty());
    let doc = Arc::new(doc);

    let snapshot = Snapshot::new();
    let ctx = context_in(&snapshot, &doc);
    let global_scopes = [ScopeRef::new(doc.file(), doc.global_scope())];

    let candidates = ctx.resolve(
        &qualified(&control, &["Missing", "m"]),
        &global_scopes,
        ResolveMode::SYMBOL,
    );
    assert!(candidates.is_empty());
}

#[test]
fn test_qualified_lookup_does_not_see_outer_scopes() {
    // namespace A { class B {}; } int other;
    // `A::other` must fail even though `other` is visible unqualified.
    let control = session();
    let mut doc = Document::new(control.file_id("a.cpp"), control.clone());
    let global = doc.global_scope();
    let a = doc.add_namespace(global, Some(ident(&control, "A")));
    let a_scope = doc.members_of(a).unwrap();
    doc.add_class(a_scope, Some(ident(&control, "B")), Vec::new());
    doc.add_declaration(global, ident(&control, "other"), int_ty());
    let doc = Arc::new(doc);

    let snapshot = Snapshot::new();
    let ctx = context_in(&snapshot, &doc);
    let global_scopes = [ScopeRef::new(doc.file(), doc.global_scope())];

    let candidates = ctx.resolve(
        &qualified(&control, &["A", "other"]),
        &global_scopes,
        ResolveMode::SYMBOL,
    );
    assert!(candidates.is_empty());
}

#[test]
fn test_destructor_and_plain_names_do_not_cross_match() {
    let control = session();
    let mut doc = Document::new(control.file_id("a.cpp"), control.clone());
    let global = doc.global_scope();
    let widget = doc.add_class(global, Some(ident(&control, "Widget")), Vec::new());
    let widget_scope = doc.members_of(widget).unwrap();
    let w = control.identifier("Widget");
    let dtor = doc.add_function_declaration(
        widget_scope,
        Name::Destructor(w),
        FullySpecifiedType::void(),
    );
    let doc = Arc::new(doc);

    let snapshot = Snapshot::new();
    let ctx = context_in(&snapshot, &doc);
    let class_scopes = [ScopeRef::new(
        doc.file(),
        doc.members_of(widget).unwrap(),
    )];

    let dtor_candidates = ctx.resolve(&Name::Destructor(w), &class_scopes, ResolveMode::SYMBOL);
    assert_eq!(dtor_candidates, vec![sym_ref(&doc, dtor)]);

    // The plain name shares the destructor's identifier bucket but must
    // not match it.
    let plain_candidates = ctx.resolve(&Name::Identifier(w), &class_scopes, ResolveMode::SYMBOL);
    assert!(plain_candidates.is_empty());
}

#[test]
fn test_operator_lookup_by_kind() {
    let control = session();
    let mut doc = Document::new(control.file_id("a.cpp"), control.clone());
    let global = doc.global_scope();
    let vec2 = doc.add_class(global, Some(ident(&control, "Vec2")), Vec::new());
    let vec2_scope = doc.members_of(vec2).unwrap();
    let plus = doc.add_function_declaration(
        vec2_scope,
        Name::Operator(OperatorKind::Plus),
        named_ty(&control, "Vec2"),
    );
    let doc = Arc::new(doc);

    let snapshot = Snapshot::new();
    let ctx = context_in(&snapshot, &doc);
    let class_scopes = [ScopeRef::new(
        doc.file(),
        doc.members_of(vec2).unwrap(),
    )];

    let found = ctx.resolve(
        &Name::Operator(OperatorKind::Plus),
        &class_scopes,
        ResolveMode::SYMBOL,
    );
    assert_eq!(found, vec![sym_ref(&doc, plus)]);

    let missing = ctx.resolve(
        &Name::Operator(OperatorKind::Minus),
        &class_scopes,
        ResolveMode::SYMBOL,
    );
    assert!(missing.is_empty());
}

#[rstest]
#[case(ResolveMode::NAMESPACE, 1)]
#[case(ResolveMode::CLASS, 1)]
#[case(ResolveMode::CLASS | ResolveMode::NAMESPACE, 2)]
#[case(ResolveMode::SYMBOL, 3)]
fn test_mode_filters_kinds(#[case] mode: ResolveMode, #[case] expected: usize) {
    // One namespace, one class, and one variable all spelled `X`.
    let control = session();
    let mut doc = Document::new(control.file_id("a.cpp"), control.clone());
    let global = doc.global_scope();
    doc.add_namespace(global, Some(ident(&control, "X")));
    doc.add_class(global, Some(ident(&control, "X")), Vec::new());
    doc.add_declaration(global, ident(&control, "X"), int_ty());
    let doc = Arc::new(doc);

    let snapshot = Snapshot::new();
    let ctx = context_in(&snapshot, &doc);
    let global_scopes = [ScopeRef::new(doc.file(), doc.global_scope())];

    let candidates = ctx.resolve(&ident(&control, "X"), &global_scopes, mode);
    assert_eq!(candidates.len(), expected);
}

#[test]
fn test_include_graph_cycle_terminates_and_reaches_both_globals() {
    // a.cpp includes b.h; b.h includes a.cpp right back.
    let control = session();
    let file_a = control.file_id("a.cpp");
    let file_b = control.file_id("b.h");

    let mut doc_a = Document::new(file_a, control.clone());
    let ga = doc_a.add_declaration(doc_a.global_scope(), ident(&control, "ga"), int_ty());
    doc_a.add_include(file_b);
    let doc_a = Arc::new(doc_a);

    let mut doc_b = Document::new(file_b, control.clone());
    let gb = doc_b.add_declaration(doc_b.global_scope(), ident(&control, "gb"), int_ty());
    doc_b.add_include(file_a);
    let doc_b = Arc::new(doc_b);

    let mut snapshot = Snapshot::new();
    snapshot.insert(doc_a.clone());
    snapshot.insert(doc_b.clone());

    let ctx = context_at(&snapshot, &doc_a, ga);
    let candidates = ctx.resolve(
        &ident(&control, "gb"),
        ctx.visible_scopes(),
        ResolveMode::SYMBOL,
    );
    assert_eq!(candidates, vec![sym_ref(&doc_b, gb)]);
}

#[test]
fn test_namespace_reopened_across_documents_is_merged() {
    // a.cpp: namespace N { int here; }   (includes b.h)
    // b.h:   namespace N { int there; }
    let control = session();
    let file_a = control.file_id("a.cpp");
    let file_b = control.file_id("b.h");

    let mut doc_b = Document::new(file_b, control.clone());
    let n_b = doc_b.add_namespace(doc_b.global_scope(), Some(ident(&control, "N")));
    let there = doc_b.add_declaration(
        doc_b.members_of(n_b).unwrap(),
        ident(&control, "there"),
        int_ty(),
    );
    let doc_b = Arc::new(doc_b);

    let mut doc_a = Document::new(file_a, control.clone());
    doc_a.add_include(file_b);
    let n_a = doc_a.add_namespace(doc_a.global_scope(), Some(ident(&control, "N")));
    let here = doc_a.add_declaration(
        doc_a.members_of(n_a).unwrap(),
        ident(&control, "here"),
        int_ty(),
    );
    let doc_a = Arc::new(doc_a);

    let mut snapshot = Snapshot::new();
    snapshot.insert(doc_a.clone());
    snapshot.insert(doc_b.clone());

    // Anchored inside a.cpp's N, the reopened half from b.h is visible.
    let ctx = context_at(&snapshot, &doc_a, here);
    let candidates = ctx.resolve(
        &ident(&control, "there"),
        ctx.visible_scopes(),
        ResolveMode::SYMBOL,
    );
    assert_eq!(candidates, vec![sym_ref(&doc_b, there)]);
}

#[test]
fn test_member_function_body_sees_siblings_through_qualified_name() {
    // class C { int m; void f(); };  void C::f() { int local; }
    let control = session();
    let mut doc = Document::new(control.file_id("a.cpp"), control.clone());
    let global = doc.global_scope();
    let c = doc.add_class(global, Some(ident(&control, "C")), Vec::new());
    let c_scope = doc.members_of(c).unwrap();
    let m = doc.add_declaration(c_scope, ident(&control, "m"), int_ty());
    doc.add_function_declaration(c_scope, ident(&control, "f"), FullySpecifiedType::void());

    let out_of_line = doc.add_function_definition(
        global,
        qualified(&control, &["C", "f"]),
        FullySpecifiedType::void(),
    );
    let body = doc.function_body(out_of_line).unwrap();
    let local = doc.add_declaration(body, ident(&control, "local"), int_ty());
    let doc = Arc::new(doc);

    let snapshot = Snapshot::new();
    let ctx = context_at(&snapshot, &doc, local);

    let candidates = ctx.resolve(
        &ident(&control, "m"),
        ctx.visible_scopes(),
        ResolveMode::SYMBOL,
    );
    assert_eq!(candidates, vec![sym_ref(&doc, m)]);
}

#[test]
fn test_function_arguments_visible_in_body() {
    let control = session();
    let mut doc = Document::new(control.file_id("a.cpp"), control.clone());
    let global = doc.global_scope();
    let f = doc.add_function_definition(global, ident(&control, "f"), FullySpecifiedType::void());
    let arg = doc
        .add_argument(f, Some(ident(&control, "count")), int_ty())
        .unwrap();
    let body = doc.function_body(f).unwrap();
    let local = doc.add_declaration(body, ident(&control, "local"), int_ty());
    let doc = Arc::new(doc);

    let snapshot = Snapshot::new();
    let ctx = context_at(&snapshot, &doc, local);

    let candidates = ctx.resolve(
        &ident(&control, "count"),
        ctx.visible_scopes(),
        ResolveMode::SYMBOL,
    );
    assert_eq!(candidates, vec![sym_ref(&doc, arg)]);
}

#[test]
fn test_out_of_line_definitions_are_not_unqualified_targets() {
    // void C::f() {} at global scope must not answer to plain `f`.
    let control = session();
    let mut doc = Document::new(control.file_id("a.cpp"), control.clone());
    let global = doc.global_scope();
    doc.add_function_definition(
        global,
        qualified(&control, &["C", "f"]),
        FullySpecifiedType::void(),
    );
    let doc = Arc::new(doc);

    let snapshot = Snapshot::new();
    let ctx = context_in(&snapshot, &doc);
    let global_scopes = [ScopeRef::new(doc.file(), doc.global_scope())];

    let candidates = ctx.resolve(&ident(&control, "f"), &global_scopes, ResolveMode::SYMBOL);
    assert!(candidates.is_empty());
}

#[test]
fn test_rebase_moves_the_anchor_to_another_document() {
    let control = session();
    let file_a = control.file_id("a.cpp");
    let file_b = control.file_id("b.h");

    let mut doc_b = Document::new(file_b, control.clone());
    let c = doc_b.add_class(doc_b.global_scope(), Some(ident(&control, "C")), Vec::new());
    let sibling = doc_b.add_declaration(doc_b.global_scope(), ident(&control, "sibling"), int_ty());
    let doc_b = Arc::new(doc_b);

    let mut doc_a = Document::new(file_a, control.clone());
    doc_a.add_include(file_b);
    let anchor = doc_a.add_declaration(doc_a.global_scope(), ident(&control, "a"), int_ty());
    let doc_a = Arc::new(doc_a);

    let mut snapshot = Snapshot::new();
    snapshot.insert(doc_a.clone());
    snapshot.insert(doc_b.clone());

    let ctx = context_at(&snapshot, &doc_a, anchor);
    let found = ctx.resolve(
        &ident(&control, "C"),
        ctx.visible_scopes(),
        ResolveMode::CLASS,
    );
    assert_eq!(found, vec![sym_ref(&doc_b, c)]);

    let rebased = ctx.rebase(found[0]).unwrap();
    assert_eq!(rebased.this_document().file(), file_b);
    let candidates = rebased.resolve(
        &ident(&control, "sibling"),
        rebased.visible_scopes(),
        ResolveMode::SYMBOL,
    );
    assert_eq!(candidates, vec![sym_ref(&doc_b, sibling)]);
}

#[test]
fn test_foreign_control_falls_back_to_spelling_comparison() {
    // b.h was parsed in a different session; handle equality would lie,
    // so matching goes through the spellings.
    let control = session();
    let other_session: Arc<Control> = session();

    let file_a = control.file_id("a.cpp");
    let file_b = FileId::new(7);

    let mut doc_b = Document::new(file_b, other_session.clone());
    let shared = doc_b.add_declaration(
        doc_b.global_scope(),
        ident(&other_session, "shared"),
        int_ty(),
    );
    let doc_b = Arc::new(doc_b);

    let mut doc_a = Document::new(file_a, control.clone());
    doc_a.add_include(file_b);
    let anchor = doc_a.add_declaration(doc_a.global_scope(), ident(&control, "a"), int_ty());
    let doc_a = Arc::new(doc_a);

    let mut snapshot = Snapshot::new();
    snapshot.insert(doc_a.clone());
    snapshot.insert(doc_b.clone());

    let ctx = context_at(&snapshot, &doc_a, anchor);
    let candidates = ctx.resolve(
        &ident(&control, "shared"),
        ctx.visible_scopes(),
        ResolveMode::SYMBOL,
    );
    assert_eq!(candidates, vec![sym_ref(&doc_b, shared)]);
}

#[test]
fn test_missing_document_contributes_nothing() {
    // An include of a file the snapshot has no document for is skipped.
    let control = session();
    let file_a = control.file_id("a.cpp");
    let file_missing = control.file_id("missing.h");

    let mut doc_a = Document::new(file_a, control.clone());
    doc_a.add_include(file_missing);
    let anchor = doc_a.add_declaration(doc_a.global_scope(), ident(&control, "a"), int_ty());
    let doc_a = Arc::new(doc_a);

    let snapshot = Snapshot::new();
    let ctx = context_at(&snapshot, &doc_a, anchor);

    let candidates = ctx.resolve(
        &ident(&control, "a"),
        ctx.visible_scopes(),
        ResolveMode::SYMBOL,
    );
    assert_eq!(candidates, vec![sym_ref(&doc_a, anchor)]);
}

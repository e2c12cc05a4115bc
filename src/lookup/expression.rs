//! ExpressionResolver — the set of (type, symbol) pairs an expression
//! could evaluate to.
//!
//! The resolver walks an expression subtree, identifying each node
//! structurally and short-circuiting recursion the moment a node's kind
//! determines its contribution. Member-access chains are the interesting
//! path: the base resolves first, then each named-class base type has the
//! member looked up across its expanded member scopes, so inherited
//! members are found through the same base-class expansion the scope
//! expander performs everywhere else.
//!
//! Ambiguity is represented, not collapsed: overloaded members and
//! multiple base-type candidates simply produce multiple results.

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;

use crate::lookup::context::LookupContext;
use crate::lookup::expand::{ScopeExpander, ScopeSet};
use crate::lookup::resolve::ResolveMode;
use crate::model::{
    AccessOp, BuiltinKind, Expr, FullySpecifiedType, LiteralKind, Name, OperatorKind, ScopeKind,
    ScopeRef, SymbolKind, SymbolRef, UnaryOp,
};

/// One candidate outcome of evaluating an expression: a type, and the
/// symbol it was declared by when one is known (literals, casts and the
/// like have none).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExprResult {
    pub ty: FullySpecifiedType,
    pub symbol: Option<SymbolRef>,
}

impl ExprResult {
    pub fn new(ty: FullySpecifiedType, symbol: Option<SymbolRef>) -> Self {
        Self { ty, symbol }
    }

    pub fn from_type(ty: FullySpecifiedType) -> Self {
        Self { ty, symbol: None }
    }
}

/// Resolves expression subtrees against a [`LookupContext`].
pub struct ExpressionResolver<'c, 'a> {
    ctx: &'c LookupContext<'a>,
}

impl<'c, 'a> ExpressionResolver<'c, 'a> {
    pub fn new(ctx: &'c LookupContext<'a>) -> Self {
        Self { ctx }
    }

    /// Compute the candidate (type, symbol) pairs for `expr`.
    ///
    /// An unresolvable expression is the empty vector; nothing here is an
    /// error.
    pub fn resolve(&self, expr: &Expr) -> Vec<ExprResult> {
        match expr {
            Expr::Name(name) => self.resolve_name(name),
            Expr::Literal(kind) => vec![ExprResult::from_type(literal_type(*kind))],
            Expr::This => self.resolve_this(),
            Expr::Nested(inner) => self.resolve(inner),
            Expr::Unary { op, operand } => self.resolve_unary(*op, operand),
            // Left-operand propagation; deliberately not overload-aware.
            Expr::Binary { lhs, .. } => self.resolve(lhs),
            Expr::Conditional {
                then_branch,
                else_branch,
                ..
            } => {
                // Either branch could be selected at runtime.
                let mut results = self.resolve(then_branch);
                for result in self.resolve(else_branch) {
                    if !results.contains(&result) {
                        results.push(result);
                    }
                }
                results
            }
            Expr::Cast { target, .. } => vec![ExprResult::from_type(target.clone())],
            Expr::Call { callee, .. } => {
                let mut results = Vec::new();
                for base in self.resolve(callee) {
                    if let Some(return_type) = base.ty.return_type() {
                        push_unique(
                            &mut results,
                            ExprResult::new(return_type.clone(), base.symbol),
                        );
                    }
                }
                results
            }
            Expr::Member { base, op, member } => self.resolve_member_access(base, *op, member),
            Expr::Index { base, .. } => self.resolve_index(base),
            Expr::PostIncDec { operand } => self.resolve(operand),
            Expr::Sizeof { .. } => vec![ExprResult::from_type(FullySpecifiedType::builtin(
                BuiltinKind::UnsignedInt,
            ))],
            Expr::Typeid { .. } => {
                let type_info = self.ctx.control().identifier("type_info");
                vec![ExprResult::from_type(FullySpecifiedType::named(
                    Name::Identifier(type_info),
                ))]
            }
            Expr::New { ty } => vec![ExprResult::from_type(FullySpecifiedType::pointer_to(
                ty.clone(),
            ))],
            Expr::Delete { .. } | Expr::Throw { .. } => {
                vec![ExprResult::from_type(FullySpecifiedType::void())]
            }
        }
    }

    /// Resolve a member access chain link: `base.member`, `base->member`.
    pub fn resolve_member_access(
        &self,
        base: &Expr,
        op: AccessOp,
        member: &Name,
    ) -> Vec<ExprResult> {
        let base_results = self.resolve(base);
        let mut results = Vec::new();

        for base_result in &base_results {
            match op {
                AccessOp::Dot => {
                    let ty = base_result.ty.clone();
                    self.add_members(&ty, base_result, member, &mut results);
                }
                AccessOp::Arrow => {
                    if let Some(pointee) = base_result.ty.pointee() {
                        let pointee = pointee.clone();
                        self.add_members(&pointee, base_result, member, &mut results);
                    } else if base_result.ty.as_named().is_some() {
                        // Not a pointer, but a class type may still be
                        // arrow-accessible through an `operator->` whose
                        // return type is pointer-like. One step only.
                        self.chase_arrow_operator(base_result, member, &mut results);
                    }
                }
            }
        }

        results
    }

    fn resolve_index(&self, base: &Expr) -> Vec<ExprResult> {
        let mut results = Vec::new();
        for base_result in self.resolve(base) {
            if let Some(element) = base_result.ty.element_type() {
                push_unique(
                    &mut results,
                    ExprResult::new(element.clone(), base_result.symbol),
                );
            } else if base_result.ty.as_named().is_some() {
                // operator[] on a class type: the result is whatever the
                // overloads return.
                for candidate in
                    self.member_candidates(&base_result, &Name::Operator(OperatorKind::Subscript))
                {
                    let Some(symbol) = self.ctx.symbol(candidate) else {
                        continue;
                    };
                    if let Some(return_type) = symbol.ty().return_type() {
                        push_unique(
                            &mut results,
                            ExprResult::new(return_type.clone(), Some(candidate)),
                        );
                    }
                }
            }
        }
        results
    }

    fn resolve_name(&self, name: &Name) -> Vec<ExprResult> {
        // Qualified primary expressions go straight to qualified lookup;
        // the resolver handles both shapes from the same entry point.
        let scopes = self.ctx.visible_scopes();
        self.ctx
            .resolve(name, scopes, ResolveMode::SYMBOL)
            .into_iter()
            .filter_map(|candidate| {
                let symbol = self.ctx.symbol(candidate)?;
                Some(ExprResult::new(symbol.ty().clone(), Some(candidate)))
            })
            .collect()
    }

    /// `this` names the innermost class enclosing the anchor position.
    fn resolve_this(&self) -> Vec<ExprResult> {
        let Some(anchor) = self.ctx.anchor() else {
            return Vec::new();
        };
        let Some(doc) = self.ctx.document(anchor.file) else {
            return Vec::new();
        };
        let Some(symbol) = doc.symbol(anchor.symbol) else {
            return Vec::new();
        };

        let mut cursor = symbol.scope();
        while let Some(scope_id) = cursor {
            let Some(scope) = doc.scope(scope_id) else {
                break;
            };
            if scope.kind() == ScopeKind::Class {
                let Some(class_id) = scope.owner() else {
                    break;
                };
                let Some(class) = doc.symbol(class_id) else {
                    break;
                };
                let class_ty = match class.name() {
                    Some(name) => FullySpecifiedType::named(name.clone()),
                    None => FullySpecifiedType::unknown(),
                };
                return vec![ExprResult::new(
                    FullySpecifiedType::pointer_to(class_ty),
                    Some(SymbolRef::new(anchor.file, class_id)),
                )];
            }
            cursor = scope.enclosing_scope();
        }
        Vec::new()
    }

    fn resolve_unary(&self, op: UnaryOp, operand: &Expr) -> Vec<ExprResult> {
        let operand_results = self.resolve(operand);
        match op {
            UnaryOp::Deref => operand_results
                .into_iter()
                .filter_map(|r| {
                    let element = r.ty.element_type()?.clone();
                    Some(ExprResult::new(element, r.symbol))
                })
                .collect(),
            UnaryOp::AddressOf => operand_results
                .into_iter()
                .map(|r| ExprResult::new(FullySpecifiedType::pointer_to(r.ty), r.symbol))
                .collect(),
            _ => operand_results,
        }
    }

    /// Add one result per `member` candidate per class candidate of a
    /// named type.
    fn add_members(
        &self,
        ty: &FullySpecifiedType,
        origin: &ExprResult,
        member: &Name,
        results: &mut Vec<ExprResult>,
    ) {
        if ty.as_named().is_none() {
            return;
        }
        let typed_origin = ExprResult::new(ty.clone(), origin.symbol);
        for candidate in self.member_candidates(&typed_origin, member) {
            let Some(symbol) = self.ctx.symbol(candidate) else {
                continue;
            };
            push_unique(
                results,
                ExprResult::new(symbol.ty().clone(), Some(candidate)),
            );
        }
    }

    /// All symbols named `member` in the expanded member scopes of every
    /// class candidate for `origin`'s (named) type — the base-class
    /// expansion is what brings inherited members into reach.
    fn member_candidates(&self, origin: &ExprResult, member: &Name) -> Vec<SymbolRef> {
        let Some(named) = origin.ty.as_named() else {
            return Vec::new();
        };
        let named = named.clone();

        let mut candidates: IndexSet<SymbolRef, FxBuildHasher> = IndexSet::default();
        let classes = ClassResolver::new(self.ctx).resolve(&named, origin);
        if classes.is_empty() {
            return Vec::new();
        }

        let visible = self.ctx.visible_scopes_for(origin);
        let expander = ScopeExpander::new(self.ctx);
        for class in classes {
            let Some(members) = self.ctx.member_scope(class) else {
                continue;
            };
            let mut expanded = ScopeSet::default();
            expander.expand_into(members, &visible, &mut expanded);
            let scopes: Vec<ScopeRef> = expanded.into_iter().collect();

            for candidate in self.ctx.resolve(member, &scopes, ResolveMode::SYMBOL) {
                candidates.insert(candidate);
            }
        }
        candidates.into_iter().collect()
    }

    fn chase_arrow_operator(
        &self,
        origin: &ExprResult,
        member: &Name,
        results: &mut Vec<ExprResult>,
    ) {
        for candidate in self.member_candidates(origin, &Name::Operator(OperatorKind::Arrow)) {
            let Some(symbol) = self.ctx.symbol(candidate) else {
                continue;
            };
            let Some(return_type) = symbol.ty().return_type() else {
                continue;
            };
            let Some(pointee) = return_type.pointee() else {
                continue;
            };
            let step = ExprResult::new(return_type.clone(), Some(candidate));
            self.add_members(&pointee.clone(), &step, member, results);
        }
    }
}

/// Maps a named type to its candidate class symbols, following
/// typedef-style declarations.
///
/// The blacklist guards against declaration cycles (`typedef A B;
/// typedef B A;`): a (type, symbol) pair already being resolved
/// contributes nothing when reached again.
pub struct ClassResolver<'c, 'a> {
    ctx: &'c LookupContext<'a>,
    blacklist: Vec<(FullySpecifiedType, Option<SymbolRef>)>,
}

impl<'c, 'a> ClassResolver<'c, 'a> {
    pub fn new(ctx: &'c LookupContext<'a>) -> Self {
        Self {
            ctx,
            blacklist: Vec::new(),
        }
    }

    /// The class symbols `name` can denote, seen from `origin`'s
    /// declaration position.
    pub fn resolve(&mut self, name: &Name, origin: &ExprResult) -> Vec<SymbolRef> {
        let key = (origin.ty.clone(), origin.symbol);
        if self.blacklist.contains(&key) {
            return Vec::new();
        }
        self.blacklist.push(key);

        let scopes = self.ctx.visible_scopes_for(origin);
        let mut classes: IndexSet<SymbolRef, FxBuildHasher> = IndexSet::default();

        for candidate in self.ctx.resolve(name, &scopes, ResolveMode::SYMBOL) {
            let Some(symbol) = self.ctx.symbol(candidate) else {
                continue;
            };
            if symbol.is_class() {
                classes.insert(candidate);
            } else if matches!(symbol.kind(), SymbolKind::Declaration) {
                // A typedef-style declaration: chase the declared type.
                let ty = symbol.ty().clone();
                let Some(inner) = ty.as_named().cloned() else {
                    continue;
                };
                let next = ExprResult::new(ty, Some(candidate));
                for class in self.resolve(&inner, &next) {
                    classes.insert(class);
                }
            }
        }

        classes.into_iter().collect()
    }
}

fn literal_type(kind: LiteralKind) -> FullySpecifiedType {
    match kind {
        LiteralKind::Integer => FullySpecifiedType::builtin(BuiltinKind::Int),
        LiteralKind::FloatingPoint => FullySpecifiedType::builtin(BuiltinKind::Double),
        LiteralKind::Boolean => FullySpecifiedType::builtin(BuiltinKind::Bool),
        LiteralKind::Character => FullySpecifiedType::builtin(BuiltinKind::Char),
        LiteralKind::String => FullySpecifiedType::pointer_to(
            FullySpecifiedType::builtin(BuiltinKind::Char).with_const(),
        ),
    }
}

fn push_unique(results: &mut Vec<ExprResult>, result: ExprResult) {
    if !results.contains(&result) {
        results.push(result);
    }
}

//! Expression syntax nodes consumed by the expression resolver.
//!
//! This is the slice of the expression grammar the engine inspects. The
//! upstream parser hands over a subtree in this shape; nodes the resolver
//! treats conservatively still carry their operands so callers can build
//! faithful trees.

use crate::model::name::Name;
use crate::model::ty::FullySpecifiedType;

/// Member-access operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AccessOp {
    /// `base.member`
    Dot,
    /// `base->member`
    Arrow,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `*expr`
    Deref,
    /// `&expr`
    AddressOf,
    Plus,
    Minus,
    Not,
    Complement,
    PreIncrement,
    PreDecrement,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
    BitAnd,
    BitXor,
    BitOr,
    LogicalAnd,
    LogicalOr,
    Assign,
    Comma,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Integer,
    FloatingPoint,
    Boolean,
    Character,
    String,
}

/// An expression syntax node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// A (possibly qualified) name used as a primary expression.
    Name(Name),
    Literal(LiteralKind),
    This,
    /// A parenthesized expression.
    Nested(Box<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Cast {
        target: FullySpecifiedType,
        operand: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Member {
        base: Box<Expr>,
        op: AccessOp,
        member: Name,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    PostIncDec {
        operand: Box<Expr>,
    },
    /// `sizeof expr` or `sizeof(type)`.
    Sizeof {
        operand: Option<Box<Expr>>,
    },
    /// `typeid(expr)` or `typeid(type)`.
    Typeid {
        operand: Option<Box<Expr>>,
    },
    New {
        ty: FullySpecifiedType,
    },
    Delete {
        operand: Box<Expr>,
    },
    Throw {
        operand: Option<Box<Expr>>,
    },
}

impl Expr {
    pub fn name(name: Name) -> Expr {
        Expr::Name(name)
    }

    pub fn nested(inner: Expr) -> Expr {
        Expr::Nested(Box::new(inner))
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn conditional(condition: Expr, then_branch: Expr, else_branch: Expr) -> Expr {
        Expr::Conditional {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    pub fn cast(target: FullySpecifiedType, operand: Expr) -> Expr {
        Expr::Cast {
            target,
            operand: Box::new(operand),
        }
    }

    pub fn call(callee: Expr, arguments: Vec<Expr>) -> Expr {
        Expr::Call {
            callee: Box::new(callee),
            arguments,
        }
    }

    pub fn member(base: Expr, op: AccessOp, member: Name) -> Expr {
        Expr::Member {
            base: Box::new(base),
            op,
            member,
        }
    }

    pub fn index(base: Expr, index: Expr) -> Expr {
        Expr::Index {
            base: Box::new(base),
            index: Box::new(index),
        }
    }
}

//! Names — the spellings used to declare and reference symbols.
//!
//! A [`Name`] is a closed tagged union; lookup code matches on it
//! exhaustively rather than probing with downcasts, so an unhandled name
//! kind is a compile error instead of a silent miss.

use crate::base::{Control, Identifier};
use crate::model::ty::FullySpecifiedType;

/// The kind of an overloadable operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    New,
    Delete,
    NewArray,
    DeleteArray,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Amp,
    Pipe,
    Tilde,
    Exclaim,
    Assign,
    Less,
    Greater,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    CaretAssign,
    AmpAssign,
    PipeAssign,
    LessLess,
    GreaterGreater,
    LessLessAssign,
    GreaterGreaterAssign,
    EqualEqual,
    ExclaimEqual,
    LessEqual,
    GreaterEqual,
    AmpAmp,
    PipePipe,
    PlusPlus,
    MinusMinus,
    Comma,
    ArrowStar,
    Arrow,
    Call,
    Subscript,
}

impl OperatorKind {
    /// The operator's source spelling, as written after the `operator`
    /// keyword.
    pub fn token(self) -> &'static str {
        match self {
            OperatorKind::New => " new",
            OperatorKind::Delete => " delete",
            OperatorKind::NewArray => " new[]",
            OperatorKind::DeleteArray => " delete[]",
            OperatorKind::Plus => "+",
            OperatorKind::Minus => "-",
            OperatorKind::Star => "*",
            OperatorKind::Slash => "/",
            OperatorKind::Percent => "%",
            OperatorKind::Caret => "^",
            OperatorKind::Amp => "&",
            OperatorKind::Pipe => "|",
            OperatorKind::Tilde => "~",
            OperatorKind::Exclaim => "!",
            OperatorKind::Assign => "=",
            OperatorKind::Less => "<",
            OperatorKind::Greater => ">",
            OperatorKind::PlusAssign => "+=",
            OperatorKind::MinusAssign => "-=",
            OperatorKind::StarAssign => "*=",
            OperatorKind::SlashAssign => "/=",
            OperatorKind::PercentAssign => "%=",
            OperatorKind::CaretAssign => "^=",
            OperatorKind::AmpAssign => "&=",
            OperatorKind::PipeAssign => "|=",
            OperatorKind::LessLess => "<<",
            OperatorKind::GreaterGreater => ">>",
            OperatorKind::LessLessAssign => "<<=",
            OperatorKind::GreaterGreaterAssign => ">>=",
            OperatorKind::EqualEqual => "==",
            OperatorKind::ExclaimEqual => "!=",
            OperatorKind::LessEqual => "<=",
            OperatorKind::GreaterEqual => ">=",
            OperatorKind::AmpAmp => "&&",
            OperatorKind::PipePipe => "||",
            OperatorKind::PlusPlus => "++",
            OperatorKind::MinusMinus => "--",
            OperatorKind::Comma => ",",
            OperatorKind::ArrowStar => "->*",
            OperatorKind::Arrow => "->",
            OperatorKind::Call => "()",
            OperatorKind::Subscript => "[]",
        }
    }
}

/// A `::`-separated name.
///
/// Components are the individual (never themselves qualified) names between
/// the separators; `is_global` records a leading `::`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub components: Vec<Name>,
    pub is_global: bool,
}

impl QualifiedName {
    /// The final component, i.e. the name actually being declared or
    /// referenced.
    pub fn unqualified(&self) -> Option<&Name> {
        self.components.last()
    }

    /// The qualifier part: everything except the final component.
    ///
    /// A single-component global name (`::f`) keeps its one component as
    /// the qualifier, matching how qualified function definitions are
    /// expanded.
    pub fn qualifier(&self) -> Option<Name> {
        if self.components.len() == 1 && self.is_global {
            return Some(self.components[0].clone());
        }
        if self.components.len() < 2 {
            return None;
        }
        Some(Name::Qualified(QualifiedName {
            components: self.components[..self.components.len() - 1].to_vec(),
            is_global: self.is_global,
        }))
    }
}

/// The spelling used to reference a symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Name {
    /// A plain identifier, e.g. `foo`.
    Identifier(Identifier),
    /// A destructor name, e.g. `~Widget`.
    Destructor(Identifier),
    /// A template-id, e.g. `vector<int>`.
    Template {
        identifier: Identifier,
        arguments: Vec<FullySpecifiedType>,
    },
    /// A qualified name, e.g. `A::B::C` or `::A`.
    Qualified(QualifiedName),
    /// An operator-function-id, e.g. `operator+`.
    Operator(OperatorKind),
}

impl Name {
    /// Build a qualified name from components.
    pub fn qualified(components: Vec<Name>, is_global: bool) -> Name {
        Name::Qualified(QualifiedName {
            components,
            is_global,
        })
    }

    /// The identifier this name hashes and matches under.
    ///
    /// Qualified names answer with their final component's identifier;
    /// operator names have none.
    pub fn identifier(&self) -> Option<Identifier> {
        match self {
            Name::Identifier(id) | Name::Destructor(id) => Some(*id),
            Name::Template { identifier, .. } => Some(*identifier),
            Name::Qualified(q) => q.unqualified().and_then(Name::identifier),
            Name::Operator(_) => None,
        }
    }

    /// The operator kind, for operator-function-ids.
    pub fn operator_kind(&self) -> Option<OperatorKind> {
        match self {
            Name::Operator(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_qualified(&self) -> bool {
        matches!(self, Name::Qualified(_))
    }

    pub fn is_destructor(&self) -> bool {
        matches!(self, Name::Destructor(_))
    }

    /// Whether this name can match the given identifier: simple,
    /// destructor, and template names match on their identifier; operator
    /// and qualified names never do.
    pub fn matches_identifier(&self, id: Identifier) -> bool {
        match self {
            Name::Identifier(own) | Name::Destructor(own) => *own == id,
            Name::Template { identifier, .. } => *identifier == id,
            Name::Qualified(_) | Name::Operator(_) => false,
        }
    }

    /// Render the name for diagnostics, resolving identifier handles
    /// through `control`.
    pub fn display(&self, control: &Control) -> String {
        match self {
            Name::Identifier(id) => control
                .identifier_text(*id)
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("<id:{}>", id.index())),
            Name::Destructor(id) => {
                format!("~{}", Name::Identifier(*id).display(control))
            }
            Name::Template {
                identifier,
                arguments,
            } => {
                let args = arguments
                    .iter()
                    .map(|a| a.display(control))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "{}<{}>",
                    Name::Identifier(*identifier).display(control),
                    args
                )
            }
            Name::Qualified(q) => {
                let mut out = String::new();
                if q.is_global {
                    out.push_str("::");
                }
                let parts = q
                    .components
                    .iter()
                    .map(|c| c.display(control))
                    .collect::<Vec<_>>();
                out.push_str(&parts.join("::"));
                out
            }
            Name::Operator(kind) => format!("operator{}", kind.token()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Control;

    #[test]
    fn test_identifier_of_qualified_name() {
        let control = Control::new();
        let a = control.identifier("A");
        let b = control.identifier("B");

        let name = Name::qualified(vec![Name::Identifier(a), Name::Identifier(b)], false);
        assert_eq!(name.identifier(), Some(b));
    }

    #[test]
    fn test_destructor_matching() {
        let control = Control::new();
        let id = control.identifier("Widget");

        let dtor = Name::Destructor(id);
        assert!(dtor.is_destructor());
        assert!(dtor.matches_identifier(id));
        assert!(!Name::Operator(OperatorKind::Plus).matches_identifier(id));
    }

    #[test]
    fn test_display() {
        let control = Control::new();
        let a = control.identifier("A");
        let b = control.identifier("B");

        let name = Name::qualified(vec![Name::Identifier(a), Name::Destructor(b)], true);
        assert_eq!(name.display(&control), "::A::~B");
        assert_eq!(
            Name::Operator(OperatorKind::Subscript).display(&control),
            "operator[]"
        );
    }

    #[test]
    fn test_qualifier_of_single_global() {
        let control = Control::new();
        let f = control.identifier("f");

        let q = QualifiedName {
            components: vec![Name::Identifier(f)],
            is_global: true,
        };
        assert_eq!(q.qualifier(), Some(Name::Identifier(f)));

        let plain = QualifiedName {
            components: vec![Name::Identifier(f)],
            is_global: false,
        };
        assert_eq!(plain.qualifier(), None);
    }
}

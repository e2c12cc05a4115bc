//! Types — the conservative type model used by expression resolution.
//!
//! This is not a full C++ type system: it carries exactly enough structure
//! to chase member-access chains (`.`, `->`, `[]`), calls, and the
//! conservative estimates for the remaining expression forms.

use crate::base::Control;
use crate::model::name::Name;

/// Builtin (fundamental) types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    Void,
    Bool,
    Char,
    Short,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    Float,
    Double,
}

impl BuiltinKind {
    pub fn spelling(self) -> &'static str {
        match self {
            BuiltinKind::Void => "void",
            BuiltinKind::Bool => "bool",
            BuiltinKind::Char => "char",
            BuiltinKind::Short => "short",
            BuiltinKind::Int => "int",
            BuiltinKind::UnsignedInt => "unsigned int",
            BuiltinKind::Long => "long",
            BuiltinKind::UnsignedLong => "unsigned long",
            BuiltinKind::Float => "float",
            BuiltinKind::Double => "double",
        }
    }
}

/// The shape of a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// Not deduced; produced for expressions whose type the engine does
    /// not model.
    Unknown,
    Builtin(BuiltinKind),
    /// A reference to a named (class/enum/typedef) type.
    Named(Name),
    Pointer(Box<FullySpecifiedType>),
    Reference(Box<FullySpecifiedType>),
    Array(Box<FullySpecifiedType>),
    /// A function type; argument types live on the function symbol's
    /// argument scope, only the return type matters for call resolution.
    Function { return_type: Box<FullySpecifiedType> },
}

/// A type together with its cv-qualification.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FullySpecifiedType {
    pub is_const: bool,
    pub is_volatile: bool,
    pub ty: Type,
}

impl FullySpecifiedType {
    pub fn new(ty: Type) -> Self {
        Self {
            is_const: false,
            is_volatile: false,
            ty,
        }
    }

    pub fn unknown() -> Self {
        Self::new(Type::Unknown)
    }

    pub fn void() -> Self {
        Self::new(Type::Builtin(BuiltinKind::Void))
    }

    pub fn builtin(kind: BuiltinKind) -> Self {
        Self::new(Type::Builtin(kind))
    }

    pub fn named(name: Name) -> Self {
        Self::new(Type::Named(name))
    }

    pub fn pointer_to(element: FullySpecifiedType) -> Self {
        Self::new(Type::Pointer(Box::new(element)))
    }

    pub fn reference_to(element: FullySpecifiedType) -> Self {
        Self::new(Type::Reference(Box::new(element)))
    }

    pub fn array_of(element: FullySpecifiedType) -> Self {
        Self::new(Type::Array(Box::new(element)))
    }

    pub fn function_returning(return_type: FullySpecifiedType) -> Self {
        Self::new(Type::Function {
            return_type: Box::new(return_type),
        })
    }

    pub fn with_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn with_volatile(mut self) -> Self {
        self.is_volatile = true;
        self
    }

    /// The name, if this is a named type. References are looked through,
    /// so member access on a `T&` behaves like member access on `T`.
    pub fn as_named(&self) -> Option<&Name> {
        match &self.ty {
            Type::Named(name) => Some(name),
            Type::Reference(inner) => inner.as_named(),
            _ => None,
        }
    }

    /// The element type of a pointer or array.
    pub fn element_type(&self) -> Option<&FullySpecifiedType> {
        match &self.ty {
            Type::Pointer(inner) | Type::Array(inner) => Some(inner),
            Type::Reference(inner) => inner.element_type(),
            _ => None,
        }
    }

    /// The pointee, for pointer types only. Arrow access requires this.
    pub fn pointee(&self) -> Option<&FullySpecifiedType> {
        match &self.ty {
            Type::Pointer(inner) => Some(inner),
            Type::Reference(inner) => inner.pointee(),
            _ => None,
        }
    }

    /// The return type, if this is a function type.
    pub fn return_type(&self) -> Option<&FullySpecifiedType> {
        match &self.ty {
            Type::Function { return_type } => Some(return_type),
            Type::Reference(inner) => inner.return_type(),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.ty, Type::Unknown)
    }

    /// Render the type for diagnostics.
    pub fn display(&self, control: &Control) -> String {
        let mut out = String::new();
        if self.is_const {
            out.push_str("const ");
        }
        if self.is_volatile {
            out.push_str("volatile ");
        }
        match &self.ty {
            Type::Unknown => out.push_str("<unknown>"),
            Type::Builtin(kind) => out.push_str(kind.spelling()),
            Type::Named(name) => out.push_str(&name.display(control)),
            Type::Pointer(inner) => {
                out.push_str(&inner.display(control));
                out.push('*');
            }
            Type::Reference(inner) => {
                out.push_str(&inner.display(control));
                out.push('&');
            }
            Type::Array(inner) => {
                out.push_str(&inner.display(control));
                out.push_str("[]");
            }
            Type::Function { return_type } => {
                out.push_str(&return_type.display(control));
                out.push_str(" ()");
            }
        }
        out
    }
}

//! Types and symbolic member references

use super::ids::ClassId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference type of an allocated object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// Instance of a class
    Class(ClassId),

    /// Array with the given element type
    Array(Box<Type>),
}

impl Type {
    /// Class of a class type, `None` for arrays
    #[inline]
    pub fn class(&self) -> Option<ClassId> {
        match self {
            Type::Class(c) => Some(*c),
            Type::Array(_) => None,
        }
    }

    /// Innermost non-array type
    pub fn base_class(&self) -> ClassId {
        let mut ty = self;
        loop {
            match ty {
                Type::Class(c) => return *c,
                Type::Array(elem) => ty = elem,
            }
        }
    }

    #[inline]
    pub fn array_of(elem: Type) -> Type {
        Type::Array(Box::new(elem))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Class(c) => write!(f, "{}", c),
            Type::Array(elem) => write!(f, "{}[]", elem),
        }
    }
}

/// Method name plus descriptor, e.g. `void m(A,int)`
///
/// Dispatch matches on subsignatures, never on declaring classes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Subsignature(String);

impl Subsignature {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bare method name: the token right before `(`
    pub fn method_name(&self) -> &str {
        let head = self.0.split('(').next().unwrap_or("");
        head.split_whitespace().last().unwrap_or(head)
    }
}

impl fmt::Display for Subsignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Subsignature {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Symbolic method reference as written at a call site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    /// Statically declared class
    pub class: ClassId,
    pub subsignature: Subsignature,
}

impl MethodRef {
    pub fn new(class: ClassId, subsignature: impl Into<Subsignature>) -> Self {
        Self {
            class,
            subsignature: subsignature.into(),
        }
    }
}

/// Symbolic field reference, resolved against the hierarchy on use
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub class: ClassId,
    pub name: String,
}

impl FieldRef {
    pub fn new(class: ClassId, name: impl Into<String>) -> Self {
        Self {
            class,
            name: name.into(),
        }
    }
}

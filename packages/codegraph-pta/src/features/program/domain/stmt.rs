//! Statements relevant to pointer flow
//!
//! A closed sum type: every consumer matches exhaustively, so a new
//! statement kind is a compile error at each place that must handle it.

use super::ids::VarId;
use super::types::{FieldRef, MethodRef, Type};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Invocation kind, mirroring JVM invoke instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CallKind {
    /// Class method, no receiver
    Static,

    /// Constructor, private or `super` call: no dynamic dispatch
    Special,

    /// Dispatch on the receiver's runtime class
    Virtual,

    /// Dispatch on the receiver's runtime class through an interface
    Interface,

    /// `invokedynamic`; never resolved by this analysis
    Dynamic,
}

impl CallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::Static => "STATIC",
            CallKind::Special => "SPECIAL",
            CallKind::Virtual => "VIRTUAL",
            CallKind::Interface => "INTERFACE",
            CallKind::Dynamic => "DYNAMIC",
        }
    }

    /// Whether the call site carries a receiver variable
    #[inline]
    pub fn has_receiver(&self) -> bool {
        matches!(self, CallKind::Special | CallKind::Virtual | CallKind::Interface)
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Invoke {
    pub kind: CallKind,
    pub method_ref: MethodRef,

    /// Receiver variable; present exactly when `kind.has_receiver()`
    pub receiver: Option<VarId>,

    pub args: Vec<VarId>,

    /// Variable receiving the return value; `None` when discarded
    pub result: Option<VarId>,
}

impl Invoke {
    pub fn new(kind: CallKind, method_ref: MethodRef) -> Self {
        Self {
            kind,
            method_ref,
            receiver: None,
            args: Vec::new(),
            result: None,
        }
    }

    pub fn with_receiver(mut self, receiver: VarId) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = VarId>) -> Self {
        self.args = args.into_iter().collect();
        self
    }

    pub fn with_result(mut self, result: VarId) -> Self {
        self.result = Some(result);
        self
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.kind == CallKind::Static
    }
}

/// IR statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stmt {
    /// `lhs = new T`
    New { lhs: VarId, ty: Type },

    /// `lhs = rhs`
    Copy { lhs: VarId, rhs: VarId },

    /// `lhs = base.f`, or `lhs = T.f` when `base` is `None`
    LoadField {
        lhs: VarId,
        base: Option<VarId>,
        field: FieldRef,
    },

    /// `base.f = rhs`, or `T.f = rhs` when `base` is `None`
    StoreField {
        base: Option<VarId>,
        field: FieldRef,
        rhs: VarId,
    },

    /// `lhs = base[i]`; indices are not modelled
    LoadArray { lhs: VarId, base: VarId },

    /// `base[i] = rhs`
    StoreArray { base: VarId, rhs: VarId },

    Invoke(Invoke),

    /// `return value`
    Return { value: Option<VarId> },

    /// Anything without pointer effect (branches, primitive arithmetic, ...)
    Nop,
}

impl Stmt {
    /// Variable defined by this statement
    pub fn def(&self) -> Option<VarId> {
        match self {
            Stmt::New { lhs, .. }
            | Stmt::Copy { lhs, .. }
            | Stmt::LoadField { lhs, .. }
            | Stmt::LoadArray { lhs, .. } => Some(*lhs),
            Stmt::Invoke(invoke) => invoke.result,
            Stmt::StoreField { .. } | Stmt::StoreArray { .. } | Stmt::Return { .. } | Stmt::Nop => None,
        }
    }

    /// Variables read by this statement
    pub fn uses(&self) -> Vec<VarId> {
        match self {
            Stmt::New { .. } | Stmt::Nop => Vec::new(),
            Stmt::Copy { rhs, .. } => vec![*rhs],
            Stmt::LoadField { base, .. } => base.iter().copied().collect(),
            Stmt::StoreField { base, rhs, .. } => base.iter().copied().chain(std::iter::once(*rhs)).collect(),
            Stmt::LoadArray { base, .. } => vec![*base],
            Stmt::StoreArray { base, rhs } => vec![*base, *rhs],
            Stmt::Invoke(invoke) => invoke.receiver.iter().chain(invoke.args.iter()).copied().collect(),
            Stmt::Return { value } => value.iter().copied().collect(),
        }
    }

    /// All variables mentioned (defs and uses)
    pub fn vars(&self) -> Vec<VarId> {
        let mut vars = self.uses();
        vars.extend(self.def());
        vars
    }

    #[inline]
    pub fn as_invoke(&self) -> Option<&Invoke> {
        match self {
            Stmt::Invoke(invoke) => Some(invoke),
            _ => None,
        }
    }
}

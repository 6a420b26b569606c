//! Context-qualified entities
//!
//! Raw keys interned by the entity manager. Two keys that differ only in
//! context are distinct entities with independent points-to sets.

use super::handles::{CSObjId, ContextId, ObjId};
use crate::features::program::domain::{FieldId, MethodId, StmtId, VarId};
use serde::{Deserialize, Serialize};

/// Abstract object under a heap context
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CSObj {
    pub context: ContextId,
    pub obj: ObjId,
}

/// Call site under the caller's context
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CSCallSite {
    pub context: ContextId,
    pub call_site: StmtId,
}

/// Method under a callee context
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CSMethod {
    pub context: ContextId,
    pub method: MethodId,
}

/// A location that can hold references
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pointer {
    /// Local variable under its method's context
    Var { context: ContextId, var: VarId },

    /// Static fields are context-free
    StaticField { field: FieldId },

    /// `o.f` for one context-qualified object
    InstanceField { base: CSObjId, field: FieldId },

    /// All slots of one array object, indices collapsed
    ArrayIndex { base: CSObjId },
}

impl Pointer {
    #[inline]
    pub fn as_var(&self) -> Option<(ContextId, VarId)> {
        match *self {
            Pointer::Var { context, var } => Some((context, var)),
            _ => None,
        }
    }
}

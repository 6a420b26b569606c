//! Ports (Interfaces) for Points-to Analysis
//!
//! The solver is parameterized by two policies it never implements itself:
//! - **ContextSelector**: which context a callee or a new object gets
//! - **HeapModel**: which abstract object an allocation site denotes
//!
//! Results are consumed through `PointsToQuery`.

use crate::errors::Result;
use crate::features::points_to::domain::{CSCallSite, CSMethod, CSObj, ContextId, ContextPool, Obj, ObjId};
use crate::features::program::domain::{MethodId, Program, StmtId, VarId};
use std::collections::BTreeSet;

// ============================================================================
// Context Policy
// ============================================================================

/// Context selection policy
///
/// Every context returned must be interned in `pool`. Implementations are
/// stateless apart from their parameters.
pub trait ContextSelector: Send + Sync {
    /// Short name, e.g. `2-call`
    fn name(&self) -> String;

    /// Context of the entry method
    fn empty_context(&self) -> ContextId {
        ContextId::EMPTY
    }

    /// Callee context for a static call
    fn select_static_context(&self, pool: &mut ContextPool, call_site: CSCallSite, callee: MethodId) -> ContextId;

    /// Callee context for a call dispatched on `recv`
    fn select_instance_context(
        &self,
        pool: &mut ContextPool,
        call_site: CSCallSite,
        recv: CSObj,
        recv_obj: &Obj,
        callee: MethodId,
    ) -> ContextId;

    /// Heap context of an object allocated in `method`
    fn select_heap_context(&self, pool: &mut ContextPool, method: CSMethod, obj: &Obj) -> ContextId;
}

// ============================================================================
// Heap Abstraction
// ============================================================================

/// Maps allocation statements to abstract objects
pub trait HeapModel: Send + Sync {
    /// Abstract object for the `New` statement `site`; the same site always
    /// yields the same object
    fn obj_for(&mut self, program: &Program, site: StmtId) -> Result<ObjId>;

    fn obj(&self, id: ObjId) -> &Obj;

    /// Every object created so far, indexed by `ObjId`
    fn objects(&self) -> &[Obj];
}

// ============================================================================
// Result Queries
// ============================================================================

/// Context-insensitive view of a points-to result
pub trait PointsToQuery {
    /// Objects `var` may point to under any context
    fn points_to(&self, var: VarId) -> BTreeSet<ObjId>;

    /// Whether the two variables may hold the same object
    fn may_alias(&self, v1: VarId, v2: VarId) -> bool {
        let pts1 = self.points_to(v1);
        !pts1.is_empty() && !pts1.is_disjoint(&self.points_to(v2))
    }

    /// Whether `method` is reachable under some context
    fn is_reachable(&self, method: MethodId) -> bool;
}

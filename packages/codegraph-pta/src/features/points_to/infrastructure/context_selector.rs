//! Context selectors
//!
//! - **Insensitive**: one shared empty context
//! - **k-call-site (k-CFA)**: k most recent call sites
//! - **k-object**: receiver allocation sites (Milanova et al., TOSEM 2005)
//! - **k-type**: classes enclosing receiver allocation sites
//!   (Smaragdakis et al., POPL 2011)
//!
//! All k-limited selectors give heap objects the last k-1 elements of the
//! allocating method's context.

use crate::config::ContextSensitivity;
use crate::features::points_to::domain::{CSCallSite, CSMethod, CSObj, ContextElem, ContextId, ContextPool, Obj};
use crate::features::points_to::ports::ContextSelector;
use crate::features::program::domain::MethodId;

/// Selector for a configured sensitivity
pub fn selector_for(sensitivity: ContextSensitivity) -> Box<dyn ContextSelector> {
    match sensitivity {
        ContextSensitivity::Insensitive => Box::new(InsensitiveSelector),
        ContextSensitivity::CallSite { k } => Box::new(KCallSiteSelector::new(k)),
        ContextSensitivity::Object { k } => Box::new(KObjectSelector::new(k)),
        ContextSensitivity::Type { k } => Box::new(KTypeSelector::new(k)),
    }
}

#[inline]
fn heap_context(pool: &mut ContextPool, method: CSMethod, k: usize) -> ContextId {
    pool.truncate(method.context, k.saturating_sub(1))
}

/// Context-insensitive analysis
#[derive(Debug, Clone, Copy, Default)]
pub struct InsensitiveSelector;

impl ContextSelector for InsensitiveSelector {
    fn name(&self) -> String {
        ContextSensitivity::Insensitive.label()
    }

    fn select_static_context(&self, _pool: &mut ContextPool, _call_site: CSCallSite, _callee: MethodId) -> ContextId {
        ContextId::EMPTY
    }

    fn select_instance_context(
        &self,
        _pool: &mut ContextPool,
        _call_site: CSCallSite,
        _recv: CSObj,
        _recv_obj: &Obj,
        _callee: MethodId,
    ) -> ContextId {
        ContextId::EMPTY
    }

    fn select_heap_context(&self, _pool: &mut ContextPool, _method: CSMethod, _obj: &Obj) -> ContextId {
        ContextId::EMPTY
    }
}

/// k-limited call-string sensitivity
#[derive(Debug, Clone, Copy)]
pub struct KCallSiteSelector {
    k: usize,
}

impl KCallSiteSelector {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl ContextSelector for KCallSiteSelector {
    fn name(&self) -> String {
        ContextSensitivity::CallSite { k: self.k }.label()
    }

    fn select_static_context(&self, pool: &mut ContextPool, call_site: CSCallSite, _callee: MethodId) -> ContextId {
        pool.append(call_site.context, ContextElem::CallSite(call_site.call_site), self.k)
    }

    fn select_instance_context(
        &self,
        pool: &mut ContextPool,
        call_site: CSCallSite,
        _recv: CSObj,
        _recv_obj: &Obj,
        callee: MethodId,
    ) -> ContextId {
        self.select_static_context(pool, call_site, callee)
    }

    fn select_heap_context(&self, pool: &mut ContextPool, method: CSMethod, _obj: &Obj) -> ContextId {
        heap_context(pool, method, self.k)
    }
}

/// k-limited object sensitivity
#[derive(Debug, Clone, Copy)]
pub struct KObjectSelector {
    k: usize,
}

impl KObjectSelector {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl ContextSelector for KObjectSelector {
    fn name(&self) -> String {
        ContextSensitivity::Object { k: self.k }.label()
    }

    /// Static calls have no receiver and inherit the caller's context
    fn select_static_context(&self, _pool: &mut ContextPool, call_site: CSCallSite, _callee: MethodId) -> ContextId {
        call_site.context
    }

    fn select_instance_context(
        &self,
        pool: &mut ContextPool,
        _call_site: CSCallSite,
        recv: CSObj,
        _recv_obj: &Obj,
        _callee: MethodId,
    ) -> ContextId {
        pool.append(recv.context, ContextElem::Object(recv.obj), self.k)
    }

    fn select_heap_context(&self, pool: &mut ContextPool, method: CSMethod, _obj: &Obj) -> ContextId {
        heap_context(pool, method, self.k)
    }
}

/// k-limited type sensitivity
#[derive(Debug, Clone, Copy)]
pub struct KTypeSelector {
    k: usize,
}

impl KTypeSelector {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl ContextSelector for KTypeSelector {
    fn name(&self) -> String {
        ContextSensitivity::Type { k: self.k }.label()
    }

    fn select_static_context(&self, _pool: &mut ContextPool, call_site: CSCallSite, _callee: MethodId) -> ContextId {
        call_site.context
    }

    fn select_instance_context(
        &self,
        pool: &mut ContextPool,
        _call_site: CSCallSite,
        recv: CSObj,
        recv_obj: &Obj,
        _callee: MethodId,
    ) -> ContextId {
        pool.append(recv.context, ContextElem::Type(recv_obj.container_class), self.k)
    }

    fn select_heap_context(&self, pool: &mut ContextPool, method: CSMethod, _obj: &Obj) -> ContextId {
        heap_context(pool, method, self.k)
    }
}

//! Entity manager
//!
//! Interns every context-qualified entity into a dense handle. Each distinct
//! key maps to exactly one handle for the lifetime of a solver run, so the
//! graphs and points-to sets compare handles instead of structures.

use crate::features::points_to::domain::{
    CSCallSite, CSCallSiteId, CSMethod, CSMethodId, CSObj, CSObjId, ContextId, ContextPool, ObjId,
    Pointer, PointerId, PointsToSet,
};
use crate::features::program::domain::{FieldId, MethodId, StmtId, VarId};
use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Bidirectional key ↔ dense index map
#[derive(Debug, Clone)]
struct Interner<K> {
    ids: FxHashMap<K, u32>,
    keys: Vec<K>,
}

impl<K: Copy + Eq + Hash> Interner<K> {
    fn new() -> Self {
        Self {
            ids: FxHashMap::default(),
            keys: Vec::new(),
        }
    }

    /// Returns the index and whether it was freshly created
    fn intern(&mut self, key: K) -> (u32, bool) {
        if let Some(&id) = self.ids.get(&key) {
            return (id, false);
        }
        let id = self.keys.len() as u32;
        self.keys.push(key);
        self.ids.insert(key, id);
        (id, true)
    }

    #[inline]
    fn get(&self, key: &K) -> Option<u32> {
        self.ids.get(key).copied()
    }

    #[inline]
    fn key(&self, id: u32) -> K {
        self.keys[id as usize]
    }

    #[inline]
    fn len(&self) -> usize {
        self.keys.len()
    }
}

/// Owner of all interned analysis entities and their points-to sets
#[derive(Debug, Clone)]
pub struct CSManager {
    contexts: ContextPool,
    objs: Interner<CSObj>,
    call_sites: Interner<CSCallSite>,
    methods: Interner<CSMethod>,
    pointers: Interner<Pointer>,
    points_to: Vec<PointsToSet>,
    var_pointers: FxHashMap<VarId, Vec<PointerId>>,
}

impl Default for CSManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CSManager {
    pub fn new() -> Self {
        Self {
            contexts: ContextPool::new(),
            objs: Interner::new(),
            call_sites: Interner::new(),
            methods: Interner::new(),
            pointers: Interner::new(),
            points_to: Vec::new(),
            var_pointers: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn contexts(&self) -> &ContextPool {
        &self.contexts
    }

    #[inline]
    pub fn contexts_mut(&mut self) -> &mut ContextPool {
        &mut self.contexts
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Interning
    // ═══════════════════════════════════════════════════════════════════════

    pub fn cs_obj(&mut self, context: ContextId, obj: ObjId) -> CSObjId {
        CSObjId(self.objs.intern(CSObj { context, obj }).0)
    }

    pub fn cs_call_site(&mut self, context: ContextId, call_site: StmtId) -> CSCallSiteId {
        CSCallSiteId(self.call_sites.intern(CSCallSite { context, call_site }).0)
    }

    pub fn cs_method(&mut self, context: ContextId, method: MethodId) -> CSMethodId {
        CSMethodId(self.methods.intern(CSMethod { context, method }).0)
    }

    pub fn cs_var(&mut self, context: ContextId, var: VarId) -> PointerId {
        self.pointer(Pointer::Var { context, var })
    }

    pub fn static_field(&mut self, field: FieldId) -> PointerId {
        self.pointer(Pointer::StaticField { field })
    }

    pub fn instance_field(&mut self, base: CSObjId, field: FieldId) -> PointerId {
        self.pointer(Pointer::InstanceField { base, field })
    }

    pub fn array_index(&mut self, base: CSObjId) -> PointerId {
        self.pointer(Pointer::ArrayIndex { base })
    }

    fn pointer(&mut self, key: Pointer) -> PointerId {
        let (raw, fresh) = self.pointers.intern(key);
        let id = PointerId(raw);
        if fresh {
            self.points_to.push(PointsToSet::new());
            if let Pointer::Var { var, .. } = key {
                self.var_pointers.entry(var).or_default().push(id);
            }
        }
        id
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Lookup (never interns)
    // ═══════════════════════════════════════════════════════════════════════

    pub fn find_pointer(&self, key: &Pointer) -> Option<PointerId> {
        self.pointers.get(key).map(PointerId)
    }

    pub fn find_cs_obj(&self, context: ContextId, obj: ObjId) -> Option<CSObjId> {
        self.objs.get(&CSObj { context, obj }).map(CSObjId)
    }

    pub fn find_cs_method(&self, context: ContextId, method: MethodId) -> Option<CSMethodId> {
        self.methods.get(&CSMethod { context, method }).map(CSMethodId)
    }

    /// Every context-qualified pointer of `var`
    pub fn pointers_of_var(&self, var: VarId) -> &[PointerId] {
        self.var_pointers.get(&var).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn pointer_key(&self, id: PointerId) -> Pointer {
        self.pointers.key(id.0)
    }

    #[inline]
    pub fn cs_obj_key(&self, id: CSObjId) -> CSObj {
        self.objs.key(id.0)
    }

    #[inline]
    pub fn cs_call_site_key(&self, id: CSCallSiteId) -> CSCallSite {
        self.call_sites.key(id.0)
    }

    #[inline]
    pub fn cs_method_key(&self, id: CSMethodId) -> CSMethod {
        self.methods.key(id.0)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Points-to Sets
    // ═══════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn points_to(&self, pointer: PointerId) -> &PointsToSet {
        &self.points_to[pointer.index()]
    }

    #[inline]
    pub fn points_to_mut(&mut self, pointer: PointerId) -> &mut PointsToSet {
        &mut self.points_to[pointer.index()]
    }

    /// All pointers with their handles
    pub fn pointers(&self) -> impl Iterator<Item = (PointerId, Pointer)> + '_ {
        self.pointers
            .keys
            .iter()
            .enumerate()
            .map(|(i, &p)| (PointerId::new(i), p))
    }

    pub fn num_pointers(&self) -> usize {
        self.pointers.len()
    }

    pub fn num_cs_objs(&self) -> usize {
        self.objs.len()
    }

    pub fn num_cs_methods(&self) -> usize {
        self.methods.len()
    }

    pub fn num_cs_call_sites(&self) -> usize {
        self.call_sites.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::points_to::domain::ContextElem;

    #[test]
    fn test_interning_is_idempotent() {
        let mut m = CSManager::new();
        let p1 = m.cs_var(ContextId::EMPTY, VarId(3));
        let p2 = m.cs_var(ContextId::EMPTY, VarId(3));
        assert_eq!(p1, p2);
        assert_eq!(m.num_pointers(), 1);

        let o1 = m.cs_obj(ContextId::EMPTY, ObjId(0));
        assert_eq!(m.instance_field(o1, FieldId(1)), m.instance_field(o1, FieldId(1)));
        assert_eq!(m.array_index(o1), m.array_index(o1));
        assert_eq!(m.static_field(FieldId(1)), m.static_field(FieldId(1)));
        assert_eq!(m.num_pointers(), 4);
        assert_eq!(m.cs_method(ContextId::EMPTY, MethodId(0)), m.cs_method(ContextId::EMPTY, MethodId(0)));
    }

    #[test]
    fn test_contexts_distinguish_entities() {
        let mut m = CSManager::new();
        let ctx = m.contexts_mut().intern(vec![ContextElem::CallSite(StmtId(1))]);
        let p1 = m.cs_var(ContextId::EMPTY, VarId(0));
        let p2 = m.cs_var(ctx, VarId(0));
        assert_ne!(p1, p2);
        assert_eq!(m.pointers_of_var(VarId(0)), &[p1, p2]);
        assert!(m.pointers_of_var(VarId(1)).is_empty());
        assert_eq!(m.pointer_key(p2), Pointer::Var { context: ctx, var: VarId(0) });
    }

    #[test]
    fn test_every_pointer_has_a_set() {
        let mut m = CSManager::new();
        let p = m.static_field(FieldId(0));
        let o = m.cs_obj(ContextId::EMPTY, ObjId(2));
        assert!(m.points_to(p).is_empty());
        m.points_to_mut(p).insert(o);
        assert!(m.points_to(p).contains(o));
        assert_eq!(m.find_pointer(&Pointer::StaticField { field: FieldId(0) }), Some(p));
        assert_eq!(m.find_pointer(&Pointer::StaticField { field: FieldId(9) }), None);
    }
}

//! Pointer analysis result and queries
//!
//! Owns the interned entities, points-to sets and context-sensitive call
//! graph of one finished run. Context-insensitive projections are indexed
//! once at construction, so per-query cost does not grow with the run.

use crate::errors::Result;
use crate::features::points_to::domain::{
    CSCallSite, CSCallSiteId, CSMethod, CSMethodId, CSObj, CallGraph, ContextElem, ContextId, Edge, Obj,
    ObjId, Pointer, PointerId, PointsToSet,
};
use crate::features::points_to::infrastructure::{CSManager, SolverOutput};
use crate::features::points_to::ports::PointsToQuery;
use crate::features::program::domain::{CallKind, FieldId, MethodId, Program, StmtId, Type, VarId};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Run statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PtaStats {
    /// Context abstraction label, e.g. `2-obj`
    pub sensitivity: String,
    /// Distinct reachable methods, contexts projected away
    pub reachable_methods: usize,
    /// Reachable (context, method) pairs
    pub cs_methods: usize,
    pub pointers: usize,
    pub objects: usize,
    pub cs_objects: usize,
    pub contexts: usize,
    pub pfg_edges: usize,
    pub call_edges: usize,
    pub worklist_entries: usize,
    pub duration_ms: f64,
    /// False when a work-list budget cut the run short
    pub completed: bool,
}

/// One context-insensitive call edge, rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEdgeSummary {
    pub caller: String,
    pub call_site: String,
    pub kind: CallKind,
    pub callee: String,
}

/// Serializable snapshot of a result, keyed by readable names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PtaSummary {
    pub stats: PtaStats,
    pub reachable_methods: Vec<String>,
    pub call_edges: Vec<CallEdgeSummary>,
    /// Variable → objects, both rendered; empty sets omitted
    pub points_to: BTreeMap<String, Vec<String>>,
}

/// Context-insensitive lookups over a finished run
#[derive(Debug, Default)]
struct CiIndex {
    /// Discovery order, deduplicated
    reachable_order: Vec<MethodId>,
    reachable: FxHashSet<MethodId>,
    callees: FxHashMap<StmtId, BTreeSet<MethodId>>,
    field_slots: FxHashMap<(ObjId, FieldId), Vec<PointerId>>,
    array_slots: FxHashMap<ObjId, Vec<PointerId>>,
    obj_by_site: FxHashMap<StmtId, ObjId>,
}

impl CiIndex {
    fn build(manager: &CSManager, call_graph: &CallGraph<CSCallSiteId, CSMethodId>, objects: &[Obj]) -> Self {
        let mut index = Self::default();

        for &cs_method in call_graph.reachable_methods() {
            let method = manager.cs_method_key(cs_method).method;
            if index.reachable.insert(method) {
                index.reachable_order.push(method);
            }
        }
        for edge in call_graph.edges() {
            let site = manager.cs_call_site_key(edge.call_site).call_site;
            let callee = manager.cs_method_key(edge.callee).method;
            index.callees.entry(site).or_default().insert(callee);
        }
        for (pointer, key) in manager.pointers() {
            match key {
                Pointer::InstanceField { base, field } => {
                    let obj = manager.cs_obj_key(base).obj;
                    index.field_slots.entry((obj, field)).or_default().push(pointer);
                }
                Pointer::ArrayIndex { base } => {
                    let obj = manager.cs_obj_key(base).obj;
                    index.array_slots.entry(obj).or_default().push(pointer);
                }
                Pointer::Var { .. } | Pointer::StaticField { .. } => {}
            }
        }
        index.obj_by_site = objects.iter().map(|o| (o.site, o.id)).collect();
        index
    }
}

#[derive(Debug)]
pub struct PointerAnalysisResult {
    manager: CSManager,
    call_graph: CallGraph<CSCallSiteId, CSMethodId>,
    objects: Vec<Obj>,
    index: CiIndex,
    stats: PtaStats,
}

impl PointerAnalysisResult {
    pub(crate) fn new(output: SolverOutput, sensitivity: String, duration_ms: f64) -> Self {
        let index = CiIndex::build(&output.manager, &output.call_graph, &output.objects);

        let stats = PtaStats {
            sensitivity,
            reachable_methods: index.reachable_order.len(),
            cs_methods: output.call_graph.num_reachable_methods(),
            pointers: output.manager.num_pointers(),
            objects: output.objects.len(),
            cs_objects: output.manager.num_cs_objs(),
            contexts: output.manager.contexts().len(),
            pfg_edges: output.pfg_edges,
            call_edges: output.call_graph.num_edges(),
            worklist_entries: output.worklist_entries,
            duration_ms,
            completed: output.completed,
        };

        Self {
            manager: output.manager,
            call_graph: output.call_graph,
            objects: output.objects,
            index,
            stats,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Points-to Queries
    // ═══════════════════════════════════════════════════════════════════════

    /// Objects `var` points to under `context`
    pub fn cs_points_to(&self, context: ContextId, var: VarId) -> BTreeSet<CSObj> {
        self.manager
            .find_pointer(&Pointer::Var { context, var })
            .map(|p| self.cs_objs(self.manager.points_to(p)))
            .unwrap_or_default()
    }

    /// Contexts under which `var` was analyzed
    pub fn contexts_of(&self, var: VarId) -> Vec<ContextId> {
        self.manager
            .pointers_of_var(var)
            .iter()
            .filter_map(|&p| self.manager.pointer_key(p).as_var().map(|(ctx, _)| ctx))
            .collect()
    }

    /// Objects `var` points to under any context
    pub fn points_to(&self, var: VarId) -> BTreeSet<ObjId> {
        self.manager
            .pointers_of_var(var)
            .iter()
            .flat_map(|&p| self.project(self.manager.points_to(p)))
            .collect()
    }

    pub fn static_field_points_to(&self, field: FieldId) -> BTreeSet<ObjId> {
        self.manager
            .find_pointer(&Pointer::StaticField { field })
            .map(|p| self.project(self.manager.points_to(p)).collect())
            .unwrap_or_default()
    }

    /// `obj.field` under every heap context of `obj`
    pub fn instance_field_points_to(&self, obj: ObjId, field: FieldId) -> BTreeSet<ObjId> {
        self.collect_from(self.index.field_slots.get(&(obj, field)))
    }

    /// Array slots of `obj` under every heap context
    pub fn array_points_to(&self, obj: ObjId) -> BTreeSet<ObjId> {
        self.collect_from(self.index.array_slots.get(&obj))
    }

    pub fn may_alias(&self, v1: VarId, v2: VarId) -> bool {
        PointsToQuery::may_alias(self, v1, v2)
    }

    fn collect_from(&self, pointers: Option<&Vec<PointerId>>) -> BTreeSet<ObjId> {
        pointers
            .into_iter()
            .flatten()
            .flat_map(|&p| self.project(self.manager.points_to(p)))
            .collect()
    }

    fn cs_objs(&self, pts: &PointsToSet) -> BTreeSet<CSObj> {
        pts.iter().map(|o| self.manager.cs_obj_key(o)).collect()
    }

    fn project<'s>(&'s self, pts: &'s PointsToSet) -> impl Iterator<Item = ObjId> + 's {
        pts.iter().map(move |o| self.manager.cs_obj_key(o).obj)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Call Graph Queries
    // ═══════════════════════════════════════════════════════════════════════

    /// Context-sensitive call graph
    pub fn call_graph(&self) -> &CallGraph<CSCallSiteId, CSMethodId> {
        &self.call_graph
    }

    pub fn cs_call_site(&self, id: CSCallSiteId) -> CSCallSite {
        self.manager.cs_call_site_key(id)
    }

    pub fn cs_method(&self, id: CSMethodId) -> CSMethod {
        self.manager.cs_method_key(id)
    }

    /// Call graph with contexts projected away
    pub fn ci_call_graph(&self) -> CallGraph<StmtId, MethodId> {
        let mut ci = CallGraph::new();
        for &entry in self.call_graph.entry_methods() {
            ci.add_entry_method(self.cs_method(entry).method);
        }
        for &m in self.call_graph.reachable_methods() {
            ci.add_reachable_method(self.cs_method(m).method);
        }
        for edge in self.call_graph.edges() {
            ci.add_edge(Edge::new(
                edge.kind,
                self.cs_call_site(edge.call_site).call_site,
                self.cs_method(edge.callee).method,
            ));
        }
        ci
    }

    /// Reachable methods in discovery order, contexts projected away
    pub fn reachable_methods(&self) -> Vec<MethodId> {
        self.index.reachable_order.clone()
    }

    pub fn is_reachable(&self, method: MethodId) -> bool {
        self.index.reachable.contains(&method)
    }

    /// Methods reachable from `call_site` under any context
    pub fn callees_of(&self, call_site: StmtId) -> BTreeSet<MethodId> {
        self.index.callees.get(&call_site).cloned().unwrap_or_default()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Objects and Contexts
    // ═══════════════════════════════════════════════════════════════════════

    pub fn objects(&self) -> &[Obj] {
        &self.objects
    }

    pub fn obj(&self, id: ObjId) -> &Obj {
        &self.objects[id.index()]
    }

    /// Object allocated at `site`, if that site was reached
    pub fn obj_at(&self, site: StmtId) -> Option<ObjId> {
        self.index.obj_by_site.get(&site).copied()
    }

    pub fn context_elems(&self, context: ContextId) -> &[ContextElem] {
        self.manager.contexts().elems(context)
    }

    pub fn stats(&self) -> &PtaStats {
        &self.stats
    }

    /// Whether the fixpoint was reached
    pub fn is_complete(&self) -> bool {
        self.stats.completed
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Export
    // ═══════════════════════════════════════════════════════════════════════

    /// `Type@site` rendering of an object
    pub fn obj_label(&self, program: &Program, id: ObjId) -> String {
        let obj = self.obj(id);
        format!("{}@{}", type_name(program, &obj.ty), obj.site)
    }

    pub fn summary(&self, program: &Program) -> PtaSummary {
        let ci = self.ci_call_graph();

        let reachable_methods = ci
            .reachable_methods()
            .iter()
            .map(|&m| program.method_signature(m))
            .collect();

        let call_edges = ci
            .edges()
            .iter()
            .map(|e| CallEdgeSummary {
                caller: program.method_signature(program.stmt_method(e.call_site)),
                call_site: e.call_site.to_string(),
                kind: e.kind,
                callee: program.method_signature(e.callee),
            })
            .collect();

        let mut points_to = BTreeMap::new();
        for (_, key) in self.manager.pointers() {
            let Some((_, var)) = key.as_var() else { continue };
            let name = program.var_name(var);
            if points_to.contains_key(&name) {
                continue;
            }
            let objs: Vec<String> = self.points_to(var).into_iter().map(|o| self.obj_label(program, o)).collect();
            if !objs.is_empty() {
                points_to.insert(name, objs);
            }
        }

        PtaSummary {
            stats: self.stats.clone(),
            reachable_methods,
            call_edges,
            points_to,
        }
    }

    pub fn to_json(&self, program: &Program) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.summary(program))?)
    }

    /// Graphviz rendering of the context-insensitive call graph
    pub fn to_dot(&self, program: &Program) -> String {
        self.ci_call_graph()
            .to_dot(|site| program.stmt_method(site), |m| program.method_signature(m))
    }
}

impl PointsToQuery for PointerAnalysisResult {
    fn points_to(&self, var: VarId) -> BTreeSet<ObjId> {
        PointerAnalysisResult::points_to(self, var)
    }

    fn is_reachable(&self, method: MethodId) -> bool {
        PointerAnalysisResult::is_reachable(self, method)
    }
}

fn type_name(program: &Program, ty: &Type) -> String {
    match ty {
        Type::Class(c) => program.class(*c).name.clone(),
        Type::Array(elem) => format!("{}[]", type_name(program, elem)),
    }
}

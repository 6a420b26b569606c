//! Inclusion-based Points-to Solver with on-the-fly call graph
//!
//! Worklist fixpoint over the pointer flow graph:
//! - newly reachable (context, method) pairs are translated into PFG edges
//!   and initial facts (allocations, copies, static fields, static calls)
//! - each worklist entry propagates only its delta along PFG edges
//! - when a variable gains objects, the field/array accesses and call sites
//!   dereferencing it are re-examined for each new object, which may add
//!   call edges, reachable methods and further PFG edges
//!
//! All structures grow monotonically, so the loop terminates on any finite
//! program with a bounded context abstraction.
//!
//! # References
//! - Andersen, L. O. "Program Analysis and Specialization for C" (PhD 1994)
//! - Lhoták & Hendren "Scaling Java Points-to Analysis Using Spark" (CC 2003)
//! - Smaragdakis & Balatsouras "Pointer Analysis" (FnTPL 2015)

use super::cs_manager::CSManager;
use super::pointer_flow_graph::PointerFlowGraph;
use super::work_list::WorkList;
use crate::config::PtaConfig;
use crate::errors::{PtaError, Result};
use crate::features::points_to::domain::{
    CSCallSite, CSCallSiteId, CSMethodId, CSObjId, CallGraph, ContextId, Edge, Obj, ObjId,
    Pointer, PointerId, PointsToSet,
};
use crate::features::points_to::ports::{ContextSelector, HeapModel};
use crate::features::program::domain::{CallKind, FieldId, FieldRef, Invoke, MethodId, Program, Stmt, StmtId, VarId};
use crate::features::program::infrastructure::ClassHierarchy;
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Everything a finished run leaves behind
#[derive(Debug)]
pub struct SolverOutput {
    pub manager: CSManager,
    pub call_graph: CallGraph<CSCallSiteId, CSMethodId>,
    pub objects: Vec<Obj>,
    pub pfg_edges: usize,
    pub worklist_entries: usize,
    /// False when the work-list budget stopped the run before the fixpoint
    pub completed: bool,
}

/// Single-run solver; owns all mutable analysis state
pub struct Solver<'a> {
    program: &'a Program,
    hierarchy: ClassHierarchy<'a>,
    heap_model: Box<dyn HeapModel>,
    selector: Box<dyn ContextSelector>,
    config: PtaConfig,

    manager: CSManager,
    pfg: PointerFlowGraph,
    call_graph: CallGraph<CSCallSiteId, CSMethodId>,
    work_list: WorkList,

    /// Reachable methods whose statements are not yet translated
    pending_methods: VecDeque<CSMethodId>,

    worklist_entries: usize,
}

impl<'a> Solver<'a> {
    pub fn new(
        program: &'a Program,
        selector: Box<dyn ContextSelector>,
        heap_model: Box<dyn HeapModel>,
        config: PtaConfig,
    ) -> Self {
        let work_list = WorkList::new(config.worklist_order);
        Self {
            program,
            hierarchy: ClassHierarchy::new(program),
            heap_model,
            selector,
            config,
            manager: CSManager::new(),
            pfg: PointerFlowGraph::new(),
            call_graph: CallGraph::new(),
            work_list,
            pending_methods: VecDeque::new(),
            worklist_entries: 0,
        }
    }

    /// Run to fixpoint (or until the budget runs out)
    pub fn solve(mut self) -> Result<SolverOutput> {
        self.initialize();
        let completed = self.analyze()?;

        Ok(SolverOutput {
            pfg_edges: self.pfg.num_edges(),
            objects: self.heap_model.objects().to_vec(),
            manager: self.manager,
            call_graph: self.call_graph,
            worklist_entries: self.worklist_entries,
            completed,
        })
    }

    fn initialize(&mut self) {
        let context = self.selector.empty_context();
        let entry = self.manager.cs_method(context, self.program.entry());
        self.call_graph.add_entry_method(entry);
        self.pending_methods.push_back(entry);
    }

    /// Main loop; returns false if stopped by the budget
    fn analyze(&mut self) -> Result<bool> {
        loop {
            while let Some(method) = self.pending_methods.pop_front() {
                self.process_method(method)?;
            }

            let Some((pointer, pts)) = self.work_list.pop() else {
                return Ok(true);
            };

            if let Some(max) = self.config.max_worklist_entries {
                if self.worklist_entries >= max {
                    warn!(
                        "pointer analysis stopped after {} work-list entries; result is partial",
                        self.worklist_entries
                    );
                    return Ok(false);
                }
            }
            self.worklist_entries += 1;

            let delta = self.propagate(pointer, &pts);
            if delta.is_empty() {
                continue;
            }
            if let Pointer::Var { context, var } = self.manager.pointer_key(pointer) {
                for obj in delta.iter() {
                    self.process_instance_accesses(context, var, obj)?;
                    self.process_call(context, var, obj)?;
                }
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Reachability
    // ═══════════════════════════════════════════════════════════════════════

    fn add_reachable(&mut self, method: CSMethodId) {
        if self.call_graph.add_reachable_method(method) {
            self.pending_methods.push_back(method);
        }
    }

    /// Translate the context-independent statements of a newly reachable method
    fn process_method(&mut self, cs_method: CSMethodId) -> Result<()> {
        let program = self.program;
        let key = self.manager.cs_method_key(cs_method);
        let context = key.context;
        debug!(
            "reachable: {} {}",
            self.manager.contexts().render(context),
            program.method_signature(key.method)
        );

        let Some(body) = program.method(key.method).body.as_ref() else {
            return Ok(());
        };

        for &sid in &body.stmts {
            match program.stmt(sid) {
                Stmt::New { lhs, .. } => {
                    let obj = self.heap_model.obj_for(program, sid)?;
                    let heap_context = self.selector.select_heap_context(
                        self.manager.contexts_mut(),
                        key,
                        self.heap_model.obj(obj),
                    );
                    let cs_obj = self.manager.cs_obj(heap_context, obj);
                    let pointer = self.manager.cs_var(context, *lhs);
                    self.work_list.push(pointer, PointsToSet::singleton(cs_obj));
                }
                Stmt::Copy { lhs, rhs } => {
                    let source = self.manager.cs_var(context, *rhs);
                    let target = self.manager.cs_var(context, *lhs);
                    self.add_pfg_edge(source, target);
                }
                Stmt::LoadField { lhs, base: None, field } => {
                    let field = self.resolve_field(field, true)?;
                    let source = self.manager.static_field(field);
                    let target = self.manager.cs_var(context, *lhs);
                    self.add_pfg_edge(source, target);
                }
                Stmt::StoreField { base: None, field, rhs } => {
                    let field = self.resolve_field(field, true)?;
                    let source = self.manager.cs_var(context, *rhs);
                    let target = self.manager.static_field(field);
                    self.add_pfg_edge(source, target);
                }
                Stmt::Invoke(invoke) if invoke.kind == CallKind::Static => {
                    self.process_static_call(context, sid, invoke)?;
                }
                // Instance accesses and calls wait for their base to gain objects
                Stmt::LoadField { .. }
                | Stmt::StoreField { .. }
                | Stmt::LoadArray { .. }
                | Stmt::StoreArray { .. }
                | Stmt::Invoke(_)
                | Stmt::Return { .. }
                | Stmt::Nop => {}
            }
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Calls
    // ═══════════════════════════════════════════════════════════════════════

    fn process_static_call(&mut self, context: ContextId, sid: StmtId, invoke: &Invoke) -> Result<()> {
        let Some(callee) = self.resolve_callee(invoke, None) else {
            trace!("unresolved static call at {}", sid);
            return Ok(());
        };
        if !self.program.method(callee).is_static {
            return Err(PtaError::malformed(format!(
                "static call at {} resolves to instance method {}",
                sid,
                self.program.method_signature(callee)
            )));
        }

        let call_site = CSCallSite { context, call_site: sid };
        let callee_context = self
            .selector
            .select_static_context(self.manager.contexts_mut(), call_site, callee);
        let cs_callee = self.manager.cs_method(callee_context, callee);
        let cs_site = self.manager.cs_call_site(context, sid);
        self.add_call_edge(invoke.kind, cs_site, cs_callee)
    }

    /// Resolve and wire every call site whose receiver is `var`, for the
    /// newly arrived receiver object `recv`
    fn process_call(&mut self, context: ContextId, var: VarId, recv: CSObjId) -> Result<()> {
        let program = self.program;
        let recv_key = self.manager.cs_obj_key(recv);

        for &sid in &program.uses_of(var).invokes {
            let Some(invoke) = program.stmt(sid).as_invoke() else {
                continue;
            };
            let Some(callee) = self.resolve_callee(invoke, Some(recv_key.obj)) else {
                trace!("no target for {} call at {}", invoke.kind, sid);
                continue;
            };
            if program.method(callee).is_static {
                return Err(PtaError::malformed(format!(
                    "{} call at {} resolves to static method {}",
                    invoke.kind,
                    sid,
                    program.method_signature(callee)
                )));
            }

            let call_site = CSCallSite { context, call_site: sid };
            let callee_context = self.selector.select_instance_context(
                self.manager.contexts_mut(),
                call_site,
                recv_key,
                self.heap_model.obj(recv_key.obj),
                callee,
            );
            let cs_callee = self.manager.cs_method(callee_context, callee);

            if let Some(this) = program.method(callee).body.as_ref().and_then(|b| b.this) {
                let this_pointer = self.manager.cs_var(callee_context, this);
                self.work_list.push(this_pointer, PointsToSet::singleton(recv));
            }

            let cs_site = self.manager.cs_call_site(context, sid);
            self.add_call_edge(invoke.kind, cs_site, cs_callee)?;
        }
        Ok(())
    }

    fn add_call_edge(&mut self, kind: CallKind, cs_site: CSCallSiteId, cs_callee: CSMethodId) -> Result<()> {
        if !self.call_graph.add_edge(Edge::new(kind, cs_site, cs_callee)) {
            return Ok(());
        }
        let site = self.manager.cs_call_site_key(cs_site);
        let callee = self.manager.cs_method_key(cs_callee);
        debug!(
            "call edge: {} {} -> {} {}",
            self.manager.contexts().render(site.context),
            site.call_site,
            self.manager.contexts().render(callee.context),
            self.program.method_signature(callee.method)
        );

        self.add_reachable(cs_callee);
        self.wire_call(cs_site, cs_callee)
    }

    /// Argument → parameter and return → result edges for a new call edge
    fn wire_call(&mut self, cs_site: CSCallSiteId, cs_callee: CSMethodId) -> Result<()> {
        let program = self.program;
        let site = self.manager.cs_call_site_key(cs_site);
        let callee = self.manager.cs_method_key(cs_callee);

        let invoke = program
            .stmt(site.call_site)
            .as_invoke()
            .ok_or_else(|| PtaError::malformed(format!("{} is not a call site", site.call_site)))?;

        // Native and abstract callees have nothing to wire
        let Some(body) = program.method(callee.method).body.as_ref() else {
            return Ok(());
        };

        if invoke.args.len() != body.params.len() {
            return Err(PtaError::ArityMismatch {
                callee: program.method_signature(callee.method),
                args: invoke.args.len(),
                params: body.params.len(),
            });
        }

        for (&arg, &param) in invoke.args.iter().zip(&body.params) {
            let source = self.manager.cs_var(site.context, arg);
            let target = self.manager.cs_var(callee.context, param);
            self.add_pfg_edge(source, target);
        }

        if let Some(result) = invoke.result {
            let target = self.manager.cs_var(site.context, result);
            for &ret in &body.return_vars {
                let source = self.manager.cs_var(callee.context, ret);
                self.add_pfg_edge(source, target);
            }
        }
        Ok(())
    }

    /// Concrete target of `invoke`, dispatching on the runtime type of `recv`
    fn resolve_callee(&self, invoke: &Invoke, recv: Option<ObjId>) -> Option<MethodId> {
        let target = match invoke.kind {
            CallKind::Static | CallKind::Special => self.hierarchy.resolve_method(&invoke.method_ref),
            CallKind::Virtual | CallKind::Interface => {
                let recv_type = &self.heap_model.obj(recv?).ty;
                self.hierarchy.dispatch_on_type(recv_type, &invoke.method_ref.subsignature)
            }
            CallKind::Dynamic => None,
        }?;
        (!self.program.method(target).is_abstract).then_some(target)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Fields and Arrays
    // ═══════════════════════════════════════════════════════════════════════

    /// Edges for every field/array access based on `var`, scoped to `obj`
    fn process_instance_accesses(&mut self, context: ContextId, var: VarId, obj: CSObjId) -> Result<()> {
        let program = self.program;
        let uses = program.uses_of(var);

        for &sid in &uses.store_fields {
            if let Stmt::StoreField { field, rhs, .. } = program.stmt(sid) {
                let field = self.resolve_field(field, false)?;
                let source = self.manager.cs_var(context, *rhs);
                let target = self.manager.instance_field(obj, field);
                self.add_pfg_edge(source, target);
            }
        }
        for &sid in &uses.load_fields {
            if let Stmt::LoadField { lhs, field, .. } = program.stmt(sid) {
                let field = self.resolve_field(field, false)?;
                let source = self.manager.instance_field(obj, field);
                let target = self.manager.cs_var(context, *lhs);
                self.add_pfg_edge(source, target);
            }
        }
        for &sid in &uses.store_arrays {
            if let Stmt::StoreArray { rhs, .. } = program.stmt(sid) {
                let source = self.manager.cs_var(context, *rhs);
                let target = self.manager.array_index(obj);
                self.add_pfg_edge(source, target);
            }
        }
        for &sid in &uses.load_arrays {
            if let Stmt::LoadArray { lhs, .. } = program.stmt(sid) {
                let source = self.manager.array_index(obj);
                let target = self.manager.cs_var(context, *lhs);
                self.add_pfg_edge(source, target);
            }
        }
        Ok(())
    }

    fn resolve_field(&self, field_ref: &FieldRef, expect_static: bool) -> Result<FieldId> {
        let field = self.hierarchy.resolve_field(field_ref)?;
        if self.program.field(field).is_static != expect_static {
            return Err(PtaError::malformed(format!(
                "{} access to {} field {}",
                if expect_static { "static" } else { "instance" },
                if expect_static { "instance" } else { "static" },
                self.program.field_name(field)
            )));
        }
        Ok(field)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Propagation
    // ═══════════════════════════════════════════════════════════════════════

    /// Add `source → target`; a new edge immediately forwards what `source`
    /// already holds
    fn add_pfg_edge(&mut self, source: PointerId, target: PointerId) {
        if !self.pfg.add_edge(source, target) {
            return;
        }
        trace!("pfg edge {} -> {}", source, target);
        let pts = self.manager.points_to(source);
        if !pts.is_empty() {
            self.work_list.push(target, pts.clone());
        }
    }

    /// Union `pts` into `pointer` and forward the delta to its successors
    fn propagate(&mut self, pointer: PointerId, pts: &PointsToSet) -> PointsToSet {
        let delta = self.manager.points_to_mut(pointer).add_all_diff(pts);
        if !delta.is_empty() {
            for &succ in self.pfg.successors_of(pointer) {
                self.work_list.push(succ, delta.clone());
            }
        }
        delta
    }
}

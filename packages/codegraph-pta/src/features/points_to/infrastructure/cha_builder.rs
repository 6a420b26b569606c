//! Class Hierarchy Analysis call graph
//!
//! Coarse, pointer-free call graph: a virtual or interface call may reach
//! the dispatch target of every subtype of its declared class. Strictly less
//! precise than the points-to call graph; never consulted by the solver.
//!
//! # References
//! - Dean, Grove & Chambers "Optimization of Object-Oriented Programs Using
//!   Static Class Hierarchy Analysis" (ECOOP 1995)

use crate::features::points_to::domain::{CallGraph, Edge};
use crate::features::program::domain::{CallKind, Invoke, MethodId, Program, StmtId};
use crate::features::program::infrastructure::ClassHierarchy;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use tracing::{debug, info};

pub struct ChaBuilder<'p> {
    hierarchy: ClassHierarchy<'p>,
}

impl<'p> ChaBuilder<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            hierarchy: ClassHierarchy::new(program),
        }
    }

    /// Call graph of everything reachable from the program entry
    pub fn build(&self) -> CallGraph<StmtId, MethodId> {
        let program = self.hierarchy.program();
        let mut call_graph = CallGraph::new();
        let mut queue = VecDeque::new();

        call_graph.add_entry_method(program.entry());
        queue.push_back(program.entry());

        while let Some(method) = queue.pop_front() {
            let Some(body) = program.method(method).body.as_ref() else {
                continue;
            };
            for &sid in &body.stmts {
                let Some(invoke) = program.stmt(sid).as_invoke() else {
                    continue;
                };
                for callee in self.resolve(invoke) {
                    if call_graph.add_edge(Edge::new(invoke.kind, sid, callee)) {
                        debug!("cha edge: {} -> {}", sid, program.method_signature(callee));
                    }
                    if call_graph.add_reachable_method(callee) {
                        queue.push_back(callee);
                    }
                }
            }
        }

        info!(
            "CHA call graph: {} reachable methods, {} edges",
            call_graph.num_reachable_methods(),
            call_graph.num_edges()
        );
        call_graph
    }

    /// Every non-abstract target `invoke` may reach
    pub fn resolve(&self, invoke: &Invoke) -> Vec<MethodId> {
        let program = self.hierarchy.program();
        let concrete = |m: &MethodId| !program.method(*m).is_abstract;
        let method_ref = &invoke.method_ref;

        match invoke.kind {
            CallKind::Static | CallKind::Special => self
                .hierarchy
                .resolve_method(method_ref)
                .filter(concrete)
                .into_iter()
                .collect(),
            CallKind::Virtual | CallKind::Interface => {
                let subsignature = &method_ref.subsignature;
                let mut memo = FxHashMap::default();
                let mut seen = FxHashSet::default();
                self.hierarchy
                    .all_subtypes(method_ref.class)
                    .into_iter()
                    .filter_map(|c| {
                        self.hierarchy
                            .concrete_in_chain(c, subsignature, &mut memo)
                            .or_else(|| self.hierarchy.dispatch(c, subsignature))
                    })
                    .filter(concrete)
                    .filter(|m| seen.insert(*m))
                    .collect()
            }
            CallKind::Dynamic => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::program::domain::MethodRef;
    use crate::features::program::infrastructure::{MethodKind, ProgramBuilder};

    #[test]
    fn test_virtual_call_reaches_all_overrides() {
        // abstract A.m; B, C extend A and override m; D extends C
        let mut b = ProgramBuilder::new();
        let a = b.add_class("A", None);
        b.set_abstract(a);
        let bc = b.add_class("B", Some(a));
        let c = b.add_class("C", Some(a));
        let d = b.add_class("D", Some(c));
        b.add_method(a, "void m()", MethodKind::Abstract);
        let b_m = b.add_method(bc, "void m()", MethodKind::Instance);
        let c_m = b.add_method(c, "void m()", MethodKind::Instance);
        let _ = d;

        let main = b.add_method(a, "void main()", MethodKind::Static);
        let x = b.add_var(main, "x");
        let site = b.invoke(
            main,
            Invoke::new(CallKind::Virtual, MethodRef::new(a, "void m()")).with_receiver(x),
        );
        b.set_entry(main);
        let program = b.build().unwrap();

        let cg = ChaBuilder::new(&program).build();
        let mut callees: Vec<_> = cg.callees_of(site).collect();
        callees.sort();
        assert_eq!(callees, vec![b_m, c_m]);
        assert_eq!(cg.num_reachable_methods(), 3);
    }

    #[test]
    fn test_dynamic_call_has_no_targets() {
        let mut b = ProgramBuilder::new();
        let a = b.add_class("A", None);
        let main = b.add_method(a, "void main()", MethodKind::Static);
        b.add_method(a, "void f()", MethodKind::Static);
        let site = b.invoke(main, Invoke::new(CallKind::Dynamic, MethodRef::new(a, "void f()")));
        b.set_entry(main);
        let program = b.build().unwrap();

        let cg = ChaBuilder::new(&program).build();
        assert_eq!(cg.callees_of(site).count(), 0);
        assert_eq!(cg.reachable_methods(), &[main]);
    }
}

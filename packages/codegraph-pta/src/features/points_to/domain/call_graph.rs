//! Call graph
//!
//! Generic over call-site and method handles so the same structure serves the
//! context-sensitive graph (`CSCallSiteId`, `CSMethodId`), its
//! context-insensitive projection and the CHA graph (`StmtId`, `MethodId`).
//! Append-only.

use crate::features::program::domain::CallKind;
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::Hash;

/// Resolved call from a call site to a callee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge<C, M> {
    pub kind: CallKind,
    pub call_site: C,
    pub callee: M,
}

impl<C, M> Edge<C, M> {
    pub fn new(kind: CallKind, call_site: C, callee: M) -> Self {
        Self {
            kind,
            call_site,
            callee,
        }
    }
}

/// Reachable methods plus call edges, deduplicated on (call site, callee)
#[derive(Debug, Clone)]
pub struct CallGraph<C, M> {
    entry_methods: Vec<M>,
    reachable: FxHashSet<M>,
    reachable_order: Vec<M>,
    edges: Vec<Edge<C, M>>,
    edge_set: FxHashSet<(C, M)>,
    out_edges: FxHashMap<C, Vec<usize>>,
    in_edges: FxHashMap<M, Vec<usize>>,
}

impl<C, M> Default for CallGraph<C, M>
where
    C: Copy + Eq + Hash,
    M: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C, M> CallGraph<C, M>
where
    C: Copy + Eq + Hash,
    M: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            entry_methods: Vec::new(),
            reachable: FxHashSet::default(),
            reachable_order: Vec::new(),
            edges: Vec::new(),
            edge_set: FxHashSet::default(),
            out_edges: FxHashMap::default(),
            in_edges: FxHashMap::default(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Mutation (monotone)
    // ═══════════════════════════════════════════════════════════════════════

    /// Register an entry method; entries are also reachable
    pub fn add_entry_method(&mut self, method: M) {
        if !self.entry_methods.contains(&method) {
            self.entry_methods.push(method);
        }
        self.add_reachable_method(method);
    }

    /// Returns true if `method` was not yet reachable
    pub fn add_reachable_method(&mut self, method: M) -> bool {
        if self.reachable.insert(method) {
            self.reachable_order.push(method);
            true
        } else {
            false
        }
    }

    /// Returns true if the (call site, callee) pair is new
    pub fn add_edge(&mut self, edge: Edge<C, M>) -> bool {
        if !self.edge_set.insert((edge.call_site, edge.callee)) {
            return false;
        }
        let index = self.edges.len();
        self.out_edges.entry(edge.call_site).or_default().push(index);
        self.in_edges.entry(edge.callee).or_default().push(index);
        self.edges.push(edge);
        true
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════

    pub fn entry_methods(&self) -> &[M] {
        &self.entry_methods
    }

    #[inline]
    pub fn contains(&self, method: M) -> bool {
        self.reachable.contains(&method)
    }

    /// Reachable methods in discovery order
    pub fn reachable_methods(&self) -> &[M] {
        &self.reachable_order
    }

    pub fn has_edge(&self, call_site: C, callee: M) -> bool {
        self.edge_set.contains(&(call_site, callee))
    }

    pub fn edges(&self) -> &[Edge<C, M>] {
        &self.edges
    }

    pub fn edges_out_of(&self, call_site: C) -> impl Iterator<Item = &Edge<C, M>> + '_ {
        self.out_edges
            .get(&call_site)
            .into_iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }

    pub fn edges_into(&self, callee: M) -> impl Iterator<Item = &Edge<C, M>> + '_ {
        self.in_edges
            .get(&callee)
            .into_iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }

    pub fn callees_of(&self, call_site: C) -> impl Iterator<Item = M> + '_ {
        self.edges_out_of(call_site).map(|e| e.callee)
    }

    pub fn callers_of(&self, callee: M) -> impl Iterator<Item = C> + '_ {
        self.edges_into(callee).map(|e| e.call_site)
    }

    pub fn num_reachable_methods(&self) -> usize {
        self.reachable_order.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Export
    // ═══════════════════════════════════════════════════════════════════════

    /// Method-level petgraph view: one node per method, one edge per call
    /// edge from the call site's container to the callee
    pub fn to_petgraph(&self, container_of: impl Fn(C) -> M) -> DiGraph<M, CallKind> {
        let mut graph = DiGraph::new();
        let mut nodes: FxHashMap<M, NodeIndex> = FxHashMap::default();

        for &m in &self.reachable_order {
            nodes.entry(m).or_insert_with(|| graph.add_node(m));
        }
        for edge in &self.edges {
            let caller = container_of(edge.call_site);
            let from = *nodes.entry(caller).or_insert_with(|| graph.add_node(caller));
            let to = *nodes.entry(edge.callee).or_insert_with(|| graph.add_node(edge.callee));
            graph.add_edge(from, to, edge.kind);
        }
        graph
    }

    /// Graphviz rendering of `to_petgraph` with caller-supplied node labels
    pub fn to_dot(&self, container_of: impl Fn(C) -> M, label: impl Fn(M) -> String) -> String {
        let graph = self.to_petgraph(container_of).map(|_, &m| label(m), |_, &k| k);
        format!("{}", Dot::new(&graph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Graph = CallGraph<u32, &'static str>;

    #[test]
    fn test_edge_insertion_is_idempotent() {
        let mut cg = Graph::new();
        assert!(cg.add_edge(Edge::new(CallKind::Static, 1, "a")));
        assert!(!cg.add_edge(Edge::new(CallKind::Static, 1, "a")));
        assert!(!cg.add_edge(Edge::new(CallKind::Virtual, 1, "a")));
        assert!(cg.add_edge(Edge::new(CallKind::Virtual, 1, "b")));
        assert_eq!(cg.num_edges(), 2);
        assert_eq!(cg.callees_of(1).collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(cg.callers_of("b").collect::<Vec<_>>(), vec![1]);
        assert!(cg.has_edge(1, "b"));
        assert_eq!(cg.callees_of(9).count(), 0);
    }

    #[test]
    fn test_reachable_in_discovery_order() {
        let mut cg = Graph::new();
        cg.add_entry_method("main");
        assert!(cg.add_reachable_method("f"));
        assert!(!cg.add_reachable_method("main"));
        assert_eq!(cg.reachable_methods(), &["main", "f"]);
        assert_eq!(cg.entry_methods(), &["main"]);
        assert!(cg.contains("f"));
        assert!(!cg.contains("g"));
    }

    #[test]
    fn test_petgraph_export() {
        let mut cg = Graph::new();
        cg.add_entry_method("main");
        cg.add_reachable_method("f");
        cg.add_edge(Edge::new(CallKind::Static, 10, "f"));
        let graph = cg.to_petgraph(|_| "main");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);

        let dot = cg.to_dot(|_| "main", |m| m.to_string());
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("STATIC"));
        assert!(dot.contains("\"f\""));
    }
}

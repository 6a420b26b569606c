//! Pointer Flow Graph
//!
//! Edge `s → t` is the inclusion constraint pts(s) ⊆ pts(t). Edges are
//! added at most once per ordered pair and never removed.

use crate::features::points_to::domain::PointerId;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Default)]
pub struct PointerFlowGraph {
    succs: FxHashMap<PointerId, Vec<PointerId>>,
    edge_set: FxHashSet<(PointerId, PointerId)>,
}

impl PointerFlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the edge is new
    pub fn add_edge(&mut self, source: PointerId, target: PointerId) -> bool {
        if !self.edge_set.insert((source, target)) {
            return false;
        }
        self.succs.entry(source).or_default().push(target);
        true
    }

    pub fn has_edge(&self, source: PointerId, target: PointerId) -> bool {
        self.edge_set.contains(&(source, target))
    }

    /// Targets one edge away from `pointer`, in insertion order
    pub fn successors_of(&self, pointer: PointerId) -> &[PointerId] {
        self.succs.get(&pointer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn num_edges(&self) -> usize {
        self.edge_set.len()
    }
}

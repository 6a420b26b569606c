//! Contexts as interned, k-limited element sequences

use super::handles::{ContextId, ObjId};
use crate::features::program::domain::{ClassId, StmtId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One element of a context string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContextElem {
    /// Call site (call-site sensitivity)
    CallSite(StmtId),

    /// Receiver allocation site (object sensitivity)
    Object(ObjId),

    /// Class enclosing the receiver's allocation site (type sensitivity)
    Type(ClassId),
}

impl fmt::Display for ContextElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextElem::CallSite(s) => write!(f, "{}", s),
            ContextElem::Object(o) => write!(f, "{}", o),
            ContextElem::Type(c) => write!(f, "{}", c),
        }
    }
}

/// Interning pool for contexts
///
/// Structurally equal element sequences always map to the same `ContextId`,
/// so contexts compare by handle.
#[derive(Debug, Clone)]
pub struct ContextPool {
    contexts: Vec<Vec<ContextElem>>,
    index: FxHashMap<Vec<ContextElem>, ContextId>,
}

impl Default for ContextPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextPool {
    pub fn new() -> Self {
        let mut index = FxHashMap::default();
        index.insert(Vec::new(), ContextId::EMPTY);
        Self {
            contexts: vec![Vec::new()],
            index,
        }
    }

    /// Intern an element sequence (oldest first)
    pub fn intern(&mut self, elems: Vec<ContextElem>) -> ContextId {
        if let Some(&id) = self.index.get(&elems) {
            return id;
        }
        let id = ContextId::new(self.contexts.len());
        self.contexts.push(elems.clone());
        self.index.insert(elems, id);
        id
    }

    #[inline]
    pub fn elems(&self, ctx: ContextId) -> &[ContextElem] {
        &self.contexts[ctx.index()]
    }

    #[inline]
    pub fn depth(&self, ctx: ContextId) -> usize {
        self.elems(ctx).len()
    }

    /// Number of distinct contexts, the empty one included
    #[inline]
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// `parent + elem`, keeping only the most recent `limit` elements
    pub fn append(&mut self, parent: ContextId, elem: ContextElem, limit: usize) -> ContextId {
        if limit == 0 {
            return ContextId::EMPTY;
        }
        let mut elems = self.elems(parent).to_vec();
        elems.push(elem);
        if elems.len() > limit {
            elems.drain(..elems.len() - limit);
        }
        self.intern(elems)
    }

    /// Keep only the most recent `limit` elements of `ctx`
    pub fn truncate(&mut self, ctx: ContextId, limit: usize) -> ContextId {
        let elems = self.elems(ctx);
        if elems.len() <= limit {
            return ctx;
        }
        let kept = elems[elems.len() - limit..].to_vec();
        self.intern(kept)
    }

    /// `[e1, e2]` rendering
    pub fn render(&self, ctx: ContextId) -> String {
        let parts: Vec<String> = self.elems(ctx).iter().map(|e| e.to_string()).collect();
        format!("[{}]", parts.join(", "))
    }
}

//! Domain models for pointer analysis

pub mod call_graph;
pub mod context;
pub mod element;
pub mod handles;
pub mod obj;
pub mod points_to_set;
pub mod sparse_bitmap;

pub use call_graph::{CallGraph, Edge};
pub use context::{ContextElem, ContextPool};
pub use element::{CSCallSite, CSMethod, CSObj, Pointer};
pub use handles::{CSCallSiteId, CSMethodId, CSObjId, ContextId, ObjId, PointerId};
pub use obj::Obj;
pub use points_to_set::PointsToSet;
pub use sparse_bitmap::SparseBitmap;

//! # Points-to Analysis
//!
//! Inclusion-based, context-sensitive pointer analysis for object-oriented
//! programs with on-the-fly call graph construction:
//! - **Pointer Flow Graph**: subset constraints between pointers
//! - **Delta propagation**: each work-list entry carries only new objects
//! - **Pluggable contexts**: insensitive, k-call-site, k-object, k-type
//! - **CHA**: coarse call graph for clients without points-to facts
//!
//! ## Usage
//! ```text
//! use codegraph_pta::features::points_to::PointerAnalyzer;
//!
//! let analyzer = PointerAnalyzer::new(PtaConfig::default())?;
//! let result = analyzer.analyze(&program)?;
//! let objs = result.points_to(y);
//! let callees = result.callees_of(call_site);
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-exports for public API
pub use application::{build_cha_call_graph, PointerAnalysisResult, PointerAnalyzer, PtaStats, PtaSummary};
pub use domain::{
    CSCallSite, CSCallSiteId, CSMethod, CSMethodId, CSObj, CSObjId, CallGraph, ContextElem, ContextId,
    ContextPool, Edge, Obj, ObjId, Pointer, PointerId, PointsToSet,
};
pub use ports::{ContextSelector, HeapModel, PointsToQuery};
// Re-export infrastructure (internal use - prefer application layer)
#[doc(hidden)]
pub use infrastructure::{
    selector_for, AllocationSiteHeapModel, ChaBuilder, InsensitiveSelector, KCallSiteSelector, KObjectSelector,
    KTypeSelector, Solver,
};

/*
 * Codegraph PTA - Context-Sensitive Pointer Analysis
 *
 * Feature-First Hexagonal Architecture:
 * - config/    : Presets, YAML loading, validation
 * - features/  : Vertical slices (program → points_to)
 * - errors     : Crate-wide error type
 *
 * Analysis:
 * - Inclusion-based points-to with on-the-fly call graph
 * - Insensitive, k-call-site, k-object and k-type contexts
 * - CHA call graph for clients without points-to facts
 */

// Crate-level lint configuration
#![allow(clippy::type_complexity)] // Generic call-graph signatures
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // program::domain::program naming intentional
#![allow(clippy::should_implement_trait)] // SparseBitmap::from_iter mirrors FromIterator
#![allow(clippy::len_without_is_empty)] // Counters on append-only structures

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Configuration (presets, YAML, validation)
pub mod config;

/// Error types
pub mod errors;

/// Feature modules
pub mod features;

pub use config::{ContextSensitivity, Preset, PtaConfig, WorkListOrder};
pub use errors::{PtaError, Result};
pub use features::points_to::{
    build_cha_call_graph, CallGraph, ContextSelector, HeapModel, PointerAnalysisResult, PointerAnalyzer,
    PointsToQuery, PtaStats, PtaSummary,
};
pub use features::program::{
    CallKind, ClassHierarchy, ClassId, FieldId, FieldRef, Invoke, MethodId, MethodKind, MethodRef, Program,
    ProgramBuilder, Stmt, StmtId, Subsignature, Type, VarId,
};

/// Convenience imports for analysis clients
pub mod prelude {
    pub use crate::config::{ContextSensitivity, Preset, PtaConfig, Validatable, WorkListOrder};
    pub use crate::errors::{PtaError, Result};
    pub use crate::features::points_to::{
        build_cha_call_graph, ContextElem, ContextId, ObjId, PointerAnalysisResult, PointerAnalyzer,
        PointsToQuery,
    };
    pub use crate::features::program::{
        CallKind, ClassId, FieldId, FieldRef, Invoke, MethodId, MethodKind, MethodRef, Program, ProgramBuilder,
        StmtId, Type, VarId,
    };
}

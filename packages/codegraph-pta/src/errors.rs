//! Error types for codegraph-pta
//!
//! Provides unified error handling across the crate.
//!
//! Only upstream contract violations are errors. Unresolvable call targets
//! and duplicate edge/fact insertions are normal analysis outcomes and never
//! surface here.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for pointer-analysis operations
#[derive(Debug, Error)]
pub enum PtaError {
    /// The program handed to the analysis violates an IR invariant
    #[error("Malformed IR: {0}")]
    MalformedIr(String),

    /// A field reference that names no declared field in the hierarchy
    #[error("Unresolved field reference {class}.{field}")]
    UnresolvedField { class: String, field: String },

    /// Call-site arguments do not line up with the callee's parameters
    #[error("Arity mismatch calling {callee}: {args} argument(s) for {params} parameter(s)")]
    ArityMismatch {
        callee: String,
        args: usize,
        params: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Result export failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PtaError {
    /// Create a malformed-IR error
    pub fn malformed(msg: impl Into<String>) -> Self {
        PtaError::MalformedIr(msg.into())
    }

    /// Whether this error was caused by the IR producer rather than by the caller's setup
    pub fn is_ir_violation(&self) -> bool {
        matches!(
            self,
            PtaError::MalformedIr(_) | PtaError::UnresolvedField { .. } | PtaError::ArityMismatch { .. }
        )
    }
}

/// Result type alias for pointer-analysis operations
pub type Result<T> = std::result::Result<T, PtaError>;

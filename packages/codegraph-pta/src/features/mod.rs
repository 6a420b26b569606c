//! Feature modules (vertical slices)
//!
//! - program: IR model, builder, class hierarchy
//! - points_to: context-sensitive pointer analysis with on-the-fly call graph

pub mod points_to;
pub mod program;

//! Program Feature
//!
//! The read-only IR consumed by the analyses, together with its builder and
//! the class-hierarchy oracle.
//!
//! ## Hexagonal Architecture
//! - domain: arena handles, `Stmt`, `Program`
//! - infrastructure: `ProgramBuilder`, `ClassHierarchy`

pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::{ClassHierarchy, MethodKind, ProgramBuilder};

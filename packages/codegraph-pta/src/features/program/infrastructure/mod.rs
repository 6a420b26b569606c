pub mod builder;
pub mod class_hierarchy;

pub use builder::{MethodKind, ProgramBuilder};
pub use class_hierarchy::ClassHierarchy;

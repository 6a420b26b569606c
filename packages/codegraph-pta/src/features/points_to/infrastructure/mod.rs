pub mod cha_builder;
pub mod context_selector;
pub mod cs_manager;
pub mod heap_model;
pub mod pointer_flow_graph;
pub mod solver;
pub mod work_list;

pub use cha_builder::ChaBuilder;
pub use context_selector::{selector_for, InsensitiveSelector, KCallSiteSelector, KObjectSelector, KTypeSelector};
pub use cs_manager::CSManager;
pub use heap_model::AllocationSiteHeapModel;
pub use pointer_flow_graph::PointerFlowGraph;
pub use solver::{Solver, SolverOutput};
pub use work_list::WorkList;

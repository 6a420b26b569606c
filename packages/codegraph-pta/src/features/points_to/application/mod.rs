pub mod analyzer;
pub mod result;

pub use analyzer::{build_cha_call_graph, PointerAnalyzer};
pub use result::{CallEdgeSummary, PointerAnalysisResult, PtaStats, PtaSummary};

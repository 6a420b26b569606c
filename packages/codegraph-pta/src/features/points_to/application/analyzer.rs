//! High-Level Pointer Analyzer
//!
//! Validates the configuration, wires the context selector and heap model
//! into a solver, and wraps the solver output into a queryable result.
//!
//! # Usage
//! ```text
//! let program = builder.build()?;
//! let analyzer = PointerAnalyzer::new(PtaConfig::from_preset(Preset::Balanced))?;
//! let result = analyzer.analyze(&program)?;
//! assert!(result.may_alias(x, y));
//! ```

use super::result::PointerAnalysisResult;
use crate::config::{Preset, PtaConfig, Validatable};
use crate::errors::Result;
use crate::features::points_to::domain::CallGraph;
use crate::features::points_to::infrastructure::{selector_for, AllocationSiteHeapModel, ChaBuilder, Solver};
use crate::features::points_to::ports::{ContextSelector, HeapModel};
use crate::features::program::domain::{MethodId, Program, StmtId};
use std::time::Instant;
use tracing::info;

/// Entry point for pointer analysis
#[derive(Debug, Clone)]
pub struct PointerAnalyzer {
    config: PtaConfig,
}

impl PointerAnalyzer {
    /// Create an analyzer; fails on an invalid configuration
    pub fn new(config: PtaConfig) -> Result<Self> {
        Ok(Self {
            config: config.validated()?,
        })
    }

    pub fn from_preset(preset: Preset) -> Result<Self> {
        Self::new(PtaConfig::from_preset(preset))
    }

    pub fn config(&self) -> &PtaConfig {
        &self.config
    }

    /// Analyze with the configured context sensitivity and the
    /// allocation-site heap model
    pub fn analyze(&self, program: &Program) -> Result<PointerAnalysisResult> {
        self.analyze_with(
            program,
            selector_for(self.config.sensitivity),
            Box::new(AllocationSiteHeapModel::new()),
        )
    }

    /// Analyze with caller-supplied policies
    pub fn analyze_with(
        &self,
        program: &Program,
        selector: Box<dyn ContextSelector>,
        heap_model: Box<dyn HeapModel>,
    ) -> Result<PointerAnalysisResult> {
        let start = Instant::now();
        let sensitivity = selector.name();
        info!(
            "pointer analysis ({}) started: {} classes, {} methods, {} statements",
            sensitivity,
            program.num_classes(),
            program.num_methods(),
            program.num_stmts()
        );

        let output = Solver::new(program, selector, heap_model, self.config.clone()).solve()?;
        let result = PointerAnalysisResult::new(output, sensitivity, start.elapsed().as_secs_f64() * 1000.0);

        let stats = result.stats();
        info!(
            "pointer analysis ({}) finished in {:.2}ms: {} reachable methods ({} with contexts), {} objects, {} pointers, {} PFG edges, {} call edges",
            stats.sensitivity,
            stats.duration_ms,
            stats.reachable_methods,
            stats.cs_methods,
            stats.objects,
            stats.pointers,
            stats.pfg_edges,
            stats.call_edges
        );
        Ok(result)
    }
}

/// Coarse class-hierarchy call graph of `program`
pub fn build_cha_call_graph(program: &Program) -> CallGraph<StmtId, MethodId> {
    ChaBuilder::new(program).build()
}

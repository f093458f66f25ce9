//! Category analyzers
//!
//! One analyzer per scoring category, all implementing the `Analyzer`
//! trait. The orchestrator owns the registry; nothing here runs on its own.

pub mod base;

mod completeness;
mod devexp;
mod performance;
mod quality;
mod security;
mod structure;
mod testing;

pub use base::{Analyzer, AnalyzerContext, ProgressCallback, CANCELLED};

/// All built-in analyzers in registration order.
///
/// Registration order defines output ordering, so it must match
/// `CategoryKey::all()`.
pub fn default_registry() -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(structure::StructureAnalyzer),
        Box::new(quality::QualityAnalyzer),
        Box::new(performance::PerformanceAnalyzer),
        Box::new(testing::TestingAnalyzer),
        Box::new(security::SecurityAnalyzer),
        Box::new(devexp::DevexpAnalyzer),
        Box::new(completeness::CompletenessAnalyzer),
    ]
}

//! Analysis pipeline orchestration.

mod orchestrator;
mod report;

pub use orchestrator::AnalysisPipeline;
pub use report::{AnalysisReport, StreamOverview};

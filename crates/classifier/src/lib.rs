//! # Classifier
//!
//! Phase classification and run-level aggregation.
//!
//! Responsibilities:
//! - Assign a `PhaseStatus` to every paired sample
//! - Status breakdown and phase error statistics
//! - Link-metric statistics per status bucket
//! - Outlier analysis of poorly timed cycles against link quality
//!
//! ## Usage Example
//!
//! ```ignore
//! use classifier::{analyze, PhaseAggregator, PhaseClassifier};
//!
//! let classifier = PhaseClassifier::new(config.classifier.clone());
//! let classified = analyze(&pairs, &classifier);
//!
//! let summary = PhaseAggregator::summarize(config.correlation.clone(), &classified);
//! println!("{summary}");
//! ```

mod aggregate;
mod classify;
mod correlation;
mod report;

// Re-exports
pub use aggregate::{AnalysisSummary, PhaseAggregator, PhaseErrorSummary, StatusBreakdown};
pub use classify::{analyze, PhaseClassifier};
pub use contracts::{ClassifiedSample, PhaseStatus};
pub use correlation::{
    Bucket, BucketMetrics, CorrelationReport, LinkVerdict, MetricStats, OutlierAnalysis,
    OutlierFinding,
};

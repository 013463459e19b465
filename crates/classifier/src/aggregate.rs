//! Run-level aggregation of classified samples

use contracts::{ClassifiedSample, CorrelationThresholds, PhaseStatus};
use observability::{RunningStats, StatsSummary};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::correlation::{BucketAccumulator, CorrelationReport, OutlierAnalysis, OutlierCounter};

/// Phase error statistics (ms); `std_dev` needs at least two samples
pub type PhaseErrorSummary = StatsSummary;

/// Per-status counts over all pairs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub total: usize,
    pub good: usize,
    pub warning: usize,
    pub overlap: usize,
    pub drift: usize,
}

impl StatusBreakdown {
    pub fn count(&self, status: PhaseStatus) -> usize {
        match status {
            PhaseStatus::Good => self.good,
            PhaseStatus::Warning => self.warning,
            PhaseStatus::Overlap => self.overlap,
            PhaseStatus::Drift => self.drift,
        }
    }

    /// Share of all pairs in percent; 0 for an empty run
    pub fn percent(&self, status: PhaseStatus) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.count(status) as f64 / self.total as f64
        }
    }

    /// Overlap and Drift together
    pub fn poor(&self) -> usize {
        self.overlap + self.drift
    }

    fn record(&mut self, status: PhaseStatus) {
        self.total += 1;
        match status {
            PhaseStatus::Good => self.good += 1,
            PhaseStatus::Warning => self.warning += 1,
            PhaseStatus::Overlap => self.overlap += 1,
            PhaseStatus::Drift => self.drift += 1,
        }
    }
}

/// Aggregate statistics of a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub status: StatusBreakdown,
    pub phase_error: PhaseErrorSummary,
    pub correlation: CorrelationReport,
    pub outliers: OutlierAnalysis,
}

/// Streaming aggregator over classified samples
#[derive(Debug, Clone)]
pub struct PhaseAggregator {
    status: StatusBreakdown,
    phase_error: RunningStats,
    by_status: [BucketAccumulator; 4],
    poor: BucketAccumulator,
    outliers: OutlierCounter,
}

impl PhaseAggregator {
    pub fn new(thresholds: CorrelationThresholds) -> Self {
        Self {
            status: StatusBreakdown::default(),
            phase_error: RunningStats::default(),
            by_status: Default::default(),
            poor: BucketAccumulator::default(),
            outliers: OutlierCounter::new(thresholds),
        }
    }

    pub fn push(&mut self, sample: &ClassifiedSample) {
        let status = sample.status;
        let metrics = &sample.sample.metrics;

        self.status.record(status);
        self.phase_error.push(sample.sample.phase_error_ms as f64);
        self.by_status[status.index()].push(metrics);

        if status.is_poor() {
            self.poor.push(metrics);
            self.outliers.push(metrics);
        }
    }

    pub fn finish(self) -> AnalysisSummary {
        let [good, warning, overlap, drift] = &self.by_status;
        let correlation = CorrelationReport {
            good: good.finish(),
            warning: warning.finish(),
            overlap: overlap.finish(),
            drift: drift.finish(),
            poor: self.poor.finish(),
        };

        let summary = AnalysisSummary {
            status: self.status,
            phase_error: self.phase_error.summary(),
            correlation,
            outliers: self.outliers.finish(),
        };

        debug!(
            pairs = summary.status.total,
            poor = summary.status.poor(),
            verdict = ?summary.outliers.verdict,
            "aggregation finished"
        );
        summary
    }

    /// Aggregate a full sequence of classified samples
    #[instrument(name = "aggregate_samples", skip_all, fields(samples = samples.len()))]
    pub fn summarize(
        thresholds: CorrelationThresholds,
        samples: &[ClassifiedSample],
    ) -> AnalysisSummary {
        let mut aggregator = Self::new(thresholds);
        for sample in samples {
            aggregator.push(sample);
        }
        aggregator.finish()
    }
}

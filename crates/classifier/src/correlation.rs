//! Link-quality correlation
//!
//! Per-bucket metric statistics and the outlier analysis of poorly timed
//! cycles. Absent metric values are excluded from that metric's statistics,
//! and poor cycles without any metric are left out of the outlier fractions.

use contracts::{CorrelationThresholds, LinkMetrics, MetricKind, PhaseStatus};
use observability::RunningStats;
use serde::{Deserialize, Serialize};

/// Coarse status bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Good,
    Warning,
    /// Overlap and Drift
    Poor,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Good, Bucket::Warning, Bucket::Poor];

    pub fn from_status(status: PhaseStatus) -> Self {
        match status {
            PhaseStatus::Good => Bucket::Good,
            PhaseStatus::Warning => Bucket::Warning,
            PhaseStatus::Overlap | PhaseStatus::Drift => Bucket::Poor,
        }
    }
}

/// Statistics of one metric over one bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricStats {
    fn from_running(stats: &RunningStats) -> Option<Self> {
        Some(Self {
            count: stats.count() as usize,
            mean: stats.mean()?,
            min: stats.min()?,
            max: stats.max()?,
        })
    }
}

/// Metric statistics of one bucket; `None` when no sample carried the metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketMetrics {
    /// Samples in the bucket
    pub samples: usize,

    /// Samples carrying at least one metric
    pub with_metrics: usize,

    pub signal_strength: Option<MetricStats>,
    pub round_trip_time: Option<MetricStats>,
    pub sync_quality: Option<MetricStats>,
}

impl BucketMetrics {
    pub fn get(&self, kind: MetricKind) -> Option<&MetricStats> {
        match kind {
            MetricKind::SignalStrength => self.signal_strength.as_ref(),
            MetricKind::RoundTripTime => self.round_trip_time.as_ref(),
            MetricKind::SyncQuality => self.sync_quality.as_ref(),
        }
    }
}

/// Metric statistics per status and per coarse bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub good: BucketMetrics,
    pub warning: BucketMetrics,
    pub overlap: BucketMetrics,
    pub drift: BucketMetrics,
    /// Overlap and Drift together
    pub poor: BucketMetrics,
}

impl CorrelationReport {
    pub fn status(&self, status: PhaseStatus) -> &BucketMetrics {
        match status {
            PhaseStatus::Good => &self.good,
            PhaseStatus::Warning => &self.warning,
            PhaseStatus::Overlap => &self.overlap,
            PhaseStatus::Drift => &self.drift,
        }
    }

    pub fn bucket(&self, bucket: Bucket) -> &BucketMetrics {
        match bucket {
            Bucket::Good => &self.good,
            Bucket::Warning => &self.warning,
            Bucket::Poor => &self.poor,
        }
    }

    /// True when any sample of the run carried a metric
    pub fn has_metrics(&self) -> bool {
        PhaseStatus::ALL
            .iter()
            .any(|status| self.status(*status).with_metrics > 0)
    }
}

/// Outlier count of one link signal within the Poor bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierFinding {
    pub kind: MetricKind,

    /// Poor samples past the threshold
    pub count: usize,

    /// `count / poor_with_metrics`
    pub fraction: f64,

    /// Fraction strictly above the correlation threshold
    pub correlated: bool,
}

impl OutlierFinding {
    /// Operator-facing label of the outlier condition
    pub fn label(&self) -> &'static str {
        match self.kind {
            MetricKind::SignalStrength => "weak signal",
            MetricKind::RoundTripTime => "high round-trip time",
            MetricKind::SyncQuality => "low sync quality",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self.kind {
            MetricKind::SignalStrength => {
                "weak signal correlates with timing errors; consider a TX power boost or antenna improvement"
            }
            MetricKind::RoundTripTime => {
                "high round-trip time correlates with timing errors; consider tuning connection parameters"
            }
            MetricKind::SyncQuality => {
                "low sync quality correlates with timing errors; reject low-quality sync beacons as outliers"
            }
        }
    }
}

/// Overall attribution of the poorly timed cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkVerdict {
    /// No Overlap or Drift samples
    NoPoorSamples,
    /// At least one link signal is correlated
    LinkRelated,
    /// Most poor cycles show a healthy link; likely the sync/control algorithm
    NotLinkRelated,
    Inconclusive,
}

/// Outlier analysis over the Poor bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierAnalysis {
    pub poor_samples: usize,

    /// Poor samples carrying at least one metric; denominator of every fraction
    pub poor_with_metrics: usize,

    /// Poor samples with metrics and none of the outlier conditions
    pub clean_samples: usize,

    /// One finding per metric kind
    pub findings: Vec<OutlierFinding>,

    pub verdict: LinkVerdict,
}

impl OutlierAnalysis {
    pub fn finding(&self, kind: MetricKind) -> Option<&OutlierFinding> {
        self.findings.iter().find(|finding| finding.kind == kind)
    }

    pub fn correlated(&self) -> impl Iterator<Item = &OutlierFinding> {
        self.findings.iter().filter(|finding| finding.correlated)
    }
}

/// Accumulates metric statistics for one bucket
#[derive(Debug, Clone, Default)]
pub(crate) struct BucketAccumulator {
    samples: usize,
    with_metrics: usize,
    stats: [RunningStats; 3],
}

impl BucketAccumulator {
    pub(crate) fn push(&mut self, metrics: &LinkMetrics) {
        self.samples += 1;
        if metrics.any() {
            self.with_metrics += 1;
        }
        for kind in MetricKind::ALL {
            if let Some(value) = metrics.get(kind) {
                self.stats[kind.index()].push(value);
            }
        }
    }

    pub(crate) fn finish(&self) -> BucketMetrics {
        let stats = |kind: MetricKind| MetricStats::from_running(&self.stats[kind.index()]);
        BucketMetrics {
            samples: self.samples,
            with_metrics: self.with_metrics,
            signal_strength: stats(MetricKind::SignalStrength),
            round_trip_time: stats(MetricKind::RoundTripTime),
            sync_quality: stats(MetricKind::SyncQuality),
        }
    }
}

/// Counts outlier conditions over the Poor bucket
#[derive(Debug, Clone)]
pub(crate) struct OutlierCounter {
    thresholds: CorrelationThresholds,
    poor_samples: usize,
    poor_with_metrics: usize,
    clean_samples: usize,
    counts: [usize; 3],
}

impl OutlierCounter {
    pub(crate) fn new(thresholds: CorrelationThresholds) -> Self {
        Self {
            thresholds,
            poor_samples: 0,
            poor_with_metrics: 0,
            clean_samples: 0,
            counts: [0; 3],
        }
    }

    /// Whether `value` of `kind` is past its outlier threshold
    fn is_outlier(&self, kind: MetricKind, value: f64) -> bool {
        match kind {
            MetricKind::SignalStrength => value < self.thresholds.weak_signal_dbm,
            MetricKind::RoundTripTime => value > self.thresholds.high_rtt_ms,
            MetricKind::SyncQuality => value < self.thresholds.low_quality_pct,
        }
    }

    pub(crate) fn push(&mut self, metrics: &LinkMetrics) {
        self.poor_samples += 1;
        if !metrics.any() {
            return;
        }
        self.poor_with_metrics += 1;

        let mut clean = true;
        for kind in MetricKind::ALL {
            if let Some(value) = metrics.get(kind) {
                if self.is_outlier(kind, value) {
                    self.counts[kind.index()] += 1;
                    clean = false;
                }
            }
        }
        if clean {
            self.clean_samples += 1;
        }
    }

    pub(crate) fn finish(&self) -> OutlierAnalysis {
        let findings: Vec<OutlierFinding> = MetricKind::ALL
            .iter()
            .map(|kind| {
                let count = self.counts[kind.index()];
                let fraction = self.fraction(count);
                OutlierFinding {
                    kind: *kind,
                    count,
                    fraction,
                    correlated: self.poor_with_metrics > 0
                        && fraction > self.thresholds.correlated_fraction,
                }
            })
            .collect();

        let verdict = if self.poor_samples == 0 {
            LinkVerdict::NoPoorSamples
        } else if findings.iter().any(|finding| finding.correlated) {
            LinkVerdict::LinkRelated
        } else if self.poor_with_metrics > 0
            && self.fraction(self.clean_samples) > self.thresholds.link_clear_fraction
        {
            LinkVerdict::NotLinkRelated
        } else {
            LinkVerdict::Inconclusive
        };

        OutlierAnalysis {
            poor_samples: self.poor_samples,
            poor_with_metrics: self.poor_with_metrics,
            clean_samples: self.clean_samples,
            findings,
            verdict,
        }
    }

    fn fraction(&self, count: usize) -> f64 {
        if self.poor_with_metrics == 0 {
            0.0
        } else {
            count as f64 / self.poor_with_metrics as f64
        }
    }
}

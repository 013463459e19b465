//! Extraction diagnostics - Ingestion bookkeeping

use serde::{Deserialize, Serialize};

use crate::MetricKind;

/// Per-stream extraction counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Lines read
    pub lines_total: usize,

    /// Lines that matched at least one pattern
    pub matched_lines: usize,

    /// Lines skipped as unrecognized
    pub unmatched_lines: usize,

    /// Accepted period updates
    pub period_updates: usize,

    /// Activation triggers seen, before deduplication
    pub activation_triggers: usize,

    /// Inactive-phase lines rejected
    pub inactive_phase_lines: usize,

    /// Activations dropped because no period was known yet
    pub discarded_without_period: usize,

    /// Activations collapsed by `(timestamp, period)` deduplication
    pub duplicates_removed: usize,

    pub signal_strength_samples: usize,
    pub round_trip_samples: usize,
    pub sync_quality_samples: usize,
}

impl ExtractionStats {
    pub fn metric_samples(&self, kind: MetricKind) -> usize {
        match kind {
            MetricKind::SignalStrength => self.signal_strength_samples,
            MetricKind::RoundTripTime => self.round_trip_samples,
            MetricKind::SyncQuality => self.sync_quality_samples,
        }
    }

    pub fn record_metric(&mut self, kind: MetricKind) {
        match kind {
            MetricKind::SignalStrength => self.signal_strength_samples += 1,
            MetricKind::RoundTripTime => self.round_trip_samples += 1,
            MetricKind::SyncQuality => self.sync_quality_samples += 1,
        }
    }

    /// Total metric samples over all kinds
    pub fn total_metric_samples(&self) -> usize {
        MetricKind::ALL
            .iter()
            .map(|kind| self.metric_samples(*kind))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_counters() {
        let mut stats = ExtractionStats::default();
        stats.record_metric(MetricKind::RoundTripTime);
        stats.record_metric(MetricKind::RoundTripTime);
        stats.record_metric(MetricKind::SyncQuality);

        assert_eq!(stats.metric_samples(MetricKind::RoundTripTime), 2);
        assert_eq!(stats.metric_samples(MetricKind::SignalStrength), 0);
        assert_eq!(stats.total_metric_samples(), 3);
    }
}

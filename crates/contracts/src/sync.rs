//! PairedSample - Sync Engine output
//!
//! Leader/follower activation pairs and their classification.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ActivationEvent, MetricKind};

/// Carried-forward link metrics attached to a pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkMetrics {
    /// Signal strength (dBm)
    pub signal_strength: Option<f64>,

    /// Round-trip time (ms)
    pub round_trip_time: Option<f64>,

    /// Sync quality (percent)
    pub sync_quality: Option<f64>,
}

impl LinkMetrics {
    pub fn get(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::SignalStrength => self.signal_strength,
            MetricKind::RoundTripTime => self.round_trip_time,
            MetricKind::SyncQuality => self.sync_quality,
        }
    }

    pub fn set(&mut self, kind: MetricKind, value: Option<f64>) {
        match kind {
            MetricKind::SignalStrength => self.signal_strength = value,
            MetricKind::RoundTripTime => self.round_trip_time = value,
            MetricKind::SyncQuality => self.sync_quality = value,
        }
    }

    /// True when at least one metric is present
    pub fn any(&self) -> bool {
        MetricKind::ALL.iter().any(|kind| self.get(*kind).is_some())
    }
}

/// One leader activation matched with one follower activation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairedSample {
    /// Leader activation tick (ms, leader clock)
    pub leader_timestamp: i64,

    /// Leader cycle period (ms)
    pub leader_period: i64,

    /// Follower activation tick (ms, follower clock)
    pub follower_timestamp: i64,

    /// Follower cycle period (ms)
    pub follower_period: i64,

    /// `leader_timestamp + leader_period / 2`
    pub target_follower_timestamp: i64,

    /// `follower_timestamp - target_follower_timestamp`; negative = early
    pub phase_error_ms: i64,

    /// Link metrics at the follower activation (filled by enrichment)
    #[serde(default)]
    pub metrics: LinkMetrics,
}

impl PairedSample {
    /// Build a pair from its two activations; metrics start empty.
    pub fn from_events(leader: &ActivationEvent, follower: &ActivationEvent) -> Self {
        let target = leader.antiphase_target_ms();
        Self {
            leader_timestamp: leader.timestamp_ms,
            leader_period: leader.period_ms,
            follower_timestamp: follower.timestamp_ms,
            follower_period: follower.period_ms,
            target_follower_timestamp: target,
            phase_error_ms: follower.timestamp_ms.saturating_sub(target),
            metrics: LinkMetrics::default(),
        }
    }

    /// Copy of this pair with metrics attached
    pub fn with_metrics(self, metrics: LinkMetrics) -> Self {
        Self { metrics, ..self }
    }

    /// Follower activation relative to the leader activation (ms)
    pub fn follower_offset_ms(&self) -> i64 {
        self.follower_timestamp.saturating_sub(self.leader_timestamp)
    }
}

/// Timing status of one pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    /// Within the tight tolerance
    Good,
    /// Within the loose tolerance
    Warning,
    /// Follower too early; both devices may be active at once
    Overlap,
    /// Follower too late
    Drift,
}

impl PhaseStatus {
    pub const ALL: [PhaseStatus; 4] = [
        PhaseStatus::Good,
        PhaseStatus::Warning,
        PhaseStatus::Overlap,
        PhaseStatus::Drift,
    ];

    /// Overlap and Drift together form the "poor" bucket
    #[inline]
    pub fn is_poor(&self) -> bool {
        matches!(self, PhaseStatus::Overlap | PhaseStatus::Drift)
    }

    #[inline]
    pub fn index(&self) -> usize {
        match self {
            PhaseStatus::Good => 0,
            PhaseStatus::Warning => 1,
            PhaseStatus::Overlap => 2,
            PhaseStatus::Drift => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseStatus::Good => "GOOD",
            PhaseStatus::Warning => "WARNING",
            PhaseStatus::Overlap => "OVERLAP",
            PhaseStatus::Drift => "DRIFT",
        }
    }
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A paired sample after classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedSample {
    #[serde(flatten)]
    pub sample: PairedSample,
    pub status: PhaseStatus,
}

/// Aligner bookkeeping (for diagnostics)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentStats {
    /// Loop iterations performed
    pub steps: usize,

    /// Pairs whose follower lies within half a period of the target
    pub matched: usize,

    /// Extra pairs emitted on skip iterations (`pair_skipped_events`)
    pub skip_pairs: usize,

    /// Follower events attributed to an earlier leader cycle
    pub skipped_follower: usize,

    /// Leader events with no follower activation in their cycle
    pub skipped_leader: usize,

    /// Leader events left after the follower stream ran out
    pub trailing_leader: usize,

    /// Follower events left after the leader stream ran out
    pub trailing_follower: usize,

    /// Matched pairs whose follower period differs from the leader period
    pub period_mismatches: usize,
}

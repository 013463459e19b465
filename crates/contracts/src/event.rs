//! Telemetry events - Ingestion output
//!
//! Typed events extracted from one device's raw log.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One activation (active-phase start) of a device cycle.
///
/// Ordering is by `(timestamp_ms, period_ms)`, which is also the
/// deduplication key used by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActivationEvent {
    /// Device-local tick (ms), not wall-clock
    pub timestamp_ms: i64,

    /// Cycle period in effect when the activation was observed (ms, > 0)
    pub period_ms: i64,
}

impl ActivationEvent {
    pub fn new(timestamp_ms: i64, period_ms: i64) -> Self {
        Self {
            timestamp_ms,
            period_ms,
        }
    }

    /// Half of the cycle period, floored
    #[inline]
    pub fn half_period_ms(&self) -> i64 {
        self.period_ms.div_euclid(2)
    }

    /// Ideal instant for the opposite device to activate (saturating)
    #[inline]
    pub fn antiphase_target_ms(&self) -> i64 {
        self.timestamp_ms.saturating_add(self.half_period_ms())
    }
}

/// Event extracted from a single log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// Cycle period changed; applies to later activations only
    PeriodUpdate { timestamp_ms: i64, period_ms: i64 },

    /// Active phase of a cycle started
    ActivationStart(ActivationEvent),
}

impl TelemetryEvent {
    pub fn timestamp_ms(&self) -> i64 {
        match self {
            TelemetryEvent::PeriodUpdate { timestamp_ms, .. } => *timestamp_ms,
            TelemetryEvent::ActivationStart(event) => event.timestamp_ms,
        }
    }
}

/// Auxiliary link-quality signal kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Received signal strength (dBm)
    SignalStrength,
    /// Sync beacon round-trip time (ms)
    RoundTripTime,
    /// Time sync quality (percent)
    SyncQuality,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [
        MetricKind::SignalStrength,
        MetricKind::RoundTripTime,
        MetricKind::SyncQuality,
    ];

    /// Dense index, used for per-kind arrays
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            MetricKind::SignalStrength => 0,
            MetricKind::RoundTripTime => 1,
            MetricKind::SyncQuality => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::SignalStrength => "signal_strength",
            MetricKind::RoundTripTime => "round_trip_time",
            MetricKind::SyncQuality => "sync_quality",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::SignalStrength => "dBm",
            MetricKind::RoundTripTime => "ms",
            MetricKind::SyncQuality => "%",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timestamped metric observation (follower side)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub timestamp_ms: i64,
    pub kind: MetricKind,
    /// Normalized value (dBm / ms / percent)
    pub value: f64,
}

impl MetricSample {
    pub fn new(timestamp_ms: i64, kind: MetricKind, value: f64) -> Self {
        Self {
            timestamp_ms,
            kind,
            value,
        }
    }
}

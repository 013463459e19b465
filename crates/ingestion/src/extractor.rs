//! Event extractor
//!
//! Turns one device's raw log lines into an ordered activation stream and,
//! for the follower, a stream of link-metric samples.

use std::collections::BTreeSet;

use contracts::{
    ActivationEvent, DeviceRole, ExtractionStats, ExtractorConfig, MetricKind, MetricSample,
    TelemetryEvent,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{IngestionError, Result};
use crate::patterns::{LogPatterns, PhaseMatch};

/// Everything extracted from one log
#[derive(Debug, Clone)]
pub struct StreamExtraction {
    /// Stream the log was read as
    pub role: DeviceRole,

    /// Events in source order, before deduplication
    pub events: Vec<TelemetryEvent>,

    /// Final activation sequence, non-decreasing by timestamp
    pub activations: Vec<ActivationEvent>,

    /// Metric samples in source order (empty for the leader)
    pub metrics: Vec<MetricSample>,

    /// Role the firmware announced in this log, if any
    pub announced_role: Option<DeviceRole>,

    pub stats: ExtractionStats,
}

impl StreamExtraction {
    /// True when the firmware announced a role other than the one the log was read as
    pub fn role_conflict(&self) -> bool {
        self.announced_role.is_some_and(|announced| announced != self.role)
    }
}

/// Line-by-line event extractor
#[derive(Debug, Clone)]
pub struct EventExtractor {
    config: ExtractorConfig,
    patterns: LogPatterns,
}

impl EventExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        Ok(Self {
            config,
            patterns: LogPatterns::new()?,
        })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract a whole log given as text
    pub fn extract_text(&self, text: &str, role: DeviceRole) -> Result<StreamExtraction> {
        self.extract(text.lines(), role)
    }

    /// Extract a stream from decoded log lines.
    ///
    /// Returns [`IngestionError::EmptyStream`] when no activation survives.
    #[instrument(
        name = "extract_stream",
        skip(self, lines),
        fields(role = %role, dedup = self.config.deduplicate_activations)
    )]
    pub fn extract<I, S>(&self, lines: I, role: DeviceRole) -> Result<StreamExtraction>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = LineState::new(role);

        for raw in lines {
            self.process_line(raw.as_ref(), &mut state);
        }

        let extraction = state.finish(self.config.deduplicate_activations);
        observability::record_extraction(role, &extraction.stats, extraction.activations.len());

        if extraction.activations.is_empty() {
            warn!(
                lines = extraction.stats.lines_total,
                discarded = extraction.stats.discarded_without_period,
                "no activation events extracted"
            );
            return Err(IngestionError::EmptyStream { role });
        }

        info!(
            lines = extraction.stats.lines_total,
            activations = extraction.activations.len(),
            metric_samples = extraction.metrics.len(),
            duplicates = extraction.stats.duplicates_removed,
            "stream extracted"
        );
        Ok(extraction)
    }

    fn process_line(&self, raw: &str, state: &mut LineState) {
        state.stats.lines_total += 1;

        let line = self.patterns.clean(raw);
        if line.is_empty() {
            state.stats.unmatched_lines += 1;
            return;
        }

        let tick = self.patterns.tick(&line);
        if let Some(tick) = tick {
            state.last_tick = tick;
        }

        let mut matched = false;

        if let Some(announced) = self.patterns.announced_role(&line) {
            matched = true;
            if state.announced_role.is_none() {
                debug!(announced = %announced, "role announcement found");
                state.announced_role = Some(announced);
            }
        }

        if let Some(period_ms) = self.patterns.period(&line) {
            matched = true;
            state.apply_period(period_ms, tick.unwrap_or(state.last_tick));
        }

        if let Some(tick) = tick {
            match self.patterns.phase(&line) {
                Some(PhaseMatch::Active(trigger)) => {
                    matched = true;
                    state.stats.activation_triggers += 1;
                    match state.current_period {
                        Some(period_ms) => {
                            let event = ActivationEvent::new(tick, period_ms);
                            state.events.push(TelemetryEvent::ActivationStart(event));
                            state.activations.push(event);
                        }
                        None => {
                            state.stats.discarded_without_period += 1;
                            debug!(tick, ?trigger, "activation before any period update discarded");
                        }
                    }
                }
                Some(PhaseMatch::Inactive) => {
                    matched = true;
                    state.stats.inactive_phase_lines += 1;
                }
                None => {}
            }

            if state.role == DeviceRole::Follower {
                matched |= self.extract_metrics(&line, tick, state);
            }
        }

        if matched {
            state.stats.matched_lines += 1;
        } else {
            state.stats.unmatched_lines += 1;
        }
    }

    /// Record at most one sample per metric kind from this line
    fn extract_metrics(&self, line: &str, tick: i64, state: &mut LineState) -> bool {
        let mut found = false;
        for kind in MetricKind::ALL {
            if let Some(raw) = self.patterns.metric(line, kind) {
                let value = self.normalize(kind, raw);
                state.metrics.push(MetricSample::new(tick, kind, value));
                state.stats.record_metric(kind);
                found = true;
            }
        }
        found
    }

    /// Convert raw readings to the sample units (dBm / ms / percent)
    fn normalize(&self, kind: MetricKind, raw: f64) -> f64 {
        match kind {
            MetricKind::RoundTripTime if raw > self.config.rtt_microsecond_threshold => {
                raw / 1000.0
            }
            _ => raw,
        }
    }
}

/// Mutable state threaded through one extraction pass
struct LineState {
    role: DeviceRole,
    current_period: Option<i64>,
    last_tick: i64,
    announced_role: Option<DeviceRole>,
    events: Vec<TelemetryEvent>,
    activations: Vec<ActivationEvent>,
    metrics: Vec<MetricSample>,
    stats: ExtractionStats,
}

impl LineState {
    fn new(role: DeviceRole) -> Self {
        Self {
            role,
            current_period: None,
            last_tick: 0,
            announced_role: None,
            events: Vec::new(),
            activations: Vec::new(),
            metrics: Vec::new(),
            stats: ExtractionStats::default(),
        }
    }

    fn apply_period(&mut self, period_ms: i64, timestamp_ms: i64) {
        if period_ms <= 0 {
            debug!(timestamp_ms, "zero cycle period ignored");
            return;
        }
        if self.current_period != Some(period_ms) {
            debug!(
                timestamp_ms,
                period_ms,
                previous = ?self.current_period,
                "cycle period updated"
            );
        }
        self.current_period = Some(period_ms);
        self.stats.period_updates += 1;
        self.events.push(TelemetryEvent::PeriodUpdate {
            timestamp_ms,
            period_ms,
        });
    }

    fn finish(mut self, deduplicate: bool) -> StreamExtraction {
        let emitted = self.activations.len();

        let activations = if deduplicate {
            // BTreeSet order is (timestamp, period): already sorted by timestamp
            let unique: BTreeSet<ActivationEvent> = self.activations.into_iter().collect();
            unique.into_iter().collect()
        } else {
            let mut all = self.activations;
            all.sort_by_key(|event| event.timestamp_ms);
            all
        };
        self.stats.duplicates_removed = emitted - activations.len();

        StreamExtraction {
            role: self.role,
            events: self.events,
            activations,
            metrics: self.metrics,
            announced_role: self.announced_role,
            stats: self.stats,
        }
    }
}

//! Stream aligner.
//!
//! The two devices free-run on unrelated clocks, so pairs are inferred from
//! relative timing. A follower activation belongs to a leader cycle when it
//! lies within half a leader period of that cycle's antiphase target.

use contracts::{ActivationEvent, AlignerConfig, AlignmentStats, PairedSample};
use serde::Serialize;
use tracing::{debug, instrument, trace, warn};

use crate::metric_index::MetricIndex;

/// Aligner output
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Alignment {
    /// Pairs in leader order
    pub pairs: Vec<PairedSample>,
    pub stats: AlignmentStats,
}

/// Two-pointer leader/follower aligner
#[derive(Debug, Clone, Default)]
pub struct StreamAligner {
    config: AlignerConfig,
}

impl StreamAligner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AlignerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    /// Pair two timestamp-ordered activation streams.
    ///
    /// Each iteration either pairs the two current events or skips exactly
    /// one of them, so neither index moves backwards and the loop runs at
    /// most `leader.len() + follower.len()` times. Skipped events are only
    /// paired when `pair_skipped_events` is set; the extra pair is built
    /// from the two current events before the skip.
    #[instrument(
        name = "align_streams",
        skip_all,
        fields(leader = leader.len(), follower = follower.len())
    )]
    pub fn align(&self, leader: &[ActivationEvent], follower: &[ActivationEvent]) -> Alignment {
        let mut pairs = Vec::with_capacity(leader.len().min(follower.len()));
        let mut stats = AlignmentStats::default();
        let (mut li, mut fi) = (0, 0);

        while li < leader.len() && fi < follower.len() {
            stats.steps += 1;
            let leader_event = &leader[li];
            let follower_event = &follower[fi];

            let half = leader_event.half_period_ms();
            let error = follower_event
                .timestamp_ms
                .saturating_sub(leader_event.antiphase_target_ms());

            if error < -half || error > half {
                if self.config.pair_skipped_events {
                    pairs.push(PairedSample::from_events(leader_event, follower_event));
                    stats.skip_pairs += 1;
                }
                if error < -half {
                    // belongs to an earlier leader cycle
                    trace!(
                        follower = follower_event.timestamp_ms,
                        error,
                        "follower event skipped"
                    );
                    stats.skipped_follower += 1;
                    fi += 1;
                } else {
                    // leader cycle without a follower activation
                    trace!(
                        leader = leader_event.timestamp_ms,
                        error,
                        "leader event skipped"
                    );
                    stats.skipped_leader += 1;
                    li += 1;
                }
            } else {
                if leader_event.period_ms != follower_event.period_ms {
                    stats.period_mismatches += 1;
                    warn!(
                        leader = leader_event.timestamp_ms,
                        leader_period = leader_event.period_ms,
                        follower_period = follower_event.period_ms,
                        "paired events disagree on cycle period; using leader period"
                    );
                }
                pairs.push(PairedSample::from_events(leader_event, follower_event));
                stats.matched += 1;
                li += 1;
                fi += 1;
            }
        }

        stats.trailing_leader = leader.len() - li;
        stats.trailing_follower = follower.len() - fi;
        observability::record_alignment(&stats);

        debug!(
            matched = stats.matched,
            skip_pairs = stats.skip_pairs,
            skipped_leader = stats.skipped_leader,
            skipped_follower = stats.skipped_follower,
            trailing_leader = stats.trailing_leader,
            trailing_follower = stats.trailing_follower,
            "streams aligned"
        );

        Alignment { pairs, stats }
    }

    /// Attach carried-forward link metrics at each follower activation.
    ///
    /// Pairs come out of [`align`](Self::align) in follower-timestamp order,
    /// so a single forward cursor covers the whole run.
    pub fn enrich(&self, pairs: Vec<PairedSample>, index: &MetricIndex) -> Vec<PairedSample> {
        let mut cursor = index.cursor();
        pairs
            .into_iter()
            .map(|pair| {
                let metrics = cursor.link_metrics(pair.follower_timestamp);
                pair.with_metrics(metrics)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{MetricKind, MetricSample};

    fn events(raw: &[(i64, i64)]) -> Vec<ActivationEvent> {
        raw.iter()
            .map(|&(timestamp, period)| ActivationEvent::new(timestamp, period))
            .collect()
    }

    #[test]
    fn test_three_leader_two_follower() {
        let leader = events(&[(0, 2000), (2000, 2000), (4000, 2000)]);
        let follower = events(&[(1005, 2000), (3050, 2000)]);

        let alignment = StreamAligner::new().align(&leader, &follower);

        assert_eq!(alignment.pairs.len(), 2);
        let targets: Vec<i64> = alignment
            .pairs
            .iter()
            .map(|p| p.target_follower_timestamp)
            .collect();
        let errors: Vec<i64> = alignment.pairs.iter().map(|p| p.phase_error_ms).collect();
        assert_eq!(targets, vec![1000, 3000]);
        assert_eq!(errors, vec![5, 50]);
        assert_eq!(alignment.stats.trailing_leader, 1);
        assert_eq!(alignment.stats.trailing_follower, 0);
    }

    #[test]
    fn test_early_follower_is_skipped() {
        let leader = events(&[(0, 2000)]);
        let follower = events(&[(-1200, 2000), (1000, 2000)]);

        let alignment = StreamAligner::new().align(&leader, &follower);

        assert_eq!(alignment.pairs.len(), 1);
        assert_eq!(alignment.pairs[0].follower_timestamp, 1000);
        assert_eq!(alignment.pairs[0].phase_error_ms, 0);
        assert_eq!(alignment.stats.skipped_follower, 1);
        assert_eq!(alignment.stats.steps, 2);
    }

    #[test]
    fn test_early_follower_paired_when_configured() {
        let leader = events(&[(0, 2000)]);
        let follower = events(&[(-1200, 2000), (1000, 2000)]);

        let aligner = StreamAligner::with_config(AlignerConfig {
            pair_skipped_events: true,
        });
        let alignment = aligner.align(&leader, &follower);

        let errors: Vec<i64> = alignment.pairs.iter().map(|p| p.phase_error_ms).collect();
        assert_eq!(errors, vec![-2200, 0]);
        assert_eq!(alignment.stats.matched, 1);
        assert_eq!(alignment.stats.skip_pairs, 1);
        assert_eq!(alignment.stats.skipped_follower, 1);
        assert_eq!(alignment.stats.steps, 2);
    }

    #[test]
    fn test_skipped_leader_paired_when_configured() {
        let leader = events(&[(0, 2000), (2000, 2000), (4000, 2000)]);
        let follower = events(&[(1000, 2000), (5010, 2000)]);

        let aligner = StreamAligner::with_config(AlignerConfig {
            pair_skipped_events: true,
        });
        let alignment = aligner.align(&leader, &follower);

        let pairs: Vec<(i64, i64, i64)> = alignment
            .pairs
            .iter()
            .map(|p| (p.leader_timestamp, p.follower_timestamp, p.phase_error_ms))
            .collect();
        assert_eq!(pairs, vec![(0, 1000, 0), (2000, 5010, 2010), (4000, 5010, 10)]);
        assert_eq!(alignment.stats.matched, 2);
        assert_eq!(alignment.stats.skip_pairs, 1);
    }

    #[test]
    fn test_missing_follower_cycle_skips_leader() {
        // follower misses the cycle of the leader event at 2000
        let leader = events(&[(0, 2000), (2000, 2000), (4000, 2000)]);
        let follower = events(&[(1000, 2000), (5010, 2000)]);

        let alignment = StreamAligner::new().align(&leader, &follower);

        let matched: Vec<(i64, i64)> = alignment
            .pairs
            .iter()
            .map(|p| (p.leader_timestamp, p.follower_timestamp))
            .collect();
        assert_eq!(matched, vec![(0, 1000), (4000, 5010)]);
        assert_eq!(alignment.stats.skipped_leader, 1);
    }

    #[test]
    fn test_half_period_boundary_is_a_match() {
        let leader = events(&[(0, 2000)]);

        let late = StreamAligner::new().align(&leader, &events(&[(2000, 2000)]));
        assert_eq!(late.pairs.len(), 1);
        assert_eq!(late.pairs[0].phase_error_ms, 1000);

        let early = StreamAligner::new().align(&leader, &events(&[(0, 2000)]));
        assert_eq!(early.pairs.len(), 1);
        assert_eq!(early.pairs[0].phase_error_ms, -1000);

        let beyond = StreamAligner::new().align(&leader, &events(&[(2001, 2000)]));
        assert!(beyond.pairs.is_empty());
    }

    #[test]
    fn test_events_used_at_most_once_and_step_bound() {
        let leader = events(&[
            (0, 1000),
            (1000, 1000),
            (2000, 1000),
            (3000, 1000),
            (4000, 1000),
            (5000, 1000),
        ]);
        let follower = events(&[
            (-800, 1000),
            (500, 1000),
            (520, 1000),
            (2480, 1000),
            (4100, 1000),
            (4600, 1000),
            (9000, 1000),
        ]);

        let alignment = StreamAligner::new().align(&leader, &follower);
        let stats = alignment.stats;

        assert!(stats.steps <= leader.len() + follower.len());
        assert_eq!(
            stats.matched + stats.skipped_leader + stats.trailing_leader,
            leader.len()
        );
        assert_eq!(
            stats.matched + stats.skipped_follower + stats.trailing_follower,
            follower.len()
        );

        // pairs advance strictly on both sides
        for window in alignment.pairs.windows(2) {
            assert!(window[0].leader_timestamp < window[1].leader_timestamp);
            assert!(window[0].follower_timestamp < window[1].follower_timestamp);
        }
    }

    #[test]
    fn test_alignment_is_deterministic() {
        let leader = events(&[(0, 2000), (2000, 2000), (4000, 2000), (6000, 2000)]);
        let follower = events(&[(900, 2000), (3300, 2000), (7040, 2000)]);

        let aligner = StreamAligner::new();
        assert_eq!(
            aligner.align(&leader, &follower),
            aligner.align(&leader, &follower)
        );
    }

    #[test]
    fn test_period_mismatch_counted() {
        let leader = events(&[(0, 2000), (2000, 2000)]);
        let follower = events(&[(1000, 2000), (3010, 1000)]);

        let alignment = StreamAligner::new().align(&leader, &follower);
        assert_eq!(alignment.pairs.len(), 2);
        assert_eq!(alignment.stats.period_mismatches, 1);
        // leader period drives the target
        assert_eq!(alignment.pairs[1].target_follower_timestamp, 3000);
    }

    #[test]
    fn test_empty_input() {
        let alignment = StreamAligner::new().align(&[], &events(&[(0, 2000)]));
        assert!(alignment.pairs.is_empty());
        assert_eq!(alignment.stats.steps, 0);
        assert_eq!(alignment.stats.trailing_follower, 1);
    }

    #[test]
    fn test_enrich_carries_metrics_forward() {
        let leader = events(&[(0, 2000), (2000, 2000)]);
        let follower = events(&[(1005, 2000), (3050, 2000)]);
        let index = MetricIndex::build(vec![
            MetricSample::new(900, MetricKind::RoundTripTime, 80.0),
            MetricSample::new(1005, MetricKind::SignalStrength, -70.0),
            MetricSample::new(2000, MetricKind::RoundTripTime, 120.0),
            MetricSample::new(3051, MetricKind::SyncQuality, 40.0),
        ]);

        let aligner = StreamAligner::new();
        let pairs = aligner.enrich(aligner.align(&leader, &follower).pairs, &index);

        assert_eq!(pairs[0].metrics.round_trip_time, Some(80.0));
        assert_eq!(pairs[0].metrics.signal_strength, Some(-70.0));
        assert_eq!(pairs[0].metrics.sync_quality, None);

        assert_eq!(pairs[1].metrics.round_trip_time, Some(120.0));
        assert_eq!(pairs[1].metrics.signal_strength, Some(-70.0));
        assert_eq!(pairs[1].metrics.sync_quality, None);
    }
}

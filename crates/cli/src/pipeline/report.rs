//! Analysis report and its terminal rendering.

use classifier::AnalysisSummary;
use contracts::{
    AlignmentStats, ClassifiedSample, ClassifierThresholds, DeviceRole, ExtractionStats,
    MetricKind,
};
use ingestion::StreamExtraction;
use serde::Serialize;

/// Extraction outcome of one stream
#[derive(Debug, Clone, Serialize)]
pub struct StreamOverview {
    pub role: DeviceRole,
    pub announced_role: Option<DeviceRole>,
    pub role_conflict: bool,
    pub activations: usize,
    pub first_activation_ms: Option<i64>,
    pub last_activation_ms: Option<i64>,
    pub stats: ExtractionStats,
}

impl From<&StreamExtraction> for StreamOverview {
    fn from(extraction: &StreamExtraction) -> Self {
        Self {
            role: extraction.role,
            announced_role: extraction.announced_role,
            role_conflict: extraction.role_conflict(),
            activations: extraction.activations.len(),
            first_activation_ms: extraction.activations.first().map(|e| e.timestamp_ms),
            last_activation_ms: extraction.activations.last().map(|e| e.timestamp_ms),
            stats: extraction.stats,
        }
    }
}

/// Full result of an `analyze` run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub leader: StreamOverview,
    pub follower: StreamOverview,
    pub alignment: AlignmentStats,
    pub classifier: ClassifierThresholds,
    pub samples: Vec<ClassifiedSample>,
    pub summary: AnalysisSummary,
}

impl AnalysisReport {
    /// Print the pair table (0 = all rows) and the run statistics
    pub fn print(&self, max_rows: usize) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║              Bilateral Phase Timing Analysis                 ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        print_stream("📥 Leader log", &self.leader);
        print_stream("📥 Follower log", &self.follower);

        println!("🔗 Alignment");
        println!("   ├─ Matched pairs: {}", self.alignment.matched);
        if self.alignment.skip_pairs > 0 {
            println!("   ├─ Pairs from skipped events: {}", self.alignment.skip_pairs);
        }
        println!(
            "   ├─ Skipped: {} leader / {} follower",
            self.alignment.skipped_leader, self.alignment.skipped_follower
        );
        println!(
            "   ├─ Trailing unmatched: {} leader / {} follower",
            self.alignment.trailing_leader, self.alignment.trailing_follower
        );
        println!("   └─ Period mismatches: {}", self.alignment.period_mismatches);

        self.print_table(max_rows);

        println!("\n📈 Statistics\n");
        print!("{}", self.summary);

        self.print_key();
        println!();
    }

    fn print_table(&self, max_rows: usize) {
        println!(
            "\n{:<10} {:<8} {:<10} {:<10} {:<11} {:<10} {:<10} {:<9} Status",
            "Time (s)", "Period", "Follower @", "Target @", "Phase Err", "Signal", "RTT", "Quality"
        );
        println!("{}", "-".repeat(96));

        let shown = if max_rows == 0 {
            self.samples.len()
        } else {
            max_rows.min(self.samples.len())
        };

        for classified in &self.samples[..shown] {
            let pair = &classified.sample;
            let signal = format_metric(pair.metrics.signal_strength, MetricKind::SignalStrength);
            let rtt = format_metric(pair.metrics.round_trip_time, MetricKind::RoundTripTime);
            let quality = format_metric(pair.metrics.sync_quality, MetricKind::SyncQuality);
            println!(
                "{:<10.2} {:<8} {:<+10} {:<10} {:<+11} {:<10} {:<10} {:<9} {}",
                pair.leader_timestamp as f64 / 1000.0,
                pair.leader_period,
                pair.follower_offset_ms(),
                pair.leader_period / 2,
                pair.phase_error_ms,
                signal,
                rtt,
                quality,
                classified.status
            );
        }

        if shown < self.samples.len() {
            println!(
                "... {} more pairs (use --max-rows 0 to show all)",
                self.samples.len() - shown
            );
        }
        println!("{}", "-".repeat(96));
    }

    fn print_key(&self) {
        let good = self.classifier.good_ms;
        let warning = self.classifier.warning_ms;

        println!("\n🔑 Key");
        println!("   ├─ Follower @ = follower activation relative to the leader activation (ms)");
        println!("   ├─ Target @   = ideal antiphase target, half a period after the leader");
        println!("   ├─ Phase Err  = deviation from target (negative = early, positive = late)");
        println!("   ├─ GOOD       = within ±{good} ms of target");
        println!("   ├─ WARNING    = within ±{warning} ms of target");
        println!("   ├─ OVERLAP    = more than {warning} ms early; both devices may be active");
        println!("   └─ DRIFT      = more than {warning} ms late; poor alternation");
    }
}

fn print_stream(title: &str, stream: &StreamOverview) {
    let stats = &stream.stats;
    println!("{title}");
    println!(
        "   ├─ Lines: {} ({} matched, {} skipped)",
        stats.lines_total, stats.matched_lines, stats.unmatched_lines
    );
    println!(
        "   ├─ Activations: {} ({} triggers, {} duplicates, {} before any period)",
        stream.activations,
        stats.activation_triggers,
        stats.duplicates_removed,
        stats.discarded_without_period
    );
    if stream.role == DeviceRole::Follower {
        println!(
            "   ├─ Metric samples: {} signal / {} rtt / {} quality",
            stats.signal_strength_samples, stats.round_trip_samples, stats.sync_quality_samples
        );
    }
    if stream.role_conflict {
        if let Some(announced) = stream.announced_role {
            println!("   ├─ ⚠️  Log announces the {announced} role");
        }
    }
    println!("   └─ Period updates: {}\n", stats.period_updates);
}

fn format_metric(value: Option<f64>, kind: MetricKind) -> String {
    match (value, kind) {
        (None, _) => "N/A".to_string(),
        (Some(v), MetricKind::SignalStrength) => format!("{v:.0} dBm"),
        (Some(v), MetricKind::RoundTripTime) => format!("{v:.1} ms"),
        (Some(v), MetricKind::SyncQuality) => format!("{v:.0}%"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_metric() {
        assert_eq!(format_metric(None, MetricKind::RoundTripTime), "N/A");
        assert_eq!(format_metric(Some(-61.0), MetricKind::SignalStrength), "-61 dBm");
        assert_eq!(format_metric(Some(81.452), MetricKind::RoundTripTime), "81.5 ms");
        assert_eq!(format_metric(Some(92.0), MetricKind::SyncQuality), "92%");
    }
}

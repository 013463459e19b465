//! Plain-text rendering of the summary types

use std::fmt;

use contracts::{MetricKind, PhaseStatus};

use crate::aggregate::{AnalysisSummary, StatusBreakdown};
use crate::correlation::{Bucket, BucketMetrics, LinkVerdict, MetricStats, OutlierAnalysis};

fn bucket_label(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Good => "GOOD timing",
        Bucket::Warning => "WARNING timing",
        Bucket::Poor => "POOR timing (OVERLAP + DRIFT)",
    }
}

fn metric_label(kind: MetricKind) -> &'static str {
    match kind {
        MetricKind::SignalStrength => "Signal",
        MetricKind::RoundTripTime => "RTT",
        MetricKind::SyncQuality => "Quality",
    }
}

impl fmt::Display for MetricStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean={:.1}, min={:.1}, max={:.1} (n={})",
            self.mean, self.min, self.max, self.count
        )
    }
}

impl fmt::Display for StatusBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Status breakdown ({} pairs):", self.total)?;
        for status in PhaseStatus::ALL {
            writeln!(
                f,
                "  {:<8} {:>5} ({:.1}%)",
                status.as_str(),
                self.count(status),
                self.percent(status)
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for BucketMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.samples == 0 {
            return writeln!(f, "  no measurements");
        }
        writeln!(
            f,
            "  {} measurements, {} with link metrics",
            self.samples, self.with_metrics
        )?;
        for kind in MetricKind::ALL {
            match self.get(kind) {
                Some(stats) => {
                    writeln!(f, "  {:<8} {} [{}]", metric_label(kind), stats, kind.unit())?
                }
                None => writeln!(f, "  {:<8} no data", metric_label(kind))?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for OutlierAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.poor_samples == 0 {
            return writeln!(f, "No OVERLAP or DRIFT cycles.");
        }

        writeln!(
            f,
            "Total POOR cycles: {} ({} with link metrics)",
            self.poor_samples, self.poor_with_metrics
        )?;
        if self.poor_with_metrics == 0 {
            return writeln!(f, "  [?] no link metrics recorded during POOR cycles");
        }
        for finding in &self.findings {
            writeln!(
                f,
                "  {:<22} {:>5} cycles ({:.1}%)",
                finding.label(),
                finding.count,
                finding.fraction * 100.0
            )?;
        }

        writeln!(f, "Recommendations:")?;
        match self.verdict {
            LinkVerdict::LinkRelated => {
                for finding in self.correlated() {
                    writeln!(f, "  [!] {}", finding.recommendation())?;
                }
            }
            LinkVerdict::NotLinkRelated => {
                writeln!(
                    f,
                    "  [OK] {}/{} POOR cycles have healthy link metrics",
                    self.clean_samples, self.poor_with_metrics
                )?;
                writeln!(f, "       -> timing errors are not caused by link quality")?;
                writeln!(
                    f,
                    "       -> likely algorithmic (convergence, correction limits, prediction)"
                )?;
            }
            LinkVerdict::Inconclusive => {
                writeln!(
                    f,
                    "  [?] no single link signal explains the POOR cycles ({} of {} carried metrics)",
                    self.poor_with_metrics, self.poor_samples
                )?;
            }
            LinkVerdict::NoPoorSamples => {}
        }
        Ok(())
    }
}

impl fmt::Display for AnalysisSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Phase Error Statistics ===")?;
        writeln!(f, "Total paired measurements: {}", self.status.total)?;
        match self.phase_error.mean {
            Some(mean) => writeln!(f, "Mean phase error:          {:+.1} ms", mean)?,
            None => writeln!(f, "Mean phase error:          N/A")?,
        }
        match self.phase_error.std_dev {
            Some(std_dev) => writeln!(f, "Std deviation:             {:.1} ms", std_dev)?,
            None => writeln!(f, "Std deviation:             N/A")?,
        }
        if let (Some(min), Some(max)) = (self.phase_error.min, self.phase_error.max) {
            writeln!(f, "Min error (most early):    {:+.1} ms", min)?;
            writeln!(f, "Max error (most late):     {:+.1} ms", max)?;
        }
        writeln!(f)?;
        write!(f, "{}", self.status)?;

        if self.correlation.has_metrics() {
            writeln!(f)?;
            writeln!(f, "=== Link Quality Correlation ===")?;
            for bucket in Bucket::ALL {
                writeln!(f, "{}:", bucket_label(bucket))?;
                write!(f, "{}", self.correlation.bucket(bucket))?;
            }
        }

        writeln!(f)?;
        writeln!(f, "=== Outlier Analysis (POOR timing) ===")?;
        write!(f, "{}", self.outliers)
    }
}

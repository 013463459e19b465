//! Analysis configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Microsecond threshold above which round-trip values are treated as µs
pub const DEFAULT_RTT_MICROSECOND_THRESHOLD: f64 = 1000.0;

/// Full analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct AnalysisConfig {
    /// Event extraction options
    #[serde(default)]
    #[validate(nested)]
    pub extractor: ExtractorConfig,

    /// Stream pairing options
    #[serde(default)]
    #[validate(nested)]
    pub aligner: AlignerConfig,

    /// Status thresholds
    #[serde(default)]
    #[validate(nested)]
    pub classifier: ClassifierThresholds,

    /// Link-quality correlation thresholds
    #[serde(default)]
    #[validate(nested)]
    pub correlation: CorrelationThresholds,
}

/// Event extractor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Collapse activations sharing `(timestamp, period)` into one event.
    ///
    /// Disable to see every textual trigger; some defects only show up
    /// without deduplication.
    pub deduplicate_activations: bool,

    /// Round-trip values strictly above this are microseconds
    #[validate(range(exclusive_min = 0.0))]
    pub rtt_microsecond_threshold: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            deduplicate_activations: true,
            rtt_microsecond_threshold: DEFAULT_RTT_MICROSECOND_THRESHOLD,
        }
    }
}

/// Stream aligner configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AlignerConfig {
    /// Also emit a pair on iterations that skip an event.
    ///
    /// The skipped event is paired with the current event of the other
    /// stream, so a follower activation more than half a period off target
    /// still shows up as OVERLAP or DRIFT. Events may then appear in more
    /// than one pair.
    pub pair_skipped_events: bool,
}

/// Phase error thresholds (ms), evaluated in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// `|error| <= good_ms` is Good
    #[validate(range(min = 0))]
    pub good_ms: i64,

    /// `|error| <= warning_ms` is Warning; beyond is Overlap or Drift
    #[validate(range(min = 0))]
    pub warning_ms: i64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            good_ms: 10,
            warning_ms: 50,
        }
    }
}

/// Thresholds for the poor-timing outlier analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CorrelationThresholds {
    /// Signal strength below this is weak (dBm)
    pub weak_signal_dbm: f64,

    /// Round-trip time above this is high (ms)
    #[validate(range(min = 0.0))]
    pub high_rtt_ms: f64,

    /// Sync quality below this is low (percent)
    #[validate(range(min = 0.0, max = 100.0))]
    pub low_quality_pct: f64,

    /// A signal correlates when its outlier count exceeds this share of poor samples
    #[validate(range(min = 0.0, max = 1.0))]
    pub correlated_fraction: f64,

    /// Poor timing is not link-related when clean samples exceed this share
    #[validate(range(min = 0.0, max = 1.0))]
    pub link_clear_fraction: f64,
}

impl Default for CorrelationThresholds {
    fn default() -> Self {
        Self {
            weak_signal_dbm: -90.0,
            high_rtt_ms: 100.0,
            low_quality_pct: 50.0,
            correlated_fraction: 0.3,
            link_clear_fraction: 0.7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert!(config.extractor.deduplicate_activations);
        assert!(!config.aligner.pair_skipped_events);
        assert_eq!(config.classifier.good_ms, 10);
        assert_eq!(config.classifier.warning_ms, 50);
        assert_eq!(config.correlation.weak_signal_dbm, -90.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "classifier": { "good_ms": 5 } }"#).unwrap();
        assert_eq!(config.classifier.good_ms, 5);
        assert_eq!(config.classifier.warning_ms, 50);
        assert!(config.extractor.deduplicate_activations);
    }

    #[test]
    fn test_range_rules() {
        let mut config = AnalysisConfig::default();
        config.correlation.correlated_fraction = 1.5;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.extractor.rtt_microsecond_threshold = 0.0;
        assert!(config.validate().is_err());
    }
}

//! Phase error classification

use contracts::{ClassifiedSample, ClassifierThresholds, PairedSample, PhaseStatus};

/// Maps a phase error to a status; thresholds are evaluated in order.
#[derive(Debug, Clone, Default)]
pub struct PhaseClassifier {
    thresholds: ClassifierThresholds,
}

impl PhaseClassifier {
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ClassifierThresholds {
        &self.thresholds
    }

    pub fn classify(&self, phase_error_ms: i64) -> PhaseStatus {
        let magnitude = phase_error_ms.unsigned_abs();
        if magnitude <= self.thresholds.good_ms.unsigned_abs() {
            PhaseStatus::Good
        } else if magnitude <= self.thresholds.warning_ms.unsigned_abs() {
            PhaseStatus::Warning
        } else if phase_error_ms < 0 {
            PhaseStatus::Overlap
        } else {
            PhaseStatus::Drift
        }
    }

    pub fn classify_pair(&self, sample: PairedSample) -> ClassifiedSample {
        ClassifiedSample {
            status: self.classify(sample.phase_error_ms),
            sample,
        }
    }
}

/// Classify pairs in order, recording status metrics for each
pub fn analyze(pairs: &[PairedSample], classifier: &PhaseClassifier) -> Vec<ClassifiedSample> {
    pairs
        .iter()
        .map(|pair| {
            let classified = classifier.classify_pair(*pair);
            observability::record_classified(&classified);
            classified
        })
        .collect()
}

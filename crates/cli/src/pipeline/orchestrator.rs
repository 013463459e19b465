//! Pipeline orchestrator - coordinates extraction, alignment and classification.

use anyhow::{Context, Result};
use classifier::{analyze, PhaseAggregator, PhaseClassifier};
use contracts::{AnalysisConfig, DeviceRole};
use ingestion::{EventExtractor, StreamExtraction};
use sync_engine::{MetricIndex, StreamAligner};
use tracing::{info, instrument, warn};

use super::{AnalysisReport, StreamOverview};

/// Runs the full analysis over two decoded logs
#[derive(Debug)]
pub struct AnalysisPipeline {
    config: AnalysisConfig,
    extractor: EventExtractor,
    aligner: StreamAligner,
    classifier: PhaseClassifier,
}

impl AnalysisPipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let extractor = EventExtractor::new(config.extractor.clone())
            .context("Failed to build event extractor")?;
        let aligner = StreamAligner::with_config(config.aligner.clone());
        let classifier = PhaseClassifier::new(config.classifier.clone());
        Ok(Self {
            config,
            extractor,
            aligner,
            classifier,
        })
    }

    /// Extract one stream, warning when the firmware announced the other role
    pub fn extract(&self, text: &str, role: DeviceRole) -> Result<StreamExtraction> {
        let extraction = self
            .extractor
            .extract_text(text, role)
            .with_context(|| format!("Failed to extract the {role} stream"))?;

        if extraction.role_conflict() {
            warn!(
                expected = %role,
                announced = ?extraction.announced_role,
                "log announces a different role; check the argument order"
            );
        }
        Ok(extraction)
    }

    /// Run the pipeline to completion
    #[instrument(name = "analysis_pipeline", skip_all)]
    pub fn run(&self, leader_text: &str, follower_text: &str) -> Result<AnalysisReport> {
        let leader = self.extract(leader_text, DeviceRole::Leader)?;
        let follower = self.extract(follower_text, DeviceRole::Follower)?;

        let alignment = self
            .aligner
            .align(&leader.activations, &follower.activations);
        let index = MetricIndex::build(follower.metrics.iter().copied());
        let pairs = self.aligner.enrich(alignment.pairs, &index);

        let samples = analyze(&pairs, &self.classifier);
        let summary = PhaseAggregator::summarize(self.config.correlation.clone(), &samples);

        info!(
            pairs = samples.len(),
            good = summary.status.good,
            poor = summary.status.poor(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            leader: StreamOverview::from(&leader),
            follower: StreamOverview::from(&follower),
            alignment: alignment.stats,
            classifier: self.config.classifier.clone(),
            samples,
            summary,
        })
    }
}

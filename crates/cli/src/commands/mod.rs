//! Command implementations.

mod analyze;
mod extract;
mod validate;

pub use analyze::run_analyze;
pub use extract::run_extract;
pub use validate::run_validate;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::AnalysisConfig;
use tracing::debug;

use crate::cli::AnalysisOptions;
use crate::error::CliError;

/// Load the configuration file (if any) and apply command-line overrides
pub(crate) fn resolve_config(options: &AnalysisOptions) -> Result<AnalysisConfig> {
    let mut config = match &options.config {
        Some(path) if !path.exists() => return Err(CliError::config_not_found(path).into()),
        Some(path) => ConfigLoader::load_from_path(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if options.no_dedup {
        config.extractor.deduplicate_activations = false;
    }
    if options.pair_skipped {
        config.aligner.pair_skipped_events = true;
    }
    if let Some(good_ms) = options.good_ms {
        config.classifier.good_ms = good_ms;
    }
    if let Some(warning_ms) = options.warning_ms {
        config.classifier.warning_ms = warning_ms;
    }

    ConfigLoader::validate(&config).context("Invalid analysis options")?;
    debug!(
        dedup = config.extractor.deduplicate_activations,
        pair_skipped = config.aligner.pair_skipped_events,
        good_ms = config.classifier.good_ms,
        warning_ms = config.classifier.warning_ms,
        "analysis config resolved"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_without_file() {
        let config = resolve_config(&AnalysisOptions::default()).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_overrides_apply_on_top_of_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[classifier]\ngood_ms = 5\nwarning_ms = 30").unwrap();

        let options = AnalysisOptions {
            config: Some(file.path().to_path_buf()),
            no_dedup: true,
            pair_skipped: true,
            good_ms: None,
            warning_ms: Some(45),
        };
        let config = resolve_config(&options).unwrap();
        assert!(!config.extractor.deduplicate_activations);
        assert!(config.aligner.pair_skipped_events);
        assert_eq!(config.classifier.good_ms, 5);
        assert_eq!(config.classifier.warning_ms, 45);
    }

    #[test]
    fn test_missing_config_file() {
        let options = AnalysisOptions {
            config: Some(PathBuf::from("/nonexistent/analysis.toml")),
            ..Default::default()
        };
        let err = resolve_config(&options).unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let options = AnalysisOptions {
            good_ms: Some(80),
            ..Default::default()
        };
        let err = resolve_config(&options).unwrap_err();
        assert!(format!("{err:#}").contains("good_ms"));
    }
}

//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::AnalysisConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    deduplicate_activations: bool,
    rtt_microsecond_threshold: f64,
    pair_skipped_events: bool,
    good_ms: i64,
    warning_ms: i64,
    weak_signal_dbm: f64,
    high_rtt_ms: f64,
    low_quality_pct: f64,
}

impl From<&AnalysisConfig> for ConfigSummary {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            deduplicate_activations: config.extractor.deduplicate_activations,
            rtt_microsecond_threshold: config.extractor.rtt_microsecond_threshold,
            pair_skipped_events: config.aligner.pair_skipped_events,
            good_ms: config.classifier.good_ms,
            warning_ms: config.classifier.warning_ms,
            weak_signal_dbm: config.correlation.weak_signal_dbm,
            high_rtt_ms: config.correlation.high_rtt_ms,
            low_quality_pct: config.correlation.low_quality_pct,
        }
    }
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary::from(&config)),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &AnalysisConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.extractor.deduplicate_activations {
        warnings.push(
            "extractor.deduplicate_activations is off - repeated triggers become extra pairs"
                .to_string(),
        );
    }

    if config.aligner.pair_skipped_events {
        warnings.push(
            "aligner.pair_skipped_events is on - skipped events are paired and may appear twice"
                .to_string(),
        );
    }

    if config.classifier.good_ms == config.classifier.warning_ms {
        warnings.push(format!(
            "classifier.good_ms equals warning_ms ({} ms) - no sample will be WARNING",
            config.classifier.good_ms
        ));
    }

    if config.correlation.weak_signal_dbm >= 0.0 {
        warnings.push(format!(
            "correlation.weak_signal_dbm is {} dBm - every signal sample counts as weak",
            config.correlation.weak_signal_dbm
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Deduplicate activations: {}", summary.deduplicate_activations);
            println!("  RTT µs threshold: {}", summary.rtt_microsecond_threshold);
            println!("  Pair skipped events: {}", summary.pair_skipped_events);
            println!(
                "  Status thresholds: GOOD ±{} ms, WARNING ±{} ms",
                summary.good_ms, summary.warning_ms
            );
            println!(
                "  Outlier thresholds: signal < {} dBm, RTT > {} ms, quality < {}%",
                summary.weak_signal_dbm, summary.high_rtt_ms, summary.low_quality_pct
            );
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

//! `extract` command implementation.

use anyhow::{Context, Result};
use contracts::{ActivationEvent, MetricSample};
use ingestion::StreamExtraction;
use serde::Serialize;
use tracing::info;

use super::resolve_config;
use crate::cli::ExtractArgs;
use crate::input::read_log;
use crate::pipeline::{AnalysisPipeline, StreamOverview};

/// Extraction result for JSON output
#[derive(Serialize)]
struct ExtractOutput<'a> {
    log: String,
    #[serde(flatten)]
    overview: StreamOverview,
    metric_samples: usize,
    activation_events: &'a [ActivationEvent],
    metric_events: &'a [MetricSample],
}

impl<'a> ExtractOutput<'a> {
    fn new(log: String, extraction: &'a StreamExtraction, limit: usize) -> Self {
        let activations = &extraction.activations;
        let metrics = &extraction.metrics;
        Self {
            log,
            overview: StreamOverview::from(extraction),
            metric_samples: metrics.len(),
            activation_events: &activations[..limit.min(activations.len())],
            metric_events: &metrics[..limit.min(metrics.len())],
        }
    }
}

/// Execute the `extract` command
pub fn run_extract(args: &ExtractArgs) -> Result<()> {
    info!(log = %args.log.display(), role = %args.role, "Extracting events");

    let config = resolve_config(&args.options)?;
    let text = read_log(&args.log).context("Failed to load log")?;
    let extraction = AnalysisPipeline::new(config)?.extract(&text, args.role)?;

    let output = ExtractOutput::new(args.log.display().to_string(), &extraction, args.limit);
    if args.json {
        let json = serde_json::to_string_pretty(&output)
            .context("Failed to serialize extraction result")?;
        println!("{}", json);
    } else {
        print_extraction(&output);
    }

    Ok(())
}

fn print_extraction(output: &ExtractOutput<'_>) {
    let overview = &output.overview;
    let stats = &overview.stats;

    println!("\n📥 {} ({})", output.log, overview.role);
    match overview.announced_role {
        Some(announced) if overview.role_conflict => {
            println!("   ├─ Announced role: {announced} ⚠️  (expected {})", overview.role)
        }
        Some(announced) => println!("   ├─ Announced role: {announced}"),
        None => println!("   ├─ Announced role: not found"),
    }
    println!(
        "   ├─ Lines: {} total, {} matched, {} in inactive phase",
        stats.lines_total, stats.matched_lines, stats.inactive_phase_lines
    );
    println!("   ├─ Period updates: {}", stats.period_updates);
    println!(
        "   ├─ Activations: {} kept of {} triggers",
        overview.activations, stats.activation_triggers
    );
    println!(
        "   │  ├─ Duplicates removed: {}",
        stats.duplicates_removed
    );
    println!(
        "   │  └─ Before any period: {}",
        stats.discarded_without_period
    );
    if let (Some(first), Some(last)) = (overview.first_activation_ms, overview.last_activation_ms)
    {
        println!("   ├─ Span: {first} ms .. {last} ms");
    }
    println!("   └─ Metric samples: {}", output.metric_samples);

    if !output.activation_events.is_empty() {
        println!("\n   Activations:");
        for event in output.activation_events {
            println!(
                "     {:>10} ms  period {} ms",
                event.timestamp_ms, event.period_ms
            );
        }
        if overview.activations > output.activation_events.len() {
            println!(
                "     ... {} more",
                overview.activations - output.activation_events.len()
            );
        }
    }

    if !output.metric_events.is_empty() {
        println!("\n   Metrics:");
        for sample in output.metric_events {
            println!(
                "     {:>10} ms  {:<15} {:.1} {}",
                sample.timestamp_ms,
                sample.kind.as_str(),
                sample.value,
                sample.kind.unit()
            );
        }
        if output.metric_samples > output.metric_events.len() {
            println!(
                "     ... {} more",
                output.metric_samples - output.metric_events.len()
            );
        }
    }
    println!();
}

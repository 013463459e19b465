//! `analyze` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use super::resolve_config;
use crate::cli::AnalyzeArgs;
use crate::input::read_log;
use crate::pipeline::AnalysisPipeline;

/// Execute the `analyze` command
pub fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    info!(
        leader = %args.leader_log.display(),
        follower = %args.follower_log.display(),
        "Starting phase analysis"
    );

    let config = resolve_config(&args.options)?;
    let leader = read_log(&args.leader_log).context("Failed to load leader log")?;
    let follower = read_log(&args.follower_log).context("Failed to load follower log")?;

    let report = AnalysisPipeline::new(config)?.run(&leader, &follower)?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize analysis report")?;
        println!("{}", json);
    } else {
        report.print(args.max_rows);
    }

    Ok(())
}

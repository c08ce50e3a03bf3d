use crate::output::{print_json, render_decisions, short_time};
use anyhow::Context;
use chrono::{DateTime, Utc};
use cleanup_client::HttpServices;
use cleanup_core::config::CleanupConfig;
use cleanup_core::decision::{PassResult, PassStatus};
use cleanup_core::orchestrator::Orchestrator;
use std::path::Path;

pub fn run(config_path: &Path, now: Option<DateTime<Utc>>, json: bool) -> anyhow::Result<()> {
    let config = CleanupConfig::load(config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    if config.has_errors() {
        anyhow::bail!("config has errors; run `visit-cleanup config validate` for details");
    }

    let services = HttpServices::from_config(&config).context("failed to build service clients")?;
    let orchestrator = Orchestrator::new(
        &services.directory,
        &services.archive,
        &services.notifier,
        config.thresholds.clone(),
    );

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt
        .block_on(orchestrator.run_pass(now))
        .context("cleanup pass failed")?;

    if json {
        print_json(&result)?;
    } else {
        print_pass(&result);
    }

    Ok(())
}

fn print_pass(result: &PassResult) {
    println!("{}", result.status);
    println!(
        "Reference time: {}  (remind before {}, close before {})",
        result.thresholds.reference_time.to_rfc3339(),
        short_time(&result.thresholds.reminder_cutoff),
        short_time(&result.thresholds.closure_cutoff),
    );

    if result.decisions.is_empty() {
        return;
    }

    println!();
    for line in render_decisions(result) {
        println!("{line}");
    }

    let failures = result.failures().count();
    if result.status == PassStatus::Completed && failures > 0 {
        println!();
        println!("{failures} visit(s) could not be actioned; see ERROR column.");
    }
}

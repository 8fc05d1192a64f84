//! `steep swarm` and `steep probe`

use crate::cli::SwarmArgs;
use crate::status;
use anyhow::{Context, Result};
use steep_config::{Flow, SteepConfig};
use steep_session::{run_probe, run_swarm, ProbeReport, SessionError, StepOutcome};
use tracing::info;

pub async fn handle_swarm(args: &SwarmArgs, config: &mut SteepConfig) -> Result<()> {
    args.apply(config);
    config
        .validate_all()
        .context("Invalid configuration after command line overrides")?;

    info!(
        flow = %config.load.flow,
        users = config.load.users,
        reset = config.session.reset_database,
        "swarm requested"
    );

    let report = run_swarm(config).await.map_err(|e| match e {
        SessionError::ResetFailed(_) => anyhow::Error::new(e).context("Preflight database reset failed, run aborted"),
        other => anyhow::Error::new(other).context("Load run failed"),
    })?;

    status::ok(&format!(
        "{} flow finished: {} users, {} requests, {} failed",
        config.load.flow, report.users, report.requests, report.failures
    ));
    if let Some(path) = &config.load.report_file {
        status::detail(&format!("harness report {}", path));
    }
    if report.failures > 0 {
        status::warning(&format!("{} requests failed", report.failures));
    }
    Ok(())
}

pub async fn handle_probe(flow: Option<Flow>, json: bool, config: &SteepConfig) -> Result<()> {
    let flow = flow.unwrap_or(config.load.flow);
    let report = run_probe(config, flow).await.context("Probe could not start")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize probe report")?
        );
    } else {
        print_steps(&report);
    }

    match &report.failure {
        None => {
            status::ok(&format!("{} flow passed in {} steps", flow, report.steps.len()));
            Ok(())
        }
        Some(failure) => Err(anyhow::anyhow!("{} flow failed at {}", flow, failure)),
    }
}

fn print_steps(report: &ProbeReport) {
    for step in &report.steps {
        let code = step.status.map_or_else(|| "---".to_string(), |s| s.to_string());
        let line = format!(
            "{:<22} {:<5} {} {} ({} ms)",
            step.name,
            step.method.as_str(),
            code,
            step.url,
            step.elapsed_ms
        );
        match &step.outcome {
            StepOutcome::Passed => status::ok(&line),
            StepOutcome::Pending => status::detail(&line),
            StepOutcome::Failed { kind, message } => status::failed(&format!("{} [{}] {}", line, kind, message)),
        }
    }
    status::detail(&format!(
        "authenticated: {}, token seen: {}",
        report.authenticated, report.token_seen
    ));
}

use chrono::{DateTime, Utc};
use clap::ArgMatches;
use tracing::info;

use shipwatch_core::{Deployment, FetchError, FetchOutcome, run_cycle};

use super::helpers::{
    build_client, build_runtime, load_config_with_warning, report_error, scope_overlay,
};
use crate::table::DeploymentTable;

#[derive(serde::Serialize)]
struct ListOutput<'a> {
    fetched_at: DateTime<Utc>,
    deployments: &'a [Deployment],
}

pub(crate) fn handle_list_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    info!(event = "cli.list_started", json_output = json_output);

    let config = load_config_with_warning(scope_overlay(matches));
    let client = build_client(&config)?;
    let runtime = build_runtime()?;

    match runtime.block_on(run_cycle(&client, &config)) {
        FetchOutcome::Success {
            deployments,
            fetched_at,
        } => {
            if json_output {
                let output = ListOutput {
                    fetched_at,
                    deployments: &deployments,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_deployments(&deployments, fetched_at);
            }
            info!(event = "cli.list_completed", count = deployments.len());
            Ok(())
        }
        FetchOutcome::MissingToken => Err(report_error(
            "Cannot fetch deployments",
            FetchError::MissingToken,
        )),
        FetchOutcome::Failure(e) => Err(report_error("Failed to fetch deployments", e)),
    }
}

/// Human-readable deployment listing shared with `watch`. Ages are relative to `now`.
pub(super) fn print_deployments(deployments: &[Deployment], now: DateTime<Utc>) {
    if deployments.is_empty() {
        println!("No deployments found.");
        return;
    }
    DeploymentTable::new(deployments, now.timestamp_millis()).print_table();
}

use clap::ArgMatches;
use tracing::info;

use shipwatch_core::{DeploymentSource, ShipwatchConfig, Team};

use super::helpers::{
    build_client, build_runtime, load_config_with_warning, report_error, require_token,
};
use crate::table::print_simple_table;

#[derive(serde::Serialize)]
struct TeamsOutput<'a> {
    teams: &'a [Team],
}

pub(crate) fn handle_teams_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    info!(event = "cli.teams_started", json_output = json_output);

    let config = load_config_with_warning(ShipwatchConfig::default());
    let token = require_token(&config)?;
    let client = build_client(&config)?;
    let runtime = build_runtime()?;

    let teams = runtime
        .block_on(client.list_teams(token))
        .map_err(|e| report_error("Failed to list teams", e))?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&TeamsOutput { teams: &teams })?
        );
    } else if teams.is_empty() {
        println!("No teams found. Only your personal scope is available.");
    } else {
        let rows: Vec<Vec<String>> = teams
            .iter()
            .map(|t| vec![t.id.clone(), t.slug.clone(), t.name.clone()])
            .collect();
        print_simple_table(&["ID", "Slug", "Name"], &rows);
    }

    info!(event = "cli.teams_completed", count = teams.len());
    Ok(())
}

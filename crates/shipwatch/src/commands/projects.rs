use clap::ArgMatches;
use tracing::info;

use shipwatch_core::{DeploymentSource, Project, ScopeId, ShipwatchConfig};

use super::helpers::{
    build_client, build_runtime, load_config_with_warning, report_error, require_token,
};
use crate::table::print_simple_table;

#[derive(serde::Serialize)]
struct ProjectsOutput<'a> {
    scope: String,
    projects: &'a [Project],
}

pub(crate) fn handle_projects_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let scope = matches
        .get_one::<String>("team")
        .map(|raw| ScopeId::parse(raw))
        .unwrap_or(ScopeId::Personal);

    info!(
        event = "cli.projects_started",
        scope = %scope,
        json_output = json_output
    );

    let config = load_config_with_warning(ShipwatchConfig::default());
    let token = require_token(&config)?;
    let client = build_client(&config)?;
    let runtime = build_runtime()?;

    let projects = runtime
        .block_on(client.list_projects(token, &scope))
        .map_err(|e| report_error(&format!("Failed to list projects in '{}'", scope), e))?;

    if json_output {
        let output = ProjectsOutput {
            scope: scope.to_string(),
            projects: &projects,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if projects.is_empty() {
        println!("No projects found in '{}'.", scope);
    } else {
        let rows: Vec<Vec<String>> = projects
            .iter()
            .map(|p| vec![p.name.clone(), p.id.clone()])
            .collect();
        print_simple_table(&["Name", "ID"], &rows);
    }

    info!(event = "cli.projects_completed", count = projects.len());
    Ok(())
}

use clap::ArgMatches;
use tracing::error;

mod helpers;
mod list;
mod projects;
mod teams;
mod watch;

use list::handle_list_command;
use projects::handle_projects_command;
use teams::handle_teams_command;
use watch::handle_watch_command;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("teams", sub_matches)) => handle_teams_command(sub_matches),
        Some(("projects", sub_matches)) => handle_projects_command(sub_matches),
        Some(("list", sub_matches)) => handle_list_command(sub_matches),
        Some(("watch", sub_matches)) => handle_watch_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

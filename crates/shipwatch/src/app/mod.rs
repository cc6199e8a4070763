mod global;
mod query;
mod watch;


use clap::Command;

pub fn build_cli() -> Command {
    global::root_command()
        .subcommand(query::teams_command())
        .subcommand(query::projects_command())
        .subcommand(query::list_command())
        .subcommand(watch::watch_command())
}

use clap::{Arg, ArgAction, Command};

use super::global::scope_args;

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Output in JSON format")
        .action(ArgAction::SetTrue)
}

pub fn teams_command() -> Command {
    Command::new("teams")
        .about("List the teams your token can access")
        .arg(json_arg())
}

pub fn projects_command() -> Command {
    Command::new("projects")
        .about("List projects in a scope")
        .arg(
            Arg::new("team")
                .long("team")
                .help("Team id, or 'personal' (default)")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(json_arg())
}

pub fn list_command() -> Command {
    scope_args(
        Command::new("list")
            .about("Fetch deployments once and print them")
            .arg(json_arg()),
    )
}

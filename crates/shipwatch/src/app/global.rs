use clap::{Arg, ArgAction, Command};

pub fn root_command() -> Command {
    Command::new("shipwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Watch deployments across your personal account and teams")
        .long_about("shipwatch polls a deployment-hosting API across your personal scope and every team you belong to, merges the results, and shows the most recent deployments. While anything is building it polls fast; otherwise it backs off.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
}

/// `--team` / `--project` overrides shared by `list` and `watch`.
pub fn scope_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("team")
                .long("team")
                .help("Team id to include (repeatable); 'personal' for your own account")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("project")
                .long("project")
                .help("Project name to include (repeatable)")
                .action(ArgAction::Append),
        )
}

use clap::{Arg, ArgAction, Command};

use super::global::scope_args;

pub fn watch_command() -> Command {
    scope_args(
        Command::new("watch")
            .about("Poll continuously (Enter refreshes now, Ctrl-C exits)")
            .long_about("Poll deployments on an adaptive schedule: every few seconds while something is queued or building, slower otherwise. Press Enter to refresh immediately. Edits to the config files are picked up without restarting.")
            .arg(
                Arg::new("once")
                    .long("once")
                    .help("Exit after the first cycle")
                    .action(ArgAction::SetTrue),
            ),
    )
}

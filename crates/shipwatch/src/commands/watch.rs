use std::io::{BufRead, IsTerminal, Write};
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use clap::ArgMatches;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

use shipwatch_config::config_file_paths;
use shipwatch_core::{
    FetchError, FetchOutcome, Presenter, Scheduler, SettingsWatcher, ShipwatchConfig, Snapshot,
    VercelClient,
};

use super::helpers::{
    build_client, build_runtime, load_config_with_warning, report_error, scope_overlay,
};
use super::list::print_deployments;
use crate::color;

pub(crate) fn handle_watch_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let once = matches.get_flag("once");
    let overlay = scope_overlay(matches);
    info!(event = "cli.watch_started", once = once);

    let config = load_config_with_warning(overlay.clone());
    let client = build_client(&config)?;
    let runtime = build_runtime()?;

    let result = runtime.block_on(watch_loop(client, config, overlay, once));
    info!(event = "cli.watch_completed", success = result.is_ok());
    result
}

async fn watch_loop(
    client: VercelClient,
    config: ShipwatchConfig,
    overlay: ShipwatchConfig,
    once: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (settings_tx, settings_rx) = watch::channel(Arc::new(config));
    let _settings_watcher = if once {
        None
    } else {
        SettingsWatcher::spawn(config_file_paths(), overlay, settings_tx.clone())
    };

    let presenter = TerminalPresenter {
        clear_screen: !once && std::io::stdout().is_terminal(),
        interactive: !once,
    };
    let handle = Scheduler::new(Arc::new(client), settings_rx).spawn(presenter);
    let mut snapshots = handle.subscribe();

    let (enter_tx, mut enter_rx) = mpsc::unbounded_channel();
    if !once {
        spawn_stdin_reader(enter_tx);
    }

    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!(event = "cli.watch.interrupted");
                break Ok(());
            }
            Some(()) = enter_rx.recv(), if !once => {
                debug!(event = "cli.watch.refresh_requested");
                if !handle.refresh_now() {
                    eprintln!("{}", color::error("Scheduler stopped unexpectedly"));
                    break Err("Scheduler stopped unexpectedly".into());
                }
            }
            changed = snapshots.changed() => {
                if let Some(result) = on_snapshot(changed, &mut snapshots, once) {
                    break result;
                }
            }
        }
    };

    handle.shutdown().await;
    drop(settings_tx);
    result
}

/// Forward each line read from stdin as a refresh request.
///
/// Runs on a plain thread: a blocking stdin read would otherwise hold up
/// runtime shutdown.
fn spawn_stdin_reader(tx: mpsc::UnboundedSender<()>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            if line.is_err() || tx.send(()).is_err() {
                break;
            }
        }
        debug!(event = "cli.watch.stdin_closed");
    });
}

/// React to a snapshot publication. `Some` ends the session: the scheduler
/// stopped, or the single cycle of `--once` completed.
fn on_snapshot(
    changed: Result<(), watch::error::RecvError>,
    snapshots: &mut watch::Receiver<Arc<Snapshot>>,
    once: bool,
) -> Option<Result<(), Box<dyn std::error::Error>>> {
    if changed.is_err() {
        error!(event = "cli.watch.scheduler_stopped");
        eprintln!("{}", color::error("Scheduler stopped unexpectedly"));
        return Some(Err("Scheduler stopped unexpectedly".into()));
    }
    if !once {
        return None;
    }
    let snapshot = Arc::clone(&snapshots.borrow_and_update());
    Some(once_result(&snapshot))
}

fn once_result(snapshot: &Snapshot) -> Result<(), Box<dyn std::error::Error>> {
    if snapshot.missing_token {
        return Err(report_error(
            "Cannot fetch deployments",
            FetchError::MissingToken,
        ));
    }
    match &snapshot.last_error {
        Some(e) => Err(report_error("Failed to fetch deployments", e.clone())),
        None => Ok(()),
    }
}

/// Renders snapshots to the terminal.
struct TerminalPresenter {
    clear_screen: bool,
    /// Long-running session: report cycle errors inline and show key hints.
    interactive: bool,
}

impl TerminalPresenter {
    fn render(&self, snapshot: &Snapshot, now: DateTime<Utc>) {
        if self.clear_screen {
            print!("\x1b[2J\x1b[H");
        }

        if self.interactive {
            if snapshot.missing_token {
                eprintln!("{}", color::warning(&FetchError::MissingToken.to_string()));
            } else if let Some(e) = &snapshot.last_error {
                eprintln!(
                    "{}",
                    color::error(&format!("Fetch failed: {}. Showing last known results.", e))
                );
            }
        }

        if snapshot.fetched_at.is_some() {
            print_deployments(&snapshot.deployments, now);
        }
        if let Some(line) = status_line(snapshot, self.interactive) {
            println!("{}", line);
        }
        let _ = std::io::stdout().flush();
    }
}

impl Presenter for TerminalPresenter {
    fn present(&mut self, _outcome: &FetchOutcome, snapshot: &Snapshot) {
        self.render(snapshot, Utc::now());
    }

    // Redraw so the Age column keeps moving between cycles.
    fn tick(&mut self, snapshot: &Snapshot) {
        if self.clear_screen && snapshot.fetched_at.is_some() {
            self.render(snapshot, Utc::now());
        }
    }
}

fn status_line(snapshot: &Snapshot, interactive: bool) -> Option<String> {
    let fetched_at = snapshot.fetched_at?;
    let pace = if snapshot.has_active { "fast" } else { "idle" };
    let mut line = format!(
        "{} deployment(s) · updated {} · {} polling",
        snapshot.deployments.len(),
        fetched_at.with_timezone(&Local).format("%H:%M:%S"),
        pace
    );
    if interactive {
        line.push_str(" · Enter refreshes, Ctrl-C quits");
    }
    Some(color::muted(&line))
}

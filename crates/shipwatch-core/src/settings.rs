//! Live settings reload.
//!
//! Watches the directories holding the config files and republishes the
//! merged configuration on the scheduler's settings channel whenever one of
//! those files is created, modified, or removed. A config directory that does
//! not exist yet is covered through its nearest existing ancestor until it
//! appears.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use shipwatch_config::{ShipwatchConfig, load_from_paths, merge_configs};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Editors often write a file in several steps; wait this long for the
/// burst to settle before reloading.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(100);

/// Reloads configuration files on change. Stops when dropped.
pub struct SettingsWatcher {
    task: JoinHandle<()>,
}

impl SettingsWatcher {
    /// Start watching `paths` and publish reloads on `settings`.
    ///
    /// `overlay` holds command-line overrides; it is merged over every
    /// reloaded configuration so they survive file edits.
    ///
    /// Returns `None` if nothing on the way to any config file exists or the
    /// platform watcher cannot be created; settings then stay fixed for the
    /// session.
    pub fn spawn(
        paths: Vec<PathBuf>,
        overlay: ShipwatchConfig,
        settings: watch::Sender<Arc<ShipwatchConfig>>,
    ) -> Option<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        let watcher = match notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        }) {
            Ok(w) => w,
            Err(e) => {
                warn!(
                    event = "core.settings.watcher_create_failed",
                    error = %e,
                    "Settings will not reload until restart"
                );
                return None;
            }
        };

        let mut dirs = WatchedDirs {
            watcher,
            watched: HashSet::new(),
        };
        dirs.sync(&paths);

        if dirs.watched.is_empty() {
            debug!(event = "core.settings.nothing_to_watch");
            return None;
        }

        info!(event = "core.settings.watcher_started", dirs = dirs.watched.len());

        let task = tokio::spawn(reload_loop(paths, overlay, dirs, rx, settings));
        Some(Self { task })
    }
}

impl Drop for SettingsWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The platform watcher plus the directories it currently covers.
struct WatchedDirs {
    watcher: RecommendedWatcher,
    watched: HashSet<PathBuf>,
}

impl WatchedDirs {
    /// Watch the parent of every config file, or its nearest existing
    /// ancestor while the parent is missing. Safe to call repeatedly.
    fn sync(&mut self, paths: &[PathBuf]) {
        // Deleted directories lose their watch; cover them from above again.
        self.watched.retain(|d| d.is_dir());

        for dir in paths.iter().filter_map(|p| p.parent()) {
            let Some(target) = nearest_existing(dir) else {
                debug!(event = "core.settings.dir_missing", path = %dir.display());
                continue;
            };
            if self.watched.contains(target) {
                continue;
            }
            match self.watcher.watch(target, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    debug!(
                        event = "core.settings.dir_watched",
                        path = %target.display(),
                        ancestor = target != dir,
                    );
                    self.watched.insert(target.to_path_buf());
                }
                Err(e) => warn!(
                    event = "core.settings.watch_failed",
                    path = %target.display(),
                    error = %e,
                ),
            }
        }
    }
}

fn nearest_existing(dir: &Path) -> Option<&Path> {
    dir.ancestors().find(|d| !d.as_os_str().is_empty() && d.is_dir())
}

async fn reload_loop(
    paths: Vec<PathBuf>,
    overlay: ShipwatchConfig,
    mut dirs: WatchedDirs,
    mut events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    settings: watch::Sender<Arc<ShipwatchConfig>>,
) {
    while let Some(event) = events.recv().await {
        if !is_config_event(&event, &paths) {
            continue;
        }

        tokio::time::sleep(DEBOUNCE_INTERVAL).await;
        while events.try_recv().is_ok() {}

        if settings.is_closed() {
            break;
        }
        // A newly created config directory gets its own watch before the
        // reload, so later writes inside it are seen.
        dirs.sync(&paths);
        reload(&paths, &overlay, &settings);
    }
    debug!(event = "core.settings.watcher_stopped");
}

fn is_config_event(event: &notify::Result<Event>, paths: &[PathBuf]) -> bool {
    let event = match event {
        Ok(event) => event,
        Err(e) => {
            warn!(event = "core.settings.event_error", error = %e);
            return false;
        }
    };

    if !matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return false;
    }

    event
        .paths
        .iter()
        .any(|changed| paths.iter().any(|p| touches_config(changed, p)))
}

/// Whether a change at `changed` can affect the config file at `config`:
/// the file itself or a directory on its path.
///
/// Some platform watchers report canonicalized paths, so the trailing
/// `<dir>/<file>` or `<dir>` components are also accepted.
fn touches_config(changed: &Path, config: &Path) -> bool {
    if config.starts_with(changed) && changed.file_name().is_some() {
        return true;
    }
    let Some(dir) = config.parent() else {
        return false;
    };
    match (dir.file_name(), config.file_name()) {
        (Some(dir_name), Some(file_name)) => {
            changed.ends_with(Path::new(dir_name).join(file_name)) || changed.ends_with(dir_name)
        }
        _ => false,
    }
}

/// Reload and publish if the merged result differs. A broken file keeps the
/// previous settings.
fn reload(
    paths: &[PathBuf],
    overlay: &ShipwatchConfig,
    settings: &watch::Sender<Arc<ShipwatchConfig>>,
) {
    match load_from_paths(paths) {
        Ok(loaded) => {
            let config = merge_configs(loaded, overlay.clone());
            let updated = settings.send_if_modified(|current| {
                if **current == config {
                    false
                } else {
                    *current = Arc::new(config);
                    true
                }
            });
            info!(event = "core.settings.reloaded", changed = updated);
        }
        Err(e) => {
            warn!(
                event = "core.settings.reload_failed",
                error = %e,
                "Keeping previous settings"
            );
        }
    }
}

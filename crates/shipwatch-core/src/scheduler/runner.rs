//! The polling loop.
//!
//! One tokio task owns the timeline: a fetch timer re-armed after every
//! cycle, a one-second display tick, manual refresh requests, settings
//! changes, and shutdown. Cycles run inline on that task, so two cycles never
//! overlap; refresh requests that arrive mid-cycle collapse into a single
//! pending request.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use shipwatch_config::ShipwatchConfig;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::aggregate::fetch_all;
use crate::api::DeploymentSource;
use crate::deployments::filter;
use crate::scheduler::cadence::CadenceController;
use crate::scheduler::snapshot::{FetchOutcome, Snapshot};

/// Period of the display tick delivered to [`Presenter::tick`].
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Stand-in deadline when `now + delay` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Receives the scheduler's output on the scheduler task.
pub trait Presenter: Send + 'static {
    /// Called once per completed cycle, after the snapshot is published.
    fn present(&mut self, outcome: &FetchOutcome, snapshot: &Snapshot);

    /// Called every [`TICK_INTERVAL`] between cycles.
    fn tick(&mut self, _snapshot: &Snapshot) {}
}

/// Run one aggregation cycle and filter the result.
pub async fn run_cycle(source: &dyn DeploymentSource, config: &ShipwatchConfig) -> FetchOutcome {
    let result = fetch_all(source, config)
        .await
        .map(|records| filter(records, config));
    FetchOutcome::from_result(result, Utc::now())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Timer,
    Manual,
    Settings,
}

impl Trigger {
    fn as_str(self) -> &'static str {
        match self {
            Trigger::Timer => "timer",
            Trigger::Manual => "manual",
            Trigger::Settings => "settings",
        }
    }
}

/// Adaptive two-speed poller.
pub struct Scheduler {
    source: Arc<dyn DeploymentSource>,
    settings: watch::Receiver<Arc<ShipwatchConfig>>,
}

impl Scheduler {
    /// The current settings value is read at the start of every cycle.
    pub fn new(
        source: Arc<dyn DeploymentSource>,
        settings: watch::Receiver<Arc<ShipwatchConfig>>,
    ) -> Self {
        Self { source, settings }
    }

    /// Start the loop on the current tokio runtime. The first cycle runs
    /// immediately.
    pub fn spawn<P: Presenter>(self, presenter: P) -> SchedulerHandle {
        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(Snapshot::default()));
        let shutdown = CancellationToken::new();

        let task = tokio::spawn(self.run(presenter, refresh_rx, snapshot_tx, shutdown.clone()));

        SchedulerHandle {
            refresh_tx,
            snapshot_rx,
            shutdown,
            task,
        }
    }

    async fn run<P: Presenter>(
        mut self,
        mut presenter: P,
        mut refresh_rx: mpsc::Receiver<()>,
        snapshot_tx: watch::Sender<Arc<Snapshot>>,
        shutdown: CancellationToken,
    ) {
        let mut cadence = CadenceController::new();
        let mut snapshot = Arc::new(Snapshot::default());
        let mut next_fetch = Instant::now();
        let mut settings_open = true;

        let mut tick = interval(TICK_INTERVAL);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tick.reset();

        info!(event = "core.scheduler.started");

        loop {
            let trigger = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                Some(()) = refresh_rx.recv() => Trigger::Manual,
                changed = self.settings.changed(), if settings_open => match changed {
                    Ok(()) => Trigger::Settings,
                    Err(_) => {
                        debug!(event = "core.scheduler.settings_closed");
                        settings_open = false;
                        continue;
                    }
                },
                _ = sleep_until(next_fetch) => Trigger::Timer,
                _ = tick.tick() => {
                    presenter.tick(&snapshot);
                    continue;
                }
            };

            let config = Arc::clone(&self.settings.borrow_and_update());
            debug!(
                event = "core.scheduler.cycle_started",
                trigger = trigger.as_str(),
                cycle = snapshot.cycle + 1,
            );

            let outcome = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                outcome = run_cycle(self.source.as_ref(), &config) => outcome,
            };

            let next_cadence = cadence.observe(&outcome);
            let delay = cadence.next_interval(&config.polling);
            next_fetch = deadline_after(delay);

            snapshot = Arc::new(snapshot.apply(&outcome));
            snapshot_tx.send_replace(Arc::clone(&snapshot));

            match &outcome {
                FetchOutcome::Success { deployments, .. } => info!(
                    event = "core.scheduler.cycle_completed",
                    cycle = snapshot.cycle,
                    count = deployments.len(),
                    cadence = ?next_cadence,
                    next_in_ms = millis(delay),
                ),
                FetchOutcome::MissingToken => warn!(
                    event = "core.scheduler.cycle_skipped",
                    cycle = snapshot.cycle,
                    reason = "missing_token",
                ),
                FetchOutcome::Failure(e) => warn!(
                    event = "core.scheduler.cycle_failed",
                    cycle = snapshot.cycle,
                    error = %e,
                    next_in_ms = millis(delay),
                ),
            }

            presenter.present(&outcome, &snapshot);
        }

        info!(event = "core.scheduler.stopped");
    }
}

fn deadline_after(delay: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(delay)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

fn millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

/// Control surface for a running [`Scheduler`].
pub struct SchedulerHandle {
    refresh_tx: mpsc::Sender<()>,
    snapshot_rx: watch::Receiver<Arc<Snapshot>>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Request an immediate cycle.
    ///
    /// While a request is already pending this is a no-op, so bursts of
    /// requests produce one extra cycle. Returns `false` once the scheduler
    /// has stopped.
    pub fn refresh_now(&self) -> bool {
        match self.refresh_tx.try_send(()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(())) => {
                debug!(event = "core.scheduler.refresh_coalesced");
                true
            }
            Err(mpsc::error::TrySendError::Closed(())) => false,
        }
    }

    /// Observe published snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshot_rx.clone()
    }

    /// Token that stops the scheduler when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Stop the loop and wait for the task to finish. An in-flight cycle is
    /// abandoned.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.task.await {
            warn!(event = "core.scheduler.join_failed", error = %e);
        }
    }
}

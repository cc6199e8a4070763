//! Two-speed polling cadence.

use std::time::Duration;

use shipwatch_config::PollingConfig;

use crate::scheduler::snapshot::FetchOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cadence {
    /// Nothing is building; poll slowly.
    #[default]
    Idle,
    /// At least one visible deployment is queued or building.
    Active,
}

/// Latches the cadence from the outcome of the most recent cycle.
///
/// Failures and a missing token count as "nothing active", so a broken
/// cycle never keeps the scheduler on the fast interval.
#[derive(Debug, Default)]
pub struct CadenceController {
    cadence: Cadence,
}

impl CadenceController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn observe(&mut self, outcome: &FetchOutcome) -> Cadence {
        self.cadence = if outcome.has_active() {
            Cadence::Active
        } else {
            Cadence::Idle
        };
        self.cadence
    }

    /// Delay until the next scheduled cycle.
    pub fn next_interval(&self, polling: &PollingConfig) -> Duration {
        match self.cadence {
            Cadence::Idle => polling.idle_interval(),
            Cadence::Active => polling.active_interval(),
        }
    }
}

//! Per-cycle outcomes and the shared result they fold into.

use chrono::{DateTime, Utc};

use crate::aggregate::FetchError;
use crate::api::Deployment;
use crate::deployments::has_active;

/// What a single fetch cycle produced. Exactly one per cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    MissingToken,
    Success {
        /// Filtered, newest first.
        deployments: Vec<Deployment>,
        fetched_at: DateTime<Utc>,
    },
    Failure(FetchError),
}

impl FetchOutcome {
    /// Build an outcome from an aggregation result.
    pub fn from_result(
        result: Result<Vec<Deployment>, FetchError>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        match result {
            Ok(deployments) => FetchOutcome::Success {
                deployments,
                fetched_at,
            },
            Err(FetchError::MissingToken) => FetchOutcome::MissingToken,
            Err(e) => FetchOutcome::Failure(e),
        }
    }

    /// True only for a successful cycle with a queued or building deployment.
    pub fn has_active(&self) -> bool {
        match self {
            FetchOutcome::Success { deployments, .. } => has_active(deployments),
            FetchOutcome::MissingToken | FetchOutcome::Failure(_) => false,
        }
    }
}

/// The latest published state of the poller.
///
/// Replaced wholesale at the end of every cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub deployments: Vec<Deployment>,
    /// Error of the most recent cycle, cleared by the next success.
    pub last_error: Option<FetchError>,
    /// Time of the last successful fetch.
    pub fetched_at: Option<DateTime<Utc>>,
    pub missing_token: bool,
    pub has_active: bool,
    /// Number of completed cycles.
    pub cycle: u64,
}

impl Snapshot {
    /// Fold one cycle outcome into the next snapshot.
    ///
    /// A failure keeps the previously shown deployments; a missing token
    /// clears them.
    pub fn apply(&self, outcome: &FetchOutcome) -> Snapshot {
        let cycle = self.cycle + 1;
        match outcome {
            FetchOutcome::Success {
                deployments,
                fetched_at,
            } => Snapshot {
                deployments: deployments.clone(),
                last_error: None,
                fetched_at: Some(*fetched_at),
                missing_token: false,
                has_active: outcome.has_active(),
                cycle,
            },
            FetchOutcome::Failure(error) => Snapshot {
                deployments: self.deployments.clone(),
                last_error: Some(error.clone()),
                fetched_at: self.fetched_at,
                missing_token: false,
                has_active: false,
                cycle,
            },
            FetchOutcome::MissingToken => Snapshot {
                deployments: Vec::new(),
                last_error: None,
                fetched_at: None,
                missing_token: true,
                has_active: false,
                cycle,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::test_support::deployment;
    use crate::api::{ApiError, DeploymentState};

    fn failure() -> FetchOutcome {
        FetchOutcome::Failure(FetchError::Api(ApiError::Transport {
            url: "https://api.vercel.com/v6/deployments".to_string(),
            message: "timed out".to_string(),
        }))
    }

    #[test]
    fn test_from_result() {
        let now = Utc::now();
        assert_eq!(
            FetchOutcome::from_result(Err(FetchError::MissingToken), now),
            FetchOutcome::MissingToken
        );
        assert!(matches!(
            FetchOutcome::from_result(Ok(vec![]), now),
            FetchOutcome::Success { .. }
        ));
        assert!(!failure().has_active());
    }

    #[test]
    fn test_success_replaces_snapshot() {
        let mut building = deployment("a", "web", 2);
        building.state = DeploymentState::Building;
        let now = Utc::now();
        let outcome = FetchOutcome::Success {
            deployments: vec![building.clone()],
            fetched_at: now,
        };

        let snapshot = Snapshot::default().apply(&outcome);
        assert_eq!(snapshot.deployments, vec![building]);
        assert_eq!(snapshot.fetched_at, Some(now));
        assert!(snapshot.has_active);
        assert_eq!(snapshot.cycle, 1);
    }

    #[test]
    fn test_failure_keeps_previous_deployments() {
        let now = Utc::now();
        let first = Snapshot::default().apply(&FetchOutcome::Success {
            deployments: vec![deployment("a", "web", 1)],
            fetched_at: now,
        });

        let second = first.apply(&failure());
        assert_eq!(second.deployments, first.deployments);
        assert_eq!(second.fetched_at, Some(now));
        assert!(second.last_error.is_some());
        assert!(!second.has_active);
        assert_eq!(second.cycle, 2);

        let third = second.apply(&FetchOutcome::Success {
            deployments: vec![],
            fetched_at: now,
        });
        assert!(third.last_error.is_none());
    }

    #[test]
    fn test_missing_token_clears_deployments() {
        let first = Snapshot::default().apply(&FetchOutcome::Success {
            deployments: vec![deployment("a", "web", 1)],
            fetched_at: Utc::now(),
        });
        let second = first.apply(&FetchOutcome::MissingToken);
        assert!(second.deployments.is_empty());
        assert!(second.missing_token);
        assert!(second.fetched_at.is_none());
    }
}

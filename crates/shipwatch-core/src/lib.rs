//! shipwatch-core: Core library for watching deployments across scopes
//!
//! Fetches deployments from a deployment-hosting API across the personal
//! account and any number of teams and projects, merges and filters them,
//! and polls on an adaptive schedule. Used by the `shipwatch` CLI.
//!
//! # Main Entry Points
//!
//! - [`api`] - Remote API client and the `DeploymentSource` seam
//! - [`aggregate`] - Multi-scope fetch with partial-failure joins
//! - [`deployments`] - Merge and filter
//! - [`scheduler`] - Two-speed adaptive polling loop
//! - [`settings`] - Live config reload

pub mod aggregate;
pub mod api;
pub mod deployments;
pub mod errors;
pub mod logging;
pub mod scheduler;
pub mod settings;

pub use aggregate::{FetchError, JoinPolicy, fetch_all, join_fetches};
pub use api::{
    ApiError, CommitMeta, Deployment, DeploymentSource, DeploymentState, PAGE_SIZE, Project,
    Team, VercelClient,
};
pub use deployments::{filter, filter_at, has_active, merge};
pub use errors::{ShipwatchError, ShipwatchResult};
pub use scheduler::{
    Cadence, CadenceController, FetchOutcome, Presenter, Scheduler, SchedulerHandle, Snapshot,
    run_cycle,
};
pub use settings::SettingsWatcher;

// Re-export config types from shipwatch-config
pub use shipwatch_config::{
    ConfigError, FilterConfig, PollingConfig, ProjectSelector, ScopeConfig, ScopeId,
    ScopeSelector, ShipwatchConfig,
};

pub use logging::init_logging;

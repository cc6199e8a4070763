//! Declarative inclusion rules over merged deployments.
//!
//! Per record, rules run in order and the record is dropped at the first
//! failure: project allow-list, state toggle, environment toggle, branch
//! allow-list. Afterwards exactly one cap applies: the count cap when set,
//! otherwise the age cap.

use chrono::{DateTime, Utc};
use shipwatch_config::{FilterConfig, ShipwatchConfig};

use crate::api::types::{Deployment, DeploymentState};
use crate::deployments::merge::sort_newest_first;

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Apply the configured filters using the current wall clock.
pub fn filter(records: Vec<Deployment>, config: &ShipwatchConfig) -> Vec<Deployment> {
    filter_at(records, config, Utc::now())
}

/// Apply the configured filters as of `now`.
pub fn filter_at(
    mut records: Vec<Deployment>,
    config: &ShipwatchConfig,
    now: DateTime<Utc>,
) -> Vec<Deployment> {
    let projects = config.scope.project_selector();
    let project_allow = projects.names();
    let filters = &config.filter;

    sort_newest_first(&mut records);
    records.retain(|d| {
        project_allowed(d, project_allow)
            && state_allowed(d.state, filters)
            && environment_allowed(d, filters)
            && branch_allowed(d, filters.branches())
    });

    if let Some(max_count) = filters.max_count() {
        records.truncate(max_count);
    } else if let Some(hours) = filters.max_age_hours() {
        let cutoff = now.timestamp_millis() - i64::from(hours) * MILLIS_PER_HOUR;
        records.retain(|d| d.created_at >= cutoff);
    }

    sort_newest_first(&mut records);
    records
}

fn project_allowed(deployment: &Deployment, allow: &[String]) -> bool {
    allow.is_empty()
        || allow
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&deployment.project))
}

fn state_allowed(state: DeploymentState, filters: &FilterConfig) -> bool {
    let states = &filters.states;
    match state {
        DeploymentState::Queued => states.queued(),
        DeploymentState::Building => states.building(),
        DeploymentState::Ready => states.ready(),
        DeploymentState::Error => states.error(),
        DeploymentState::Canceled => states.canceled(),
        DeploymentState::Unknown => true,
    }
}

fn environment_allowed(deployment: &Deployment, filters: &FilterConfig) -> bool {
    let Some(target) = deployment.target.as_deref() else {
        return true;
    };
    if target.eq_ignore_ascii_case("production") {
        filters.environments.production()
    } else if target.eq_ignore_ascii_case("preview") {
        filters.environments.preview()
    } else {
        true
    }
}

fn branch_allowed(deployment: &Deployment, allow: &[String]) -> bool {
    if allow.is_empty() {
        return true;
    }
    let branch = deployment.branch();
    !branch.is_empty() && allow.iter().any(|b| b.eq_ignore_ascii_case(branch))
}

/// True when any deployment is queued or building.
pub fn has_active(records: &[Deployment]) -> bool {
    records.iter().any(Deployment::is_active)
}

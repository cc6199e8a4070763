//! Multi-scope, multi-project aggregation.
//!
//! Decides which requests to make for the configured scope and project
//! selectors, issues them concurrently, and merges the results. The order of
//! precedence is:
//!
//! 1. no token: fail without touching the network
//! 2. one scope, one project target: a single request, errors unchanged
//! 3. one scope, several projects: per-project requests, lenient join
//! 4. several scopes: scopes x projects, lenient join
//! 5. no explicit scope: enumerate teams, then personal + every team as in 4;
//!    if enumeration fails, personal scope only with a strict join

use shipwatch_config::{ProjectSelector, ScopeId, ScopeSelector, ShipwatchConfig};
use tracing::{debug, info, warn};

use crate::aggregate::errors::FetchError;
use crate::aggregate::join::{JoinPolicy, join_fetches};
use crate::api::{ApiError, Deployment, DeploymentSource, PAGE_SIZE};
use crate::deployments::merge;

/// Fetch and merge deployments for every configured scope and project.
///
/// The result is deduplicated and sorted newest first but not filtered.
pub async fn fetch_all(
    source: &dyn DeploymentSource,
    config: &ShipwatchConfig,
) -> Result<Vec<Deployment>, FetchError> {
    let Some(token) = config.api.token() else {
        debug!(event = "core.aggregate.fetch_skipped", reason = "missing_token");
        return Err(FetchError::MissingToken);
    };

    let targets = project_targets(&config.scope.project_selector());

    let records = match config.scope.scope_selector() {
        ScopeSelector::Explicit(scopes) if scopes.len() == 1 => {
            let scope = &scopes[0];
            if targets.len() == 1 {
                fetch_one(source, token, scope, targets[0].as_deref()).await?
            } else {
                let tasks = targets
                    .iter()
                    .map(|project| fetch_one(source, token, scope, project.as_deref()))
                    .collect();
                join_fetches(tasks, JoinPolicy::Lenient).await?
            }
        }
        ScopeSelector::Explicit(scopes) => {
            fetch_matrix(source, token, &scopes, &targets, JoinPolicy::Lenient).await?
        }
        ScopeSelector::All => match source.list_teams(token).await {
            Ok(teams) => {
                let mut scopes = Vec::with_capacity(teams.len() + 1);
                scopes.push(ScopeId::Personal);
                scopes.extend(teams.into_iter().map(|team| ScopeId::Team(team.id)));
                debug!(event = "core.aggregate.scopes_discovered", count = scopes.len());
                fetch_matrix(source, token, &scopes, &targets, JoinPolicy::Lenient).await?
            }
            Err(e) => {
                warn!(
                    event = "core.aggregate.scope_discovery_failed",
                    error = %e,
                    fallback = "personal",
                );
                fetch_matrix(
                    source,
                    token,
                    &[ScopeId::Personal],
                    &targets,
                    JoinPolicy::Strict,
                )
                .await?
            }
        },
    };

    let merged = merge(records);
    info!(event = "core.aggregate.fetch_completed", count = merged.len());
    Ok(merged)
}

/// `None` means "all projects" (no `app` parameter).
fn project_targets(selector: &ProjectSelector) -> Vec<Option<String>> {
    match selector {
        ProjectSelector::All => vec![None],
        ProjectSelector::Explicit(names) => names.iter().cloned().map(Some).collect(),
    }
}

async fn fetch_matrix(
    source: &dyn DeploymentSource,
    token: &str,
    scopes: &[ScopeId],
    targets: &[Option<String>],
    policy: JoinPolicy,
) -> Result<Vec<Deployment>, ApiError> {
    let tasks = scopes
        .iter()
        .flat_map(|scope| {
            targets
                .iter()
                .map(move |project| fetch_one(source, token, scope, project.as_deref()))
        })
        .collect();
    join_fetches(tasks, policy).await
}

async fn fetch_one(
    source: &dyn DeploymentSource,
    token: &str,
    scope: &ScopeId,
    project: Option<&str>,
) -> Result<Vec<Deployment>, ApiError> {
    let result = source
        .list_deployments(token, scope, project, PAGE_SIZE)
        .await;
    match &result {
        Ok(records) => debug!(
            event = "core.aggregate.task_completed",
            scope = %scope,
            project = project.unwrap_or("*"),
            count = records.len(),
        ),
        Err(e) => warn!(
            event = "core.aggregate.task_failed",
            scope = %scope,
            project = project.unwrap_or("*"),
            error = %e,
        ),
    }
    result
}

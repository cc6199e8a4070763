//! Deployment source trait definition.

use async_trait::async_trait;
use shipwatch_config::ScopeId;

use crate::api::errors::ApiError;
use crate::api::types::{Deployment, Project, Team};

/// Interface to the remote deployment-hosting API.
///
/// Each method is a single request: no retries, no pagination beyond the
/// first page. `VercelClient` is the production implementation; the
/// aggregation engine and scheduler only see this trait.
#[async_trait]
pub trait DeploymentSource: Send + Sync {
    /// List the teams the token can access.
    async fn list_teams(&self, token: &str) -> Result<Vec<Team>, ApiError>;

    /// List projects in a scope.
    async fn list_projects(&self, token: &str, scope: &ScopeId) -> Result<Vec<Project>, ApiError>;

    /// List deployments in a scope, optionally narrowed to one project name.
    async fn list_deployments(
        &self,
        token: &str,
        scope: &ScopeId,
        project: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Deployment>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::test_support::deployment;

    struct MockSource;

    #[async_trait]
    impl DeploymentSource for MockSource {
        async fn list_teams(&self, _token: &str) -> Result<Vec<Team>, ApiError> {
            Ok(vec![])
        }

        async fn list_projects(
            &self,
            _token: &str,
            _scope: &ScopeId,
        ) -> Result<Vec<Project>, ApiError> {
            Err(ApiError::Http {
                status: 404,
                body: String::new(),
            })
        }

        async fn list_deployments(
            &self,
            _token: &str,
            _scope: &ScopeId,
            project: Option<&str>,
            _limit: u32,
        ) -> Result<Vec<Deployment>, ApiError> {
            Ok(vec![deployment("d1", project.unwrap_or("any"), 1)])
        }
    }

    #[tokio::test]
    async fn test_source_is_object_safe() {
        let source: Box<dyn DeploymentSource> = Box::new(MockSource);
        assert!(source.list_teams("t").await.unwrap().is_empty());
        assert!(
            source
                .list_projects("t", &ScopeId::Personal)
                .await
                .is_err()
        );
        let deployments = source
            .list_deployments("t", &ScopeId::Personal, Some("web"), 100)
            .await
            .unwrap();
        assert_eq!(deployments[0].project, "web");
    }
}

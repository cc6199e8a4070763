//! HTTP implementation of [`DeploymentSource`] for the Vercel REST API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shipwatch_config::{ApiConfig, ScopeId};
use tracing::{debug, warn};

use crate::api::errors::ApiError;
use crate::api::traits::DeploymentSource;
use crate::api::types::{
    Deployment, DeploymentsResponse, Project, ProjectsResponse, Team, TeamsResponse,
};

/// Page size for every list request. Only the first page is read.
pub const PAGE_SIZE: u32 = 100;

const TEAMS_PATH: &str = "/v2/teams";
const PROJECTS_PATH: &str = "/v9/projects";
const DEPLOYMENTS_PATH: &str = "/v6/deployments";

/// Bearer-token client for the remote deployment API.
#[derive(Debug, Clone)]
pub struct VercelClient {
    http: reqwest::Client,
    base_url: String,
}

impl VercelClient {
    /// Build a client from the `[api]` settings (base URL and timeouts).
    ///
    /// The token is not captured here; it is passed per request so that
    /// settings edits take effect on the next cycle.
    pub fn new(api: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("shipwatch/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(api.connect_timeout())
            .timeout(api.request_timeout())
            .build()
            .map_err(|e| ApiError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: api.base_url().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(event = "core.api.request_started", path = path, query = ?query);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                warn!(event = "core.api.request_failed", path = path, error = %e);
                ApiError::Transport {
                    url: url.clone(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Transport {
            url: url.clone(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            warn!(
                event = "core.api.request_rejected",
                path = path,
                status = status.as_u16(),
            );
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let decoded = serde_json::from_str(&body).map_err(|e| {
            warn!(event = "core.api.decode_failed", path = path, error = %e);
            ApiError::Decode {
                url: url.clone(),
                message: e.to_string(),
            }
        })?;

        debug!(event = "core.api.request_completed", path = path, status = status.as_u16());
        Ok(decoded)
    }
}

/// Query parameters shared by the scoped list endpoints.
///
/// The personal scope omits `teamId`; `app` is only sent for a named project.
pub(crate) fn scoped_query(
    scope: &ScopeId,
    project: Option<&str>,
    limit: u32,
) -> Vec<(&'static str, String)> {
    let mut query = vec![("limit", limit.to_string())];
    if let Some(team_id) = scope.team_id() {
        query.push(("teamId", team_id.to_string()));
    }
    if let Some(project) = project {
        query.push(("app", project.to_string()));
    }
    query
}

#[async_trait]
impl DeploymentSource for VercelClient {
    async fn list_teams(&self, token: &str) -> Result<Vec<Team>, ApiError> {
        let response: TeamsResponse = self
            .get_json(token, TEAMS_PATH, &[("limit", PAGE_SIZE.to_string())])
            .await?;
        Ok(response.teams.into_iter().map(Team::from).collect())
    }

    async fn list_projects(&self, token: &str, scope: &ScopeId) -> Result<Vec<Project>, ApiError> {
        let query = scoped_query(scope, None, PAGE_SIZE);
        let response: ProjectsResponse = self.get_json(token, PROJECTS_PATH, &query).await?;
        Ok(response.projects.into_iter().map(Project::from).collect())
    }

    async fn list_deployments(
        &self,
        token: &str,
        scope: &ScopeId,
        project: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Deployment>, ApiError> {
        let query = scoped_query(scope, project, limit);
        let response: DeploymentsResponse = self.get_json(token, DEPLOYMENTS_PATH, &query).await?;
        Ok(response
            .deployments
            .into_iter()
            .map(Deployment::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_query_personal_without_project() {
        let query = scoped_query(&ScopeId::Personal, None, 100);
        assert_eq!(query, vec![("limit", "100".to_string())]);
    }

    #[test]
    fn test_scoped_query_team_with_project() {
        let query = scoped_query(&ScopeId::Team("team_1".to_string()), Some("web"), 100);
        assert_eq!(
            query,
            vec![
                ("limit", "100".to_string()),
                ("teamId", "team_1".to_string()),
                ("app", "web".to_string()),
            ]
        );
    }

    #[test]
    fn test_client_uses_configured_base_url() {
        let api = ApiConfig {
            base_url: Some("http://127.0.0.1:9/".to_string()),
            ..Default::default()
        };
        let client = VercelClient::new(&api).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9");
    }
}

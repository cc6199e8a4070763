//! Domain types for scopes, projects and deployments, plus their wire forms.
//!
//! Wire structs mirror the remote JSON and are converted into the domain
//! types at the client boundary, so nothing past `api::client` sees raw
//! field names.

use serde::{Deserialize, Serialize};

/// A team the token can access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// Lifecycle state of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentState {
    Queued,
    Building,
    Ready,
    Error,
    Canceled,
    /// Any value the API reports that is not one of the above.
    Unknown,
}

impl DeploymentState {
    /// Decode a raw API value. Never fails: unrecognized values become `Unknown`.
    pub fn from_api(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "QUEUED" => Self::Queued,
            "BUILDING" => Self::Building,
            "READY" => Self::Ready,
            "ERROR" => Self::Error,
            "CANCELED" => Self::Canceled,
            _ => Self::Unknown,
        }
    }

    /// Non-terminal states that accelerate polling.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Queued | Self::Building)
    }
}

impl std::fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Building => write!(f, "building"),
            Self::Ready => write!(f, "ready"),
            Self::Error => write!(f, "error"),
            Self::Canceled => write!(f, "canceled"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Source-control metadata attached to a deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMeta {
    pub branch: Option<String>,
    pub message: Option<String>,
}

/// One build/release event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Globally unique; the merge key.
    pub id: String,
    pub project: String,
    /// Host name without scheme, as reported by the API.
    pub url: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    pub state: DeploymentState,
    pub ready_at: Option<i64>,
    pub building_at: Option<i64>,
    /// Environment label such as "production" or "preview".
    pub target: Option<String>,
    pub commit: Option<CommitMeta>,
    pub git_source_ref: Option<String>,
    pub inspector_url: Option<String>,
}

impl Deployment {
    /// Resolved branch: git-source ref first, then commit metadata, else empty.
    pub fn branch(&self) -> &str {
        self.git_source_ref
            .as_deref()
            .filter(|r| !r.is_empty())
            .or_else(|| {
                self.commit
                    .as_ref()
                    .and_then(|c| c.branch.as_deref())
                    .filter(|r| !r.is_empty())
            })
            .unwrap_or("")
    }

    /// First line of the commit message, if any.
    pub fn commit_subject(&self) -> Option<&str> {
        self.commit
            .as_ref()
            .and_then(|c| c.message.as_deref())
            .and_then(|m| m.lines().next())
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    /// Link to open: the inspector URL when present, else the deployment itself.
    pub fn link(&self) -> String {
        match self.inspector_url.as_deref().filter(|u| !u.is_empty()) {
            Some(inspector) => inspector.to_string(),
            None if self.url.starts_with("http://") || self.url.starts_with("https://") => {
                self.url.clone()
            }
            None => format!("https://{}", self.url),
        }
    }

    pub fn building_started_at(&self) -> i64 {
        self.building_at.unwrap_or(self.created_at)
    }

    /// Milliseconds from build start to ready, when both are known.
    pub fn build_duration_ms(&self) -> Option<i64> {
        self.ready_at
            .map(|ready| ready - self.building_started_at())
            .filter(|d| *d >= 0)
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}

// --- Wire forms ---

#[derive(Debug, Deserialize)]
pub(crate) struct TeamsResponse {
    #[serde(default)]
    pub teams: Vec<RawTeam>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTeam {
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<RawTeam> for Team {
    fn from(raw: RawTeam) -> Self {
        let slug = raw.slug.unwrap_or_else(|| raw.id.clone());
        let name = raw.name.unwrap_or_else(|| slug.clone());
        Team {
            id: raw.id,
            slug,
            name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectsResponse {
    #[serde(default)]
    pub projects: Vec<RawProject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawProject {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

impl From<RawProject> for Project {
    fn from(raw: RawProject) -> Self {
        Project {
            id: raw.id,
            name: raw.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeploymentsResponse {
    #[serde(default)]
    pub deployments: Vec<RawDeployment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawDeployment {
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    pub created: i64,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub ready_state: Option<String>,
    #[serde(default)]
    pub ready: Option<i64>,
    #[serde(default)]
    pub building_at: Option<i64>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub inspector_url: Option<String>,
    #[serde(default)]
    pub meta: Option<RawMeta>,
    #[serde(default)]
    pub git_source: Option<RawGitSource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawMeta {
    #[serde(default)]
    pub github_commit_ref: Option<String>,
    #[serde(default)]
    pub gitlab_commit_ref: Option<String>,
    #[serde(default)]
    pub bitbucket_commit_ref: Option<String>,
    #[serde(default)]
    pub github_commit_message: Option<String>,
    #[serde(default)]
    pub gitlab_commit_message: Option<String>,
    #[serde(default)]
    pub bitbucket_commit_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGitSource {
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
}

impl From<RawMeta> for CommitMeta {
    fn from(meta: RawMeta) -> Self {
        CommitMeta {
            branch: meta
                .github_commit_ref
                .or(meta.gitlab_commit_ref)
                .or(meta.bitbucket_commit_ref),
            message: meta
                .github_commit_message
                .or(meta.gitlab_commit_message)
                .or(meta.bitbucket_commit_message),
        }
    }
}

impl From<RawDeployment> for Deployment {
    fn from(raw: RawDeployment) -> Self {
        let state = raw
            .state
            .or(raw.ready_state)
            .map(|s| DeploymentState::from_api(&s))
            .unwrap_or(DeploymentState::Unknown);

        let commit = raw
            .meta
            .map(CommitMeta::from)
            .filter(|c| c.branch.is_some() || c.message.is_some());

        Deployment {
            id: raw.uid,
            project: raw.name,
            url: raw.url.unwrap_or_default(),
            created_at: raw.created,
            state,
            ready_at: raw.ready,
            building_at: raw.building_at,
            target: raw.target,
            commit,
            git_source_ref: raw.git_source.and_then(|g| g.git_ref),
            inspector_url: raw.inspector_url,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Minimal deployment for engine/merge/filter tests.
    pub fn deployment(id: &str, project: &str, created_at: i64) -> Deployment {
        Deployment {
            id: id.to_string(),
            project: project.to_string(),
            url: format!("{}-{}.vercel.app", project, id),
            created_at,
            state: DeploymentState::Ready,
            ready_at: None,
            building_at: None,
            target: None,
            commit: None,
            git_source_ref: None,
            inspector_url: None,
        }
    }
}

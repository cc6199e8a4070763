//! Configuration type definitions for shipwatch.
//!
//! These types are deserialized from TOML config files. Every field is
//! `Option<T>` so the user/project hierarchy can merge only explicitly-set
//! values; accessor methods supply the defaults.
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! token = "vercel_xxx"
//!
//! [scope]
//! teams = ["personal", "team_abc123"]
//! projects = ["web", "docs"]
//!
//! [filter]
//! branches = ["main"]
//! max_count = 20
//!
//! [filter.states]
//! canceled = false
//!
//! [filter.environments]
//! preview = false
//!
//! [polling]
//! idle_interval_secs = 30
//! active_interval_secs = 3
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reserved scope identifier meaning "personal account, no team".
pub const PERSONAL_SCOPE: &str = "personal";

pub const DEFAULT_API_BASE_URL: &str = "https://api.vercel.com";
pub const DEFAULT_IDLE_INTERVAL_SECS: u64 = 15;
pub const DEFAULT_ACTIVE_INTERVAL_SECS: u64 = 2;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Main configuration loaded from TOML config files.
///
/// Loaded from `~/.shipwatch/config.toml`, then `./.shipwatch/config.toml`,
/// then the `SHIPWATCH_TOKEN` environment variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipwatchConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub scope: ScopeConfig,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub polling: PollingConfig,
}

/// Remote API access settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bearer token. Absent or blank means no fetch can be attempted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Default: `https://api.vercel.com`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl ApiConfig {
    /// The token with surrounding whitespace removed, or `None` when blank.
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(|u| u.trim_end_matches('/'))
            .unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connect_timeout_secs
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn merge(base: &Self, override_config: &Self) -> Self {
        Self {
            token: override_config.token.clone().or(base.token.clone()),
            base_url: override_config.base_url.clone().or(base.base_url.clone()),
            connect_timeout_secs: override_config
                .connect_timeout_secs
                .or(base.connect_timeout_secs),
            request_timeout_secs: override_config
                .request_timeout_secs
                .or(base.request_timeout_secs),
        }
    }
}

/// Which scopes and projects to poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Team ids to poll; `"personal"` selects the personal account.
    /// Absent or empty means every accessible scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<String>>,

    /// Project names to poll. Absent or empty means all projects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,
}

impl ScopeConfig {
    pub fn scope_selector(&self) -> ScopeSelector {
        let ids: Vec<ScopeId> = dedup_names(self.teams.as_deref().unwrap_or_default())
            .into_iter()
            .map(|name| ScopeId::parse(&name))
            .collect();
        if ids.is_empty() {
            ScopeSelector::All
        } else {
            ScopeSelector::Explicit(ids)
        }
    }

    pub fn project_selector(&self) -> ProjectSelector {
        let names = dedup_names(self.projects.as_deref().unwrap_or_default());
        if names.is_empty() {
            ProjectSelector::All
        } else {
            ProjectSelector::Explicit(names)
        }
    }

    pub fn merge(base: &Self, override_config: &Self) -> Self {
        Self {
            teams: override_config.teams.clone().or(base.teams.clone()),
            projects: override_config.projects.clone().or(base.projects.clone()),
        }
    }
}

/// Trim, drop blanks, and deduplicate while keeping first-seen order.
fn dedup_names(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for name in raw {
        let name = name.trim();
        if !name.is_empty() && !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

/// A single access scope on the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeId {
    /// The token owner's own account; requests carry no team parameter.
    Personal,
    Team(String),
}

impl ScopeId {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case(PERSONAL_SCOPE) {
            ScopeId::Personal
        } else {
            ScopeId::Team(raw.to_string())
        }
    }

    /// The `teamId` query value, `None` for the personal scope.
    pub fn team_id(&self) -> Option<&str> {
        match self {
            ScopeId::Personal => None,
            ScopeId::Team(id) => Some(id),
        }
    }
}

impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeId::Personal => write!(f, "{}", PERSONAL_SCOPE),
            ScopeId::Team(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeSelector {
    /// Every scope the token can see: personal plus all teams.
    All,
    /// Non-empty, deduplicated list.
    Explicit(Vec<ScopeId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSelector {
    All,
    /// Non-empty, deduplicated list.
    Explicit(Vec<String>),
}

impl ProjectSelector {
    /// Project names used as the filter allow-list (empty for `All`).
    pub fn names(&self) -> &[String] {
        match self {
            ProjectSelector::All => &[],
            ProjectSelector::Explicit(names) => names,
        }
    }
}

/// Inclusion rules applied to fetched deployments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub states: StateToggles,

    #[serde(default)]
    pub environments: EnvironmentToggles,

    /// Branch allow-list, matched case-insensitively. Empty means any branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<String>>,

    /// Keep at most this many deployments. Zero disables the cap.
    /// Takes precedence over `max_age_hours`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<u32>,

    /// Drop deployments created more than this many hours ago. Zero disables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age_hours: Option<u32>,
}

impl FilterConfig {
    pub fn branches(&self) -> &[String] {
        self.branches.as_deref().unwrap_or_default()
    }

    /// Positive count cap, if configured.
    pub fn max_count(&self) -> Option<usize> {
        self.max_count.filter(|n| *n > 0).map(|n| n as usize)
    }

    /// Positive age cap in hours, if configured.
    pub fn max_age_hours(&self) -> Option<u32> {
        self.max_age_hours.filter(|h| *h > 0)
    }

    pub fn merge(base: &Self, override_config: &Self) -> Self {
        Self {
            states: StateToggles::merge(&base.states, &override_config.states),
            environments: EnvironmentToggles::merge(
                &base.environments,
                &override_config.environments,
            ),
            branches: override_config.branches.clone().or(base.branches.clone()),
            max_count: override_config.max_count.or(base.max_count),
            max_age_hours: override_config.max_age_hours.or(base.max_age_hours),
        }
    }
}

/// Per-state visibility. Every state is shown unless switched off.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateToggles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queued: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canceled: Option<bool>,
    /// Catch-all: when true every state is shown regardless of the others.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<bool>,
}

impl StateToggles {
    pub fn queued(&self) -> bool {
        self.all() || self.queued.unwrap_or(true)
    }

    pub fn building(&self) -> bool {
        self.all() || self.building.unwrap_or(true)
    }

    pub fn ready(&self) -> bool {
        self.all() || self.ready.unwrap_or(true)
    }

    pub fn error(&self) -> bool {
        self.all() || self.error.unwrap_or(true)
    }

    pub fn canceled(&self) -> bool {
        self.all() || self.canceled.unwrap_or(true)
    }

    pub fn all(&self) -> bool {
        self.all.unwrap_or(false)
    }

    pub fn merge(base: &Self, override_config: &Self) -> Self {
        Self {
            queued: override_config.queued.or(base.queued),
            building: override_config.building.or(base.building),
            ready: override_config.ready.or(base.ready),
            error: override_config.error.or(base.error),
            canceled: override_config.canceled.or(base.canceled),
            all: override_config.all.or(base.all),
        }
    }
}

/// Per-target visibility for the two recognized environments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentToggles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<bool>,
}

impl EnvironmentToggles {
    pub fn production(&self) -> bool {
        self.production.unwrap_or(true)
    }

    pub fn preview(&self) -> bool {
        self.preview.unwrap_or(true)
    }

    pub fn merge(base: &Self, override_config: &Self) -> Self {
        Self {
            production: override_config.production.or(base.production),
            preview: override_config.preview.or(base.preview),
        }
    }
}

/// Poll cadence settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Interval while nothing visible is building or queued. Default: 15
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_interval_secs: Option<u64>,

    /// Interval while at least one visible deployment is in flight. Default: 2
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_interval_secs: Option<u64>,
}

impl PollingConfig {
    pub fn idle_interval(&self) -> Duration {
        Duration::from_secs(
            self.idle_interval_secs
                .unwrap_or(DEFAULT_IDLE_INTERVAL_SECS),
        )
    }

    pub fn active_interval(&self) -> Duration {
        Duration::from_secs(
            self.active_interval_secs
                .unwrap_or(DEFAULT_ACTIVE_INTERVAL_SECS),
        )
    }

    pub fn merge(base: &Self, override_config: &Self) -> Self {
        Self {
            idle_interval_secs: override_config
                .idle_interval_secs
                .or(base.idle_interval_secs),
            active_interval_secs: override_config
                .active_interval_secs
                .or(base.active_interval_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShipwatchConfig::default();
        assert_eq!(config.api.token(), None);
        assert_eq!(config.api.base_url(), "https://api.vercel.com");
        assert_eq!(config.scope.scope_selector(), ScopeSelector::All);
        assert_eq!(config.scope.project_selector(), ProjectSelector::All);
        assert_eq!(config.polling.idle_interval(), Duration::from_secs(15));
        assert_eq!(config.polling.active_interval(), Duration::from_secs(2));
        assert!(config.filter.states.ready());
        assert!(!config.filter.states.all());
        assert!(config.filter.environments.preview());
        assert_eq!(config.filter.max_count(), None);
    }

    #[test]
    fn test_blank_token_is_absent() {
        let api = ApiConfig {
            token: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(api.token(), None);

        let api = ApiConfig {
            token: Some(" abc \n".to_string()),
            ..Default::default()
        };
        assert_eq!(api.token(), Some("abc"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = ApiConfig {
            base_url: Some("http://localhost:8080/".to_string()),
            ..Default::default()
        };
        assert_eq!(api.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_scope_selector_parses_personal_sentinel() {
        let scope = ScopeConfig {
            teams: Some(vec![
                "Personal".to_string(),
                "team_a".to_string(),
                " team_a ".to_string(),
                "".to_string(),
            ]),
            projects: None,
        };
        assert_eq!(
            scope.scope_selector(),
            ScopeSelector::Explicit(vec![
                ScopeId::Personal,
                ScopeId::Team("team_a".to_string())
            ])
        );
    }

    #[test]
    fn test_empty_lists_mean_all() {
        let scope = ScopeConfig {
            teams: Some(vec![]),
            projects: Some(vec!["  ".to_string()]),
        };
        assert_eq!(scope.scope_selector(), ScopeSelector::All);
        assert_eq!(scope.project_selector(), ProjectSelector::All);
        assert!(scope.project_selector().names().is_empty());
    }

    #[test]
    fn test_scope_id_team_id() {
        assert_eq!(ScopeId::Personal.team_id(), None);
        assert_eq!(ScopeId::Team("t1".to_string()).team_id(), Some("t1"));
        assert_eq!(ScopeId::Personal.to_string(), "personal");
    }

    #[test]
    fn test_catch_all_state_overrides_toggles() {
        let states = StateToggles {
            error: Some(false),
            all: Some(true),
            ..Default::default()
        };
        assert!(states.error());

        let states = StateToggles {
            error: Some(false),
            ..Default::default()
        };
        assert!(!states.error());
        assert!(states.ready());
    }

    #[test]
    fn test_zero_caps_are_disabled() {
        let filter = FilterConfig {
            max_count: Some(0),
            max_age_hours: Some(0),
            ..Default::default()
        };
        assert_eq!(filter.max_count(), None);
        assert_eq!(filter.max_age_hours(), None);
    }

    #[test]
    fn test_parse_full_toml() {
        let config: ShipwatchConfig = toml::from_str(
            r#"
            [api]
            token = "tok"

            [scope]
            teams = ["team_1"]
            projects = ["web"]

            [filter]
            branches = ["main"]
            max_count = 5

            [filter.states]
            canceled = false

            [filter.environments]
            preview = false

            [polling]
            idle_interval_secs = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.api.token(), Some("tok"));
        assert_eq!(
            config.scope.project_selector(),
            ProjectSelector::Explicit(vec!["web".to_string()])
        );
        assert_eq!(config.filter.branches(), ["main".to_string()]);
        assert_eq!(config.filter.max_count(), Some(5));
        assert!(!config.filter.states.canceled());
        assert!(!config.filter.environments.preview());
        assert_eq!(config.polling.idle_interval(), Duration::from_secs(60));
        assert_eq!(config.polling.active_interval(), Duration::from_secs(2));
    }
}

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("home directory not found: set $HOME environment variable")]
    HomeNotFound,
}

/// Centralized path construction for the `~/.shipwatch/` directory layout.
///
/// Use `resolve()` in production code and `from_dir()` in tests.
#[derive(Debug, Clone)]
pub struct ShipwatchPaths {
    base_dir: PathBuf,
}

impl ShipwatchPaths {
    /// Resolve paths from the user's home directory (`~/.shipwatch`).
    pub fn resolve() -> Result<Self, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeNotFound)?;
        Ok(Self {
            base_dir: home.join(".shipwatch"),
        })
    }

    /// Create paths from an explicit base directory. Use in tests.
    pub fn from_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// The base `~/.shipwatch` directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// User-level config: `~/.shipwatch/config.toml`.
    pub fn user_config(&self) -> PathBuf {
        self.base_dir.join("config.toml")
    }

    /// Project-level config: `<project_root>/.shipwatch/config.toml`.
    pub fn project_config(project_root: &Path) -> PathBuf {
        project_root.join(".shipwatch").join("config.toml")
    }
}

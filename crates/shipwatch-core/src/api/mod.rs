pub mod client;
pub mod errors;
pub mod traits;
pub mod types;

// Re-export public API
pub use client::{PAGE_SIZE, VercelClient};
pub use errors::ApiError;
pub use traits::DeploymentSource;
pub use types::{CommitMeta, Deployment, DeploymentState, Project, Team};

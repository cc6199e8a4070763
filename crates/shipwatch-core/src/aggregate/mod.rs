pub mod engine;
pub mod errors;
pub mod join;

pub use engine::fetch_all;
pub use errors::FetchError;
pub use join::{JoinPolicy, join_fetches};

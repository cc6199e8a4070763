pub mod filter;
pub mod merge;

pub use filter::{filter, filter_at, has_active};
pub use merge::merge;

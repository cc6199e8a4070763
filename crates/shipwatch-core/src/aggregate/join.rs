//! Concurrent fan-out/fan-in of fetch tasks.

use std::future::Future;

use futures::future::{join_all, try_join_all};
use tracing::debug;

use crate::api::ApiError;

/// How a group of concurrent fetches treats individual failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinPolicy {
    /// Any failure fails the whole join; the remaining tasks are dropped.
    Strict,
    /// Failures are dropped as long as at least one task succeeds. When
    /// every task fails, the first failure in input order is returned.
    Lenient,
}

/// Run every task concurrently and concatenate the successful results in
/// input order.
///
/// An empty task list succeeds with an empty result under either policy.
pub async fn join_fetches<T, F>(tasks: Vec<F>, policy: JoinPolicy) -> Result<Vec<T>, ApiError>
where
    F: Future<Output = Result<Vec<T>, ApiError>>,
{
    match policy {
        JoinPolicy::Strict => {
            let batches = try_join_all(tasks).await?;
            Ok(batches.into_iter().flatten().collect())
        }
        JoinPolicy::Lenient => {
            let results = join_all(tasks).await;
            let total = results.len();
            let mut merged = Vec::new();
            let mut first_error = None;
            let mut successes = 0usize;

            for result in results {
                match result {
                    Ok(batch) => {
                        successes += 1;
                        merged.extend(batch);
                    }
                    Err(e) => {
                        first_error.get_or_insert(e);
                    }
                }
            }

            match first_error {
                Some(e) if successes == 0 => Err(e),
                _ => {
                    if successes < total {
                        debug!(
                            event = "core.aggregate.partial_join",
                            succeeded = successes,
                            failed = total - successes,
                        );
                    }
                    Ok(merged)
                }
            }
        }
    }
}

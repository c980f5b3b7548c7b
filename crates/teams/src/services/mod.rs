//! Domain services

pub mod invite_service;
pub mod join_request_service;
pub mod revalidation;
pub mod team_service;

use roster_database::types::TeamResult;
use std::future::Future;
use tracing::warn;

const MAX_ATTEMPTS: u32 = 3;

/// Run a store operation, retrying a bounded number of times when SQLite
/// reports the database busy or locked. Domain errors pass through
/// untouched on the first attempt.
pub(crate) async fn with_retry<T, F, Fut>(mut op: F) -> TeamResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TeamResult<T>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(error) if error.is_retryable() && attempt < MAX_ATTEMPTS => {
                warn!(attempt, %error, "store busy, retrying");
                attempt += 1;
            }
            other => return other,
        }
    }
}

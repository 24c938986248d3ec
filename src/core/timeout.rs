//! Bounded execution for individual checks.
//!
//! Each check gets its own deadline so one slow upstream call cannot stall
//! the others. Failures are surfaced as-is; nothing is retried.

use crate::core::{EscopeError, Result};
use std::future::Future;
use std::time::Duration;

/// Run `operation`, failing with [`EscopeError::Timeout`] after `timeout`.
pub async fn execute_with_timeout<Fut, T>(name: &str, timeout: Duration, operation: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => {
            tracing::warn!(check = name, category = error.category(), "{} failed: {}", name, error);
            Err(error)
        },
        Err(_) => {
            tracing::warn!(check = name, timeout_ms = timeout.as_millis() as u64, "{} timed out", name);
            Err(EscopeError::timeout(name, timeout))
        },
    }
}

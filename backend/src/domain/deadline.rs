//! Per-operation deadlines for service calls.
//!
//! Expiry drops the in-flight future. For the PostgreSQL adapters this aborts
//! any open transaction; the caller sees `ServiceUnavailable`.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::Error;

/// Optional timeout applied to each service operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationDeadline {
    timeout: Option<Duration>,
}

impl OperationDeadline {
    /// No deadline; operations run until completion.
    pub const fn unbounded() -> Self {
        Self { timeout: None }
    }

    /// Deadline of `timeout` per operation.
    pub const fn after(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Drive `fut` to completion or fail once the deadline elapses.
    pub async fn run<T, Fut>(&self, operation: &'static str, fut: Fut) -> Result<T, Error>
    where
        Fut: Future<Output = Result<T, Error>>,
    {
        let Some(timeout) = self.timeout else {
            return fut.await;
        };
        match tokio::time::timeout(timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, timeout_ms = timeout.as_millis() as u64, "operation deadline elapsed");
                Err(Error::service_unavailable(format!(
                    "{operation} did not complete within {}ms",
                    timeout.as_millis()
                )))
            }
        }
    }
}

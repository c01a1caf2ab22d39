//! Port for checking that the backing store can serve requests.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by storage health checks.
    pub enum StorageHealthError {
        /// The store did not answer the check.
        Unavailable { message: String } =>
            "storage unavailable: {message}",
    }
}

/// Round-trip to the store, used by the readiness check.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageHealth: Send + Sync {
    async fn ping(&self) -> Result<(), StorageHealthError>;
}

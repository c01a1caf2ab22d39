//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: mutex-guarded in-memory repositories for development and
//!   tests.
//!
//! Adapters translate between domain types and storage representations and
//! hold no business rules beyond the atomic re-checks the ports require.

pub mod memory;
pub mod persistence;

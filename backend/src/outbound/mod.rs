//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: a single-process store used without a database and in tests.
//!
//! Adapters translate between domain types and storage representations. They
//! hold no business rules beyond enforcing the storage constraints the ports
//! document.

pub mod memory;
pub mod persistence;

//! Table-storage backed user and email stores.
//!
//! Stores talk to storage only through [`table::TableClient`]. The
//! [`memory::InMemoryTableClient`] implementation backs tests and local runs.

pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod table;

pub use error::TableError;
pub use memory::InMemoryTableClient;
pub use table::{TableClient, TableEntity};

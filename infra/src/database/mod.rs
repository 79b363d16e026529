//! Database module - message store implementations
//!
//! This module provides:
//! - Connection pool management and table DDL
//! - The MySQL message repository
//! - An in-memory message repository with the same semantics

pub mod connection;
pub mod memory;
pub mod mysql;
pub mod schema;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use memory::InMemoryMessageRepository;
pub use mysql::MySqlMessageRepository;

//! Value objects representing immutable domain concepts.

pub mod delivery;

// Re-export commonly used types
pub use delivery::{DateWindow, ExternalReceipt, StatusReport};

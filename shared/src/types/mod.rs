//! Type definitions shared by the relay crates
//!
//! - `response` - the JSON envelope returned by every API endpoint

pub mod response;

pub use response::{ApiEnvelope, ErrorBody};

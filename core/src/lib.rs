//! # Relay Core
//!
//! Domain layer for the SMS relay.
//! This crate contains the message entity and its lifecycle, the region router,
//! the gateway and store contracts, and the reconciliation scheduler that
//! moves messages from `Started` to a terminal status.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    DateWindow, ExternalReceipt, Message, MessageStatus, NewMessage, Region, StatusReport,
    UNSENT_MESSAGE_ID,
};
pub use errors::*;
pub use repositories::MessageRepository;
pub use services::*;

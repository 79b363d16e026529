//! Domain entities representing core business objects.

pub mod message;

// Re-export commonly used types
pub use message::{Message, MessageStatus, NewMessage, Region, UNSENT_MESSAGE_ID};

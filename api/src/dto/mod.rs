//! Request and response payloads

pub mod message;

pub use message::{SendMessageRequest, SendMessageResponse};

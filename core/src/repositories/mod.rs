pub mod message;

pub use message::MessageRepository;

#[cfg(test)]
pub use message::MockMessageRepository;

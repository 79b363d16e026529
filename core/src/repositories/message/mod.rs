pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;

pub use r#trait::MessageRepository;

#[cfg(test)]
pub mod mock;
#[cfg(test)]
pub use mock::MockMessageRepository;

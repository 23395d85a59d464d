//! A chat assistant that relays the user's questions to a hosted generative language model.

mod client;
mod endpoint;

pub use client::{ChatClient, ChatConfig, DEFAULT_BASE_URL};
pub use endpoint::chat_endpoint;

#[cfg(test)]
pub use client::FALLBACK_REPLY;

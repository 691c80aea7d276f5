//! Conversations and model responses.

pub mod entities;
pub mod response;

pub use entities::{Conversation, Message, Role};
pub use response::{ContentBlock, LlmResponse, StopReason};

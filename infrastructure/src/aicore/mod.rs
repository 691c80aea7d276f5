//! SAP AI Core adapter
//!
//! Wire protocol, OAuth token handling and (with the `http` feature) the
//! [`AiCoreChatModel`] implementation of the chat model port.

pub mod error;
pub mod protocol;
pub mod token;

#[cfg(feature = "http")]
mod model;

#[cfg(feature = "http")]
pub use model::AiCoreChatModel;

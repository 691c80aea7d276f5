//! Configuration value objects for the domain layer
//!
//! These are domain concepts related to configuration that are
//! used across multiple layers.

mod credentials;
mod generation;

pub use credentials::{AiCoreCredentials, require_deployment};
pub use generation::GenerationOptions;

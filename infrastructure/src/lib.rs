//! Infrastructure layer for sap-aicore
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod aicore;
pub mod config;
pub mod logging;
pub mod tools;
pub mod trace;

// Re-export commonly used types
#[cfg(feature = "http")]
pub use aicore::AiCoreChatModel;
pub use aicore::error::{AiCoreError, Result};
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use logging::JsonlTelemetry;
pub use tools::JsonSchemaToolConverter;
pub use trace::{RunDataSink, TraceRecord};

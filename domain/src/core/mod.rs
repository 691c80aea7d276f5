//! Core error types shared by every layer.

pub mod error;
pub mod node_error;

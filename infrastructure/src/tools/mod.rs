//! Tool wire formatting
//!
//! Converts discovered tools into the definitions bound to the chat endpoint.

mod schema;

pub use schema::JsonSchemaToolConverter;

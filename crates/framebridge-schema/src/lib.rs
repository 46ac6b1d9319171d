//! Per-kind JSON Schema checks for inbound frame messages.
//!
//! A [`SchemaRegistry`] holds one JSON Schema 2020-12 document per message
//! kind. A schema is bound to its kind when it is registered: if it pins the
//! `kind` property to other values it is refused, and with
//! [`RegistryConfig::closed_messages`] the kind's top-level fields become the
//! only ones a message may carry.

pub mod config;
pub mod error;
pub mod registry;
mod validator;

pub use config::RegistryConfig;
pub use error::{Result, SchemaError};
pub use registry::{SchemaRegistry, KIND_FIELD, SCHEMA_SUFFIX};

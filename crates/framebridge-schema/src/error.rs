/// Errors from building a schema registry or checking a message against it.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A schema directory or file could not be read.
    #[error("failed to load schema: {0}")]
    LoadFailed(String),

    /// A schema document is not valid JSON.
    #[error("schema is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The schema for `kind` could not be compiled.
    #[error("failed to compile schema for kind {kind:?}: {message}")]
    CompileFailed { kind: String, message: String },

    /// The schema registered for `kind` pins `kind` to something else.
    #[error("schema registered for kind {kind:?} only admits {declared}")]
    KindMismatch { kind: String, declared: String },

    /// The message failed its kind's schema.
    #[error("validation failed for kind {kind:?}: {message}")]
    ValidationFailed { kind: String, message: String },

    /// No schema registered for the given kind.
    #[error("no schema registered for kind {0:?}")]
    NoSchema(String),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the discriminant field every message carries.
pub const KIND_FIELD: &str = "kind";

/// Why a payload has no usable `kind`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KindError {
    #[error("message is not an object (got {0})")]
    NotAnObject(&'static str),

    #[error("message has no kind field")]
    MissingKind,

    #[error("message kind is not a string (got {0})")]
    KindNotString(&'static str),
}

/// Structural check: `data` is an object with a string `kind`.
pub fn message_kind(data: &Value) -> Result<&str, KindError> {
    let object = data
        .as_object()
        .ok_or_else(|| KindError::NotAnObject(json_type(data)))?;
    match object.get(KIND_FIELD) {
        Some(Value::String(kind)) => Ok(kind.as_str()),
        Some(other) => Err(KindError::KindNotString(json_type(other))),
        None => Err(KindError::MissingKind),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A message type a messenger routes.
///
/// Usually an enum tagged on `kind`:
///
/// ```
/// #[derive(serde::Deserialize)]
/// #[serde(tag = "kind", rename_all = "snake_case")]
/// enum WidgetMessage {
///     Ready,
///     Resize { height: u32 },
///     Done { token: String },
/// }
/// ```
pub trait Message: DeserializeOwned + 'static {}

impl<T: DeserializeOwned + 'static> Message for T {}

/// Untyped message: the `kind` plus every other field as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    pub kind: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawMessage {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

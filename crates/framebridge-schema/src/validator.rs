use jsonschema::Validator;
use serde_json::Value;

use crate::error::{Result, SchemaError};

/// Most validation errors folded into one `ValidationFailed` message.
const MAX_REPORTED_ERRORS: usize = 4;

pub(crate) fn validate_value(kind: &str, value: &Value, validator: &Validator) -> Result<()> {
    let errors: Vec<String> = validator
        .iter_errors(value)
        .take(MAX_REPORTED_ERRORS)
        .map(|err| err.to_string())
        .collect();
    if errors.is_empty() {
        return Ok(());
    }
    Err(SchemaError::ValidationFailed {
        kind: kind.to_string(),
        message: errors.join("; "),
    })
}

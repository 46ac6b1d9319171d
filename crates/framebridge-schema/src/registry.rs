use std::collections::BTreeMap;
use std::path::Path;

use jsonschema::Validator;
use serde_json::{json, Value};

use crate::config::RegistryConfig;
use crate::error::{Result, SchemaError};
use crate::validator::validate_value;

/// Name of the discriminant field every message carries.
pub const KIND_FIELD: &str = "kind";

/// File name suffix `from_directory` loads; the rest of the name is the kind.
pub const SCHEMA_SUFFIX: &str = ".schema.json";

/// One compiled schema per message kind.
pub struct SchemaRegistry {
    validators: BTreeMap<String, Validator>,
    config: RegistryConfig,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            validators: BTreeMap::new(),
            config,
        }
    }

    /// Register the schema for `kind` from JSON text.
    pub fn register(&mut self, kind: &str, schema_json: &str) -> Result<()> {
        let schema: Value = serde_json::from_str(schema_json)?;
        self.register_value(kind, &schema)
    }

    /// Bind `schema` to `kind` and compile it, replacing an earlier schema
    /// for the same kind.
    ///
    /// A schema whose `properties.kind` admits only other kinds (through
    /// `const` or `enum`) is refused with [`SchemaError::KindMismatch`].
    pub fn register_value(&mut self, kind: &str, schema: &Value) -> Result<()> {
        check_kind_binding(kind, schema)?;

        let compiled = if self.config.closed_messages {
            jsonschema::validator_for(&close_message(kind, schema))
        } else {
            jsonschema::validator_for(schema)
        }
        .map_err(|err| SchemaError::CompileFailed {
            kind: kind.to_string(),
            message: err.to_string(),
        })?;

        if self.validators.insert(kind.to_string(), compiled).is_some() {
            tracing::debug!(kind, "replaced message schema");
        }
        Ok(())
    }

    /// Load every `<kind>.schema.json` file in `dir`. Other files, and
    /// entries that are not regular files, are skipped.
    pub fn from_directory(dir: &Path) -> Result<Self> {
        Self::from_directory_with_config(dir, RegistryConfig::default())
    }

    pub fn from_directory_with_config(dir: &Path, config: RegistryConfig) -> Result<Self> {
        let entries = std::fs::read_dir(dir)
            .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", dir.display())))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(kind) = name.strip_suffix(SCHEMA_SUFFIX) else {
                continue;
            };
            let is_file = entry
                .file_type()
                .map_err(|err| SchemaError::LoadFailed(format!("{name}: {err}")))?
                .is_file();
            if !is_file {
                tracing::debug!(file = %name, "skipped non-file schema entry");
                continue;
            }
            if kind.is_empty() || kind.chars().any(|c| c.is_whitespace() || c.is_control()) {
                return Err(SchemaError::LoadFailed(format!(
                    "{name}: file name is not a message kind"
                )));
            }
            files.push((kind.to_string(), entry.path()));
        }
        // read_dir order is platform dependent; load and report in name order.
        files.sort();

        let mut registry = Self::with_config(config);
        for (kind, path) in files {
            let len = std::fs::metadata(&path)
                .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?
                .len();
            if len > registry.config.max_file_bytes {
                return Err(SchemaError::LoadFailed(format!(
                    "{}: {len} bytes exceeds the {} byte limit",
                    path.display(),
                    registry.config.max_file_bytes
                )));
            }
            let text = std::fs::read_to_string(&path)
                .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;
            registry.register(&kind, &text)?;
            tracing::debug!(kind = %kind, path = %path.display(), "loaded message schema");
        }
        Ok(registry)
    }

    /// Build a registry from `(kind, schema_json)` pairs.
    pub fn from_embedded(schemas: &[(&str, &str)]) -> Result<Self> {
        let mut registry = Self::new();
        for (kind, schema) in schemas {
            registry.register(kind, schema)?;
        }
        Ok(registry)
    }

    /// Check a whole message against the schema for `kind`.
    ///
    /// A kind without a schema passes unless
    /// [`RegistryConfig::require_schema`] is set.
    pub fn validate(&self, kind: &str, message: &Value) -> Result<()> {
        match self.validators.get(kind) {
            Some(validator) => validate_value(kind, message, validator),
            None if self.config.require_schema => Err(SchemaError::NoSchema(kind.to_string())),
            None => Ok(()),
        }
    }

    pub fn has_schema(&self, kind: &str) -> bool {
        self.validators.contains_key(kind)
    }

    /// Kinds with a schema, in sorted order.
    pub fn kinds(&self) -> Vec<&str> {
        self.validators.keys().map(String::as_str).collect()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("kinds", &self.kinds())
            .field("config", &self.config)
            .finish()
    }
}

/// Refuse a schema whose `kind` property can never equal `kind`.
fn check_kind_binding(kind: &str, schema: &Value) -> Result<()> {
    let Some(property) = schema.pointer("/properties/kind") else {
        return Ok(());
    };
    let admitted = match (property.get("const"), property.get("enum")) {
        (Some(constant), _) => constant == kind,
        (None, Some(Value::Array(values))) => values.iter().any(|value| value == kind),
        _ => return Ok(()),
    };
    if admitted {
        return Ok(());
    }
    let declared = property
        .get("const")
        .or_else(|| property.get("enum"))
        .map(Value::to_string)
        .unwrap_or_default();
    Err(SchemaError::KindMismatch {
        kind: kind.to_string(),
        declared,
    })
}

/// Wrap `schema` so the message object may only carry the fields `schema`
/// declares at the top level, plus `kind` pinned to `kind`.
fn close_message(kind: &str, schema: &Value) -> Value {
    let mut properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|declared| {
            declared
                .keys()
                .map(|name| (name.clone(), Value::Bool(true)))
                .collect::<serde_json::Map<_, _>>()
        })
        .unwrap_or_default();
    properties.insert(KIND_FIELD.to_string(), json!({ "const": kind }));

    json!({
        "allOf": [schema],
        "properties": properties,
        "unevaluatedProperties": false
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;

    const RESIZE_SCHEMA: &str = r#"{
        "type": "object",
        "properties": {
            "kind": { "const": "resize" },
            "height": { "type": "integer", "minimum": 0 }
        },
        "required": ["kind", "height"]
    }"#;

    fn closed() -> SchemaRegistry {
        SchemaRegistry::with_config(RegistryConfig {
            closed_messages: true,
            ..RegistryConfig::default()
        })
    }

    #[test]
    fn register_and_validate() {
        let mut registry = SchemaRegistry::new();
        registry.register("resize", RESIZE_SCHEMA).unwrap();

        assert!(registry
            .validate("resize", &json!({"kind": "resize", "height": 480}))
            .is_ok());
        assert!(matches!(
            registry.validate("resize", &json!({"kind": "resize", "height": "tall"})),
            Err(SchemaError::ValidationFailed { kind, .. }) if kind == "resize"
        ));
    }

    #[test]
    fn kinds_validate_independently() {
        let registry = SchemaRegistry::from_embedded(&[
            ("resize", RESIZE_SCHEMA),
            (
                "done",
                r#"{"type":"object","properties":{"token":{"type":"string"}},"required":["token"]}"#,
            ),
        ])
        .unwrap();

        assert!(registry
            .validate("done", &json!({"kind": "done", "token": "t"}))
            .is_ok());
        assert!(registry
            .validate("done", &json!({"kind": "done", "height": 3}))
            .is_err());
        assert_eq!(registry.kinds(), vec!["done", "resize"]);
        assert!(registry.has_schema("done"));
        assert!(!registry.has_schema("ready"));
    }

    #[test]
    fn kind_without_schema_passes_unless_required() {
        let open = SchemaRegistry::new();
        assert!(open.validate("ready", &json!({"kind": "ready"})).is_ok());

        let required = SchemaRegistry::with_config(RegistryConfig {
            require_schema: true,
            ..RegistryConfig::default()
        });
        assert!(matches!(
            required.validate("ready", &json!({"kind": "ready"})),
            Err(SchemaError::NoSchema(kind)) if kind == "ready"
        ));
    }

    #[test]
    fn schema_pinning_another_kind_is_refused() {
        let mut registry = SchemaRegistry::new();
        assert!(matches!(
            registry.register("scroll", RESIZE_SCHEMA),
            Err(SchemaError::KindMismatch { kind, declared })
                if kind == "scroll" && declared == "\"resize\""
        ));
        assert!(matches!(
            registry.register_value(
                "done",
                &json!({"properties": {"kind": {"enum": ["ready", "resize"]}}})
            ),
            Err(SchemaError::KindMismatch { .. })
        ));
        registry
            .register_value(
                "ready",
                &json!({"properties": {"kind": {"enum": ["ready", "resize"]}}}),
            )
            .unwrap();
        assert_eq!(registry.kinds(), vec!["ready"]);
    }

    #[test]
    fn closed_messages_reject_undeclared_fields() {
        let mut open = SchemaRegistry::new();
        open.register("resize", RESIZE_SCHEMA).unwrap();
        let mut closed = closed();
        closed.register("resize", RESIZE_SCHEMA).unwrap();

        let message = json!({"kind": "resize", "height": 1, "extra": true});
        assert!(open.validate("resize", &message).is_ok());
        assert!(matches!(
            closed.validate("resize", &message),
            Err(SchemaError::ValidationFailed { .. })
        ));
        assert!(closed
            .validate("resize", &json!({"kind": "resize", "height": 1}))
            .is_ok());
    }

    #[test]
    fn closed_messages_always_admit_kind() {
        let mut closed = closed();
        closed
            .register_value(
                "login",
                &json!({
                    "type": "object",
                    "properties": {"user": {"type": "object"}},
                    "required": ["user"]
                }),
            )
            .unwrap();

        assert!(closed
            .validate("login", &json!({"kind": "login", "user": {"id": 1, "pw": "x"}}))
            .is_ok());
        assert!(closed
            .validate("login", &json!({"kind": "logout", "user": {}}))
            .is_err());
    }

    #[test]
    fn invalid_schema_fails_compile() {
        let mut registry = SchemaRegistry::new();
        assert!(matches!(
            registry.register("x", r#"{"type":"definitely-not-a-type"}"#),
            Err(SchemaError::CompileFailed { kind, .. }) if kind == "x"
        ));
        assert!(matches!(
            registry.register("x", "not-json"),
            Err(SchemaError::InvalidJson(_))
        ));
        assert!(registry.kinds().is_empty());
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "framebridge-schema-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn directory_file_stems_are_kinds() {
        let dir = temp_dir("stems");
        std::fs::write(dir.join("resize.schema.json"), RESIZE_SCHEMA).unwrap();
        std::fs::write(dir.join("auth.done.schema.json"), r#"{"type":"object"}"#).unwrap();
        std::fs::write(dir.join("notes.json"), "not a schema").unwrap();
        std::fs::create_dir(dir.join("nested.schema.json")).unwrap();

        let registry = SchemaRegistry::from_directory(&dir).unwrap();
        assert_eq!(registry.kinds(), vec!["auth.done", "resize"]);
        assert!(registry
            .validate("resize", &json!({"kind": "resize", "height": 2}))
            .is_ok());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn directory_schema_must_match_its_file_name() {
        let dir = temp_dir("mismatch");
        std::fs::write(dir.join("scroll.schema.json"), RESIZE_SCHEMA).unwrap();

        assert!(matches!(
            SchemaRegistry::from_directory(&dir),
            Err(SchemaError::KindMismatch { kind, .. }) if kind == "scroll"
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn directory_rejects_unusable_names_and_large_files() {
        let dir = temp_dir("limits");
        std::fs::write(dir.join("two words.schema.json"), "{}").unwrap();
        assert!(matches!(
            SchemaRegistry::from_directory(&dir),
            Err(SchemaError::LoadFailed(_))
        ));
        std::fs::remove_file(dir.join("two words.schema.json")).unwrap();

        std::fs::write(dir.join("resize.schema.json"), RESIZE_SCHEMA).unwrap();
        let config = RegistryConfig {
            max_file_bytes: 8,
            ..RegistryConfig::default()
        };
        assert!(matches!(
            SchemaRegistry::from_directory_with_config(&dir, config),
            Err(SchemaError::LoadFailed(message)) if message.contains("byte limit")
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_is_a_load_failure() {
        let dir = temp_dir("missing").join("absent");
        assert!(matches!(
            SchemaRegistry::from_directory(&dir),
            Err(SchemaError::LoadFailed(_))
        ));
    }
}

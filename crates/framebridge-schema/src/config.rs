/// How a [`SchemaRegistry`](crate::SchemaRegistry) treats the messages it checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Reject top-level fields a kind's schema does not declare. The `kind`
    /// field itself is always declared.
    pub closed_messages: bool,
    /// A kind with no schema fails validation instead of passing.
    pub require_schema: bool,
    /// Largest schema file `from_directory` will read.
    pub max_file_bytes: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            closed_messages: false,
            require_schema: false,
            max_file_bytes: 64 * 1024,
        }
    }
}

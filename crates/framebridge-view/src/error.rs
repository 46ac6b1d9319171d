/// Errors that can occur while mounting or removing overlay nodes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// The node handle does not belong to this document.
    #[error("unknown node")]
    UnknownNode,

    /// The node is not a child of the given parent.
    #[error("node is not a child of the given parent")]
    NotAChild,

    /// Appending would make a node its own ancestor.
    #[error("node would become its own ancestor")]
    Cycle,

    /// The document has no body to mount into.
    #[error("document has no body")]
    NoBody,

    /// The underlying DOM rejected the operation.
    #[error("dom operation failed: {0}")]
    Dom(String),
}

pub type Result<T> = std::result::Result<T, ViewError>;

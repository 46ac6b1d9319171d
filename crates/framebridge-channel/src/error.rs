/// Errors that can occur while resolving a channel target.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The target could not be parsed as an absolute URL.
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    /// The URL parsed, but its origin is opaque and cannot be pinned.
    #[error("url {0:?} has an opaque origin")]
    OpaqueOrigin(String),
}

pub type Result<T> = std::result::Result<T, ChannelError>;

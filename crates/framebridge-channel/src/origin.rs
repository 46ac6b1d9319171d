use std::fmt;

use url::Url;

use crate::error::{ChannelError, Result};

/// A tuple origin (scheme, host, port) in its ASCII serialization.
///
/// Two origins are equal only when all three components match. Default
/// ports are omitted, so `https://a.test:443` and `https://a.test` compare
/// equal, exactly as a browser reports `MessageEvent.origin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin(String);

impl Origin {
    /// Origin of an already parsed URL.
    ///
    /// Opaque origins (`data:`, `about:blank`, ...) serialize as `"null"` and
    /// would match every other opaque sender, so they are refused.
    pub fn from_url(url: &Url) -> Result<Self> {
        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(ChannelError::OpaqueOrigin(url.to_string()));
        }
        Ok(Self(origin.ascii_serialization()))
    }

    /// Parse a URL or bare origin string and return its origin.
    pub fn parse(input: &str) -> Result<Self> {
        parse_target(input).map(|(_, origin)| origin)
    }

    /// Exact comparison against an origin string reported by the runtime.
    pub fn matches(&self, reported: &str) -> bool {
        self.0 == reported
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Origin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse a frame target URL and derive the origin it pins.
pub fn parse_target(input: &str) -> Result<(Url, Origin)> {
    let url = Url::parse(input).map_err(|source| ChannelError::InvalidUrl {
        url: input.to_string(),
        source,
    })?;
    let origin = Origin::from_url(&url)?;
    Ok((url, origin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_drops_path_query_and_default_port() {
        let origin = Origin::parse("https://a.test:443/path/page?x=1#frag").unwrap();
        assert_eq!(origin.as_str(), "https://a.test");
    }

    #[test]
    fn origin_keeps_explicit_port() {
        let origin = Origin::parse("http://localhost:5173/embed").unwrap();
        assert_eq!(origin.as_str(), "http://localhost:5173");
        assert!(!origin.matches("http://localhost"));
    }

    #[test]
    fn scheme_is_part_of_origin() {
        let origin = Origin::parse("https://a.test").unwrap();
        assert!(origin.matches("https://a.test"));
        assert!(!origin.matches("http://a.test"));
    }

    #[test]
    fn resolved_url_is_normalized() {
        let (url, origin) = parse_target("https://A.test").unwrap();
        assert_eq!(url.as_str(), "https://a.test/");
        assert_eq!(origin.to_string(), "https://a.test");
    }

    #[test]
    fn relative_url_is_rejected() {
        assert!(matches!(
            parse_target("/widget"),
            Err(ChannelError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_target("not a url"),
            Err(ChannelError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn opaque_origin_is_rejected() {
        assert!(matches!(
            parse_target("data:text/html,<p>hi</p>"),
            Err(ChannelError::OpaqueOrigin(_))
        ));
    }
}

//! Transmission settings shared by responses.
use crate::headers::HeaderMap;

/// Default size of a single read when streaming a body source.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Settings consulted by every [`Response`][crate::Response].
///
/// The value is read-only once handed to a response, share it with `Arc` across exchanges.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// Segment size used when copying a streamed body.
    buffer_size: usize,
    /// Headers added to every response unless the response already has them.
    default_headers: HeaderMap,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            default_headers: HeaderMap::new(),
        }
    }
}

impl Settings {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the streaming segment size, zero is treated as one.
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Add a default header.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    /// Replace all default headers.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    /// Returns the streaming segment size, at least one.
    #[inline]
    pub fn stream_buffer_size(&self) -> usize {
        self.buffer_size.max(1)
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.default_headers
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builder() {
        let settings = Settings::new()
            .buffer_size(0)
            .default_header("Server", "reply")
            .default_header("Server", "reply/0.1");

        assert_eq!(settings.stream_buffer_size(), 1);
        assert_eq!(settings.headers().get("Server"), Some("reply/0.1"));
        assert_eq!(settings.headers().len(), 1);
        assert_eq!(Settings::default().stream_buffer_size(), DEFAULT_BUFFER_SIZE);
    }

    #[cfg(feature = "json")]
    #[test]
    fn deserialize() {
        let settings: Settings = serde_json::from_str(
            r#"{ "buffer_size": 16, "default_headers": { "Server": "reply", "X-Frame-Options": "DENY" } }"#,
        )
        .unwrap();
        assert_eq!(settings.stream_buffer_size(), 16);
        let names: Vec<_> = settings.headers().iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["Server", "X-Frame-Options"]);

        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());

        assert!(serde_json::from_str::<Settings>(r#"{ "default_headers": { "X": "a\nb" } }"#).is_err());
    }
}

use crate::{
    headers::{HeaderError, HeaderMap, validate_name, validate_value},
    http::{InvalidStatusCode, StatusCode},
};

/// Response state set by the handler before transmission.
///
/// Constructed with [`Head::builder`], which validates every field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Head {
    pub(crate) status: StatusCode,
    pub(crate) description: String,
    pub(crate) headers: HeaderMap,
    pub(crate) content_type: String,
    pub(crate) chunked: bool,
}

impl Default for Head {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            description: StatusCode::OK.reason().to_owned(),
            headers: HeaderMap::new(),
            content_type: String::new(),
            chunked: false,
        }
    }
}

impl Head {
    #[inline]
    pub fn builder() -> HeadBuilder {
        HeadBuilder::new()
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status description.
    ///
    /// Replaced by the reason phrase of the status code when the head is written.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Returns `true` if the body is sent with chunked transfer coding.
    #[inline]
    pub fn is_chunked(&self) -> bool {
        self.chunked
    }
}

/// Builder for [`Head`].
///
/// Errors are deferred until [`build`][HeadBuilder::build].
#[derive(Debug, Default)]
pub struct HeadBuilder {
    head: Head,
    error: Option<HeadError>,
}

impl HeadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status code, the description follows the code.
    pub fn status(mut self, code: u16) -> Self {
        match StatusCode::from_u16(code) {
            Ok(status) => {
                self.head.status = status;
                self.head.description = status.reason().to_owned();
            }
            Err(err) => self.fail(err.into()),
        }
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.head.description = description.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.head.headers.insert(name, value);
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.head.headers = headers;
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.head.content_type = content_type.into();
        self
    }

    pub fn chunked(mut self, chunked: bool) -> Self {
        self.head.chunked = chunked;
        self
    }

    /// Validate and return the [`Head`].
    pub fn build(self) -> Result<Head, HeadError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let head = self.head;
        head.headers.validate()?;
        validate_value("Content-Type", &head.content_type)?;
        validate_description(&head.description)?;
        Ok(head)
    }

    fn fail(&mut self, err: HeadError) {
        self.error.get_or_insert(err);
    }
}

pub(crate) fn validate_header(name: &str, value: &str) -> Result<(), HeadError> {
    validate_name(name)?;
    validate_value(name, value)?;
    Ok(())
}

fn validate_description(description: &str) -> Result<(), HeadError> {
    match description.bytes().any(|b| matches!(b, b'\r' | b'\n' | 0)) {
        true => Err(HeadError::Description),
        false => Ok(()),
    }
}

/// An error when validating [`Head`] fields.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HeadError {
    #[error(transparent)]
    Status(#[from] InvalidStatusCode),
    #[error(transparent)]
    Header(#[from] HeaderError),
    #[error("status description contains invalid byte")]
    Description,
}

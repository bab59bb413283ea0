/// An error that can occur when validating a header field.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    /// Header name contains a byte that is not an HTTP token character.
    #[error("header name {0:?} contains invalid byte")]
    InvalidName(String),
    /// Header value contains CR, LF or NUL.
    #[error("header value for {0:?} contains invalid byte")]
    InvalidValue(String),
}

use std::io;

use super::{Framing, HeadError};

/// Protocol violation by the caller.
///
/// Returned before any byte is written, never retried.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// Fixed-length operation on a chunked response, or the other way around.
    #[error("operation not allowed on {0} response")]
    ModeMismatch(Framing),
    /// The head has already been written.
    #[error("headers already sent")]
    HeadersAlreadySent,
    /// The response has been finalized.
    #[error("response already sent")]
    ResponseAlreadySent,
    /// A field update was rejected.
    #[error(transparent)]
    InvalidHead(#[from] HeadError),
}

/// Transport failure while writing, flushing or closing.
#[derive(Debug, thiserror::Error)]
pub enum TransmitError {
    #[error("transmission failed: {0}")]
    Io(#[from] io::Error),
    #[error("transmission cancelled")]
    Cancelled,
}

/// Outcome of a transmitting operation.
///
/// Once a transport failure is reported the connection is unusable and the response is
/// closed.
#[derive(Debug)]
#[must_use = "a failed delivery should at least be logged"]
pub enum Delivery {
    /// Every byte was written, `body` counts the content bytes put on the wire.
    Complete { body: u64 },
    Failed(TransmitError),
}

impl Delivery {
    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    /// Returns the number of content bytes written, if complete.
    #[inline]
    pub fn body_len(&self) -> Option<u64> {
        match self {
            Self::Complete { body } => Some(*body),
            Self::Failed(_) => None,
        }
    }

    #[inline]
    pub fn into_result(self) -> Result<u64, TransmitError> {
        match self {
            Self::Complete { body } => Ok(body),
            Self::Failed(err) => Err(err),
        }
    }
}

impl From<Result<u64, TransmitError>> for Delivery {
    #[inline]
    fn from(value: Result<u64, TransmitError>) -> Self {
        match value {
            Ok(body) => Self::Complete { body },
            Err(err) => Self::Failed(err),
        }
    }
}

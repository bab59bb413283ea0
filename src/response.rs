//! HTTP Response transmission.
//!
//! A [`Response`] is created per exchange from a validated [`Head`], the request method, the
//! shared [`Settings`] and the connection [`Sink`]. Exactly one finishing operation completes a
//! fixed-length response, chunked responses take any number of [`send_chunk`] calls ended by
//! [`send_final_chunk`].
//!
//! Caller errors ([`SendError`]) are returned as `Err` before any I/O. Transport errors are
//! reported as [`Delivery::Failed`].
//!
//! [`send_chunk`]: Response::send_chunk
//! [`send_final_chunk`]: Response::send_final_chunk
use std::sync::Arc;

use crate::{
    headers::HeaderMap,
    http::{Method, StatusCode},
    log,
    settings::Settings,
    sink::Sink,
};

mod head;
mod error;
mod cancel;
mod write;
mod chunked;
mod transmit;

pub use head::{Head, HeadBuilder, HeadError};
pub use error::{Delivery, SendError, TransmitError};
pub use cancel::{Cancel, CancelSignal, cancel_pair};

/// Body framing of a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Framing {
    /// `Content-Length` framing.
    Fixed,
    /// `Transfer-Encoding: chunked` framing.
    Chunked,
}

impl std::fmt::Display for Framing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Fixed => "fixed-length",
            Self::Chunked => "chunked",
        })
    }
}

/// Transmission state of a [`Response`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing written yet.
    Init,
    /// Head written, body pending.
    HeadersSent,
    /// At least one chunk written.
    BodyStreaming,
    /// Finalized or abandoned, no further operation is accepted.
    Closed,
}

/// HTTP Response of a single exchange.
pub struct Response<W> {
    head: Head,
    declared_len: u64,
    headers_emitted: bool,
    body_started: bool,
    finalized: bool,
    /// Set while an operation is writing, left set if that operation is dropped.
    in_flight: bool,
    method: Method,
    settings: Arc<Settings>,
    sink: Sink<W>,
    cancel: Option<CancelSignal>,
}

impl<W> Response<W> {
    pub fn new(head: Head, method: Method, settings: Arc<Settings>, sink: Sink<W>) -> Self {
        Self {
            head,
            declared_len: 0,
            headers_emitted: false,
            body_started: false,
            finalized: false,
            in_flight: false,
            method,
            settings,
            sink,
            cancel: None,
        }
    }

    /// Abort writes and flushes when `signal` is cancelled.
    pub fn with_cancel(mut self, signal: CancelSignal) -> Self {
        self.cancel = Some(signal);
        self
    }

    #[inline]
    pub fn head(&self) -> &Head {
        &self.head
    }

    #[inline]
    pub fn method(&self) -> Method {
        self.method
    }

    #[inline]
    pub fn sink(&self) -> &Sink<W> {
        &self.sink
    }

    /// Returns the declared content length.
    ///
    /// In chunked framing this is the sum of chunk payloads sent so far.
    #[inline]
    pub fn content_length(&self) -> u64 {
        self.declared_len
    }

    #[inline]
    pub fn framing(&self) -> Framing {
        match self.head.chunked {
            true => Framing::Chunked,
            false => Framing::Fixed,
        }
    }

    #[inline]
    pub fn headers_emitted(&self) -> bool {
        self.headers_emitted
    }

    /// Returns `true` once no further operation is accepted.
    ///
    /// This includes a response whose operation was dropped mid-write, matching
    /// [`Phase::Closed`].
    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.finalized || self.in_flight
    }

    pub fn phase(&self) -> Phase {
        if self.is_finalized() {
            Phase::Closed
        } else if self.body_started {
            Phase::BodyStreaming
        } else if self.headers_emitted {
            Phase::HeadersSent
        } else {
            Phase::Init
        }
    }
}

// ===== Guarded Setters =====

impl<W> Response<W> {
    fn ensure_open(&self) -> Result<(), SendError> {
        match self.is_finalized() {
            true => Err(SendError::ResponseAlreadySent),
            false => Ok(()),
        }
    }

    fn ensure_pending(&self) -> Result<(), SendError> {
        self.ensure_open()?;
        match self.headers_emitted {
            true => Err(SendError::HeadersAlreadySent),
            false => Ok(()),
        }
    }

    pub fn set_status(&mut self, code: u16) -> Result<(), SendError> {
        self.ensure_pending()?;
        let status = StatusCode::from_u16(code).map_err(HeadError::from)?;
        self.head.status = status;
        self.head.description = status.reason().to_owned();
        Ok(())
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) -> Result<(), SendError> {
        self.ensure_pending()?;
        let content_type = content_type.into();
        head::validate_header("Content-Type", &content_type)?;
        self.head.content_type = content_type;
        Ok(())
    }

    /// Set the length written by [`emit_headers`][Response::emit_headers].
    pub fn set_content_length(&mut self, len: u64) -> Result<(), SendError> {
        self.ensure_pending()?;
        self.declared_len = len;
        Ok(())
    }

    pub fn insert_header(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>, SendError> {
        self.ensure_pending()?;
        let name = name.into();
        let value = value.into();
        head::validate_header(&name, &value)?;
        Ok(self.head.headers.insert(name, value))
    }

    /// Select the framing, only allowed before the head is written.
    pub fn set_chunked(&mut self, chunked: bool) -> Result<(), SendError> {
        self.ensure_pending()?;
        self.head.chunked = chunked;
        Ok(())
    }
}

// ===== Diagnostic =====

impl<W> Response<W> {
    fn record(&self) -> Record<'_> {
        Record {
            status_code: self.head.status.as_u16(),
            status_description: &self.head.description,
            headers: &self.head.headers,
            content_type: &self.head.content_type,
            declared_content_length: self.declared_len,
            chunked_transfer: self.head.chunked,
        }
    }

    /// Render the response fields as JSON for diagnostics.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.record())
    }
}

/// Diagnostic field order is part of the public contract.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
struct Record<'a> {
    status_code: u16,
    status_description: &'a str,
    headers: &'a HeaderMap,
    content_type: &'a str,
    declared_content_length: u64,
    chunked_transfer: bool,
}

#[cfg(feature = "serde")]
impl<W> serde::Serialize for Response<W> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.record(), serializer)
    }
}

impl<W> std::fmt::Debug for Response<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let record = self.record();
        f.debug_struct("Response")
            .field("status_code", &record.status_code)
            .field("status_description", &record.status_description)
            .field("headers", record.headers)
            .field("content_type", &record.content_type)
            .field("declared_content_length", &record.declared_content_length)
            .field("chunked_transfer", &record.chunked_transfer)
            .field("phase", &self.phase())
            .finish()
    }
}

impl<W> Drop for Response<W> {
    fn drop(&mut self) {
        if self.in_flight {
            log::error!("response dropped mid-write, the client received a truncated response");
        }
        if !self.sink.is_closed() {
            log::debug!("response dropped before finalization, abandoning sink");
            self.sink.abandon();
        }
    }
}

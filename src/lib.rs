//! HTTP/1.1 Response Transmission.
//!
//! Turns a status, a header set and a body into correctly framed bytes on an open connection,
//! either with a fixed `Content-Length` or with chunked transfer coding, exactly once per
//! exchange.
#![warn(missing_debug_implementations)]

mod log;

pub mod http;
pub mod headers;
pub mod settings;
pub mod sink;
pub mod response;

pub use http::{Method, StatusCode};
pub use headers::HeaderMap;
pub use settings::Settings;
pub use sink::Sink;
pub use response::{Delivery, Head, Response, SendError, TransmitError};

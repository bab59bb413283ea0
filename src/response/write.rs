use bytes::{BufMut, BytesMut};

use super::{Framing, Head};
use crate::{headers::HeaderMap, log};

/// Write the status line and header block into `buf`.
///
/// `content_length` is only written for [`Framing::Fixed`]. Caller headers come first, default
/// headers follow unless a caller header has the same name in any letter case. Framing headers
/// and fields with empty names are skipped, the framing is owned by the transmitter.
pub(crate) fn write_head(
    head: &Head,
    framing: Framing,
    content_length: u64,
    defaults: &HeaderMap,
    buf: &mut BytesMut,
) {
    let mut itoa = itoa::Buffer::new();

    buf.put_slice(b"HTTP/1.1 ");
    buf.put_slice(itoa.format(head.status.as_u16()).as_bytes());
    buf.put_slice(b" ");
    buf.put_slice(head.description.as_bytes());
    buf.put_slice(b"\r\n");

    if !head.content_type.is_empty() {
        put_field(buf, "Content-Type", &head.content_type);
    }

    match framing {
        Framing::Fixed => put_field(buf, "Content-Length", itoa.format(content_length)),
        Framing::Chunked => put_field(buf, "Transfer-Encoding", "chunked"),
    }

    for (name, value) in head.headers.with_defaults(defaults) {
        if name.is_empty() {
            log::debug!("skipping header with empty name");
            continue;
        }
        if is_framing(name) || (!head.content_type.is_empty() && name.eq_ignore_ascii_case("content-type")) {
            log::debug!("skipping header {name:?}, set by the response");
            continue;
        }
        put_field(buf, name, value);
    }

    buf.put_slice(b"\r\n");
}

fn put_field(buf: &mut BytesMut, name: &str, value: &str) {
    buf.put_slice(name.as_bytes());
    buf.put_slice(b": ");
    buf.put_slice(value.as_bytes());
    buf.put_slice(b"\r\n");
}

fn is_framing(name: &str) -> bool {
    name.eq_ignore_ascii_case("content-length") || name.eq_ignore_ascii_case("transfer-encoding")
}

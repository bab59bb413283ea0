use bytes::{Buf, Bytes, BytesMut, buf::Chain};
use std::fmt::Write;

/// Zero sized chunk with empty trailer section.
pub(crate) const LAST_CHUNK: &[u8] = b"0\r\n\r\n";

const CRLF_LAST_CHUNK: &[u8] = b"\r\n0\r\n\r\n";

/// Frame `chunk` as `<hex-size>\r\n<chunk>\r\n`, followed by [`LAST_CHUNK`] if `is_last_chunk`.
///
/// An empty non-last chunk encodes to nothing, since a zero size frame ends the body.
pub(crate) fn encode_chunk(chunk: Bytes, write_buffer: &mut BytesMut, is_last_chunk: bool) -> EncodedBuf {
    if chunk.is_empty() {
        return match is_last_chunk {
            true => EncodedBuf::chunks(Bytes::new(), chunk, LAST_CHUNK),
            false => EncodedBuf::exact(chunk),
        };
    }

    // writing into BytesMut cannot fail
    let _ = write!(write_buffer, "{:x}\r\n", chunk.len());
    let header = write_buffer.split().freeze();

    let trail = match is_last_chunk {
        true => CRLF_LAST_CHUNK,
        false => b"\r\n",
    };

    EncodedBuf::chunks(header, chunk, trail)
}

/// The return type for encoded message body chunk.
///
/// The returned bytes must be written in following order: `header`, `chunk`, then `trail`.
#[derive(Debug)]
pub(crate) struct EncodedBuf {
    pub header: Bytes,
    pub chunk: Bytes,
    pub trail: &'static [u8],
}

impl EncodedBuf {
    pub fn exact(chunk: Bytes) -> Self {
        Self { header: Bytes::new(), chunk, trail: b"" }
    }

    pub fn chunks(header: Bytes, chunk: Bytes, trail: &'static [u8]) -> Self {
        Self { header, chunk, trail }
    }

    /// Returns the payload length, without framing.
    pub fn payload_len(&self) -> usize {
        self.chunk.len()
    }

    pub fn into_buf(self) -> Chain<Chain<Bytes, Bytes>, &'static [u8]> {
        self.header.chain(self.chunk).chain(self.trail)
    }
}

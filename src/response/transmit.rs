use bytes::{Bytes, BytesMut};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use super::{
    CancelSignal, Delivery, Framing, Response, SendError, TransmitError,
    chunked::encode_chunk,
    write::write_head,
};
use crate::log;

/// Whether an operation writes the head itself.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Emit {
    /// The operation sets `Content-Length`, the head must still be pending.
    Required,
    /// Write the head only if it is still pending.
    IfPending,
}

/// Run a transport future, racing it against the cancel signal if any.
async fn cancelable<T, F>(cancel: Option<&mut CancelSignal>, fut: F) -> Result<T, TransmitError>
where
    F: Future<Output = io::Result<T>>,
{
    match cancel {
        None => fut.await.map_err(TransmitError::Io),
        Some(signal) => tokio::select! {
            biased;
            () = signal.cancelled() => Err(TransmitError::Cancelled),
            result = fut => result.map_err(TransmitError::Io),
        },
    }
}

impl<W> Response<W>
where
    W: AsyncWrite + Unpin,
{
    /// Check every precondition of an operation, before any I/O.
    fn begin(&self, framing: Framing, emit: Emit) -> Result<(), SendError> {
        self.ensure_open()?;
        if self.framing() != framing {
            return Err(SendError::ModeMismatch(self.framing()));
        }
        if emit == Emit::Required && self.headers_emitted {
            return Err(SendError::HeadersAlreadySent);
        }
        Ok(())
    }

    /// Render the head and mark it emitted.
    ///
    /// The status description is always recomputed from the status code.
    fn take_head(&mut self) -> BytesMut {
        self.head.description = self.head.status.reason().to_owned();

        let mut buf = BytesMut::with_capacity(256);
        write_head(&self.head, self.framing(), self.declared_len, self.settings.headers(), &mut buf);
        self.headers_emitted = true;

        log::debug!(
            "emitting head: {} {}, {}",
            self.head.status.as_u16(),
            self.head.description,
            match self.framing() {
                Framing::Fixed => "fixed-length",
                Framing::Chunked => "chunked",
            },
        );
        buf
    }

    /// Flush and close the sink, then mark the response finalized.
    ///
    /// The sink is closed on failure as well: after cancellation it is abandoned without
    /// further I/O, after a transport error a shutdown is still attempted until cancelled.
    async fn finalize(&mut self, result: Result<u64, TransmitError>) -> Delivery {
        let Self { sink, cancel, .. } = &mut *self;

        let result = match result {
            Ok(body) => cancelable(cancel.as_mut(), async {
                sink.flush().await?;
                sink.close().await
            })
            .await
            .map(|()| body),
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            log::warning!("response transmission failed: {err}");
            match err {
                TransmitError::Cancelled => sink.abandon(),
                TransmitError::Io(_) => match cancelable(cancel.as_mut(), sink.close()).await {
                    Ok(()) => {}
                    Err(TransmitError::Cancelled) => sink.abandon(),
                    Err(TransmitError::Io(_err)) => {
                        log::debug!("failed to close sink: {_err}");
                    }
                },
            }
        }

        self.finalized = true;
        self.in_flight = false;
        log::debug!("response finalized");

        result.into()
    }

    /// Write the head now.
    ///
    /// In fixed-length framing the `Content-Length` is the one set with
    /// [`set_content_length`][Response::set_content_length]. Emitting twice fails with
    /// [`SendError::HeadersAlreadySent`].
    pub async fn emit_headers(&mut self) -> Result<Delivery, SendError> {
        self.ensure_pending()?;

        let mut head = self.take_head();
        self.in_flight = true;

        let Self { sink, cancel, .. } = &mut *self;
        let result = cancelable(cancel.as_mut(), async {
            sink.write_all_buf(&mut head).await?;
            sink.flush().await
        })
        .await;

        match result {
            Ok(()) => {
                self.in_flight = false;
                Ok(Delivery::Complete { body: 0 })
            }
            Err(err) => Ok(self.finalize(Err(err)).await),
        }
    }

    /// Finish a fixed-length response without content.
    ///
    /// Writes the head if still pending with `Content-Length: 0`, except for HEAD requests which
    /// keep the declared length. No body bytes are written.
    ///
    /// Fails with [`SendError::HeadersAlreadySent`] if the head already went out with a non-zero
    /// length for a request other than HEAD, since that body can no longer be delivered.
    pub async fn send_empty(&mut self) -> Result<Delivery, SendError> {
        self.begin(Framing::Fixed, Emit::IfPending)?;
        if !self.method.is_head() {
            if self.headers_emitted && self.declared_len != 0 {
                return Err(SendError::HeadersAlreadySent);
            }
            self.declared_len = 0;
        }

        let head = (!self.headers_emitted).then(|| self.take_head());
        self.in_flight = true;

        let Self { sink, cancel, .. } = &mut *self;
        let result = match head {
            Some(mut head) => cancelable(cancel.as_mut(), sink.write_all_buf(&mut head)).await,
            None => Ok(()),
        };

        Ok(self.finalize(result.map(|()| 0)).await)
    }

    /// Finish a fixed-length response that declares `len` bytes but carries none.
    ///
    /// Used to answer HEAD requests with the correct `Content-Length`.
    pub async fn send_with_length(&mut self, len: u64) -> Result<Delivery, SendError> {
        self.begin(Framing::Fixed, Emit::Required)?;

        self.declared_len = len;
        let mut head = self.take_head();
        self.in_flight = true;

        let Self { sink, cancel, .. } = &mut *self;
        let result = cancelable(cancel.as_mut(), sink.write_all_buf(&mut head)).await;

        Ok(self.finalize(result.map(|()| 0)).await)
    }

    /// Finish a fixed-length response with an in-memory body.
    ///
    /// `Content-Length` is the buffer length. The body is not written for HEAD requests.
    pub async fn send_buffer(&mut self, body: impl Into<Bytes>) -> Result<Delivery, SendError> {
        self.begin(Framing::Fixed, Emit::Required)?;

        let mut body: Bytes = body.into();
        self.declared_len = body.len() as u64;
        let mut head = self.take_head();
        let suppress = self.method.is_head();
        self.in_flight = true;

        let Self { sink, cancel, .. } = &mut *self;
        let result = cancelable(cancel.as_mut(), async {
            sink.write_all_buf(&mut head).await?;
            if suppress {
                return Ok(0);
            }
            let len = body.len() as u64;
            sink.write_all_buf(&mut body).await?;
            Ok::<_, io::Error>(len)
        })
        .await;

        Ok(self.finalize(result).await)
    }

    /// Finish a fixed-length response with a text body, `Content-Length` is its UTF-8 length.
    pub async fn send_text(&mut self, text: impl AsRef<str>) -> Result<Delivery, SendError> {
        let body = Bytes::copy_from_slice(text.as_ref().as_bytes());
        self.send_buffer(body).await
    }

    /// Finish a fixed-length response by copying `len` bytes from `source`.
    ///
    /// Copies in segments of the configured buffer size. A source that ends early stops the copy
    /// without error, the reported body length is what was actually written. The source is
    /// dropped before the sink is flushed, it is never read for HEAD requests.
    pub async fn send_stream<R>(&mut self, len: u64, source: R) -> Result<Delivery, SendError>
    where
        R: AsyncRead + Unpin,
    {
        self.begin(Framing::Fixed, Emit::Required)?;

        self.declared_len = len;
        let mut head = self.take_head();
        let suppress = self.method.is_head();
        let segment = self.settings.stream_buffer_size();
        self.in_flight = true;

        let Self { sink, cancel, .. } = &mut *self;
        let mut source = source.take(len);
        let result = cancelable(cancel.as_mut(), async {
            sink.write_all_buf(&mut head).await?;
            if suppress {
                return Ok(0);
            }

            let mut buf = BytesMut::zeroed(segment.min(len.try_into().unwrap_or(usize::MAX)));
            let mut written = 0u64;
            loop {
                let read = source.read(&mut buf).await?;
                if read == 0 {
                    break;
                }
                sink.write_all(&buf[..read]).await?;
                written += read as u64;
            }

            if written < len {
                log::debug!("stream source ended early: {written} of {len} bytes");
            }
            Ok::<_, io::Error>(written)
        })
        .await;
        drop(source);

        Ok(self.finalize(result).await)
    }

    /// Write one chunk of a chunked response.
    ///
    /// The head is written on the first call. An empty chunk writes nothing.
    pub async fn send_chunk(&mut self, chunk: impl Into<Bytes>) -> Result<Delivery, SendError> {
        self.send_chunk_inner(chunk.into(), false).await
    }

    /// Write the last chunk of a chunked response followed by the terminating zero sized chunk,
    /// then finalize.
    pub async fn send_final_chunk(&mut self, chunk: impl Into<Bytes>) -> Result<Delivery, SendError> {
        self.send_chunk_inner(chunk.into(), true).await
    }

    async fn send_chunk_inner(&mut self, chunk: Bytes, is_last_chunk: bool) -> Result<Delivery, SendError> {
        self.begin(Framing::Chunked, Emit::IfPending)?;

        let head = (!self.headers_emitted).then(|| self.take_head());
        let mut write_buffer = BytesMut::with_capacity(18);
        let encoded = encode_chunk(chunk, &mut write_buffer, is_last_chunk);
        let payload = encoded.payload_len() as u64;
        self.in_flight = true;

        let Self { sink, cancel, .. } = &mut *self;
        let result = cancelable(cancel.as_mut(), async {
            if let Some(mut head) = head {
                sink.write_all_buf(&mut head).await?;
            }
            sink.write_all_buf(&mut encoded.into_buf()).await?;
            if !is_last_chunk {
                sink.flush().await?;
            }
            Ok::<_, io::Error>(payload)
        })
        .await;

        if result.is_ok() {
            self.declared_len += payload;
            self.body_started |= payload != 0;
        }

        if is_last_chunk || result.is_err() {
            return Ok(self.finalize(result).await);
        }

        self.in_flight = false;
        Ok(result.into())
    }
}

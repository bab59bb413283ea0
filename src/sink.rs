//! Byte sink of an open connection.
use bytes::Buf;
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

type CloseHook = Box<dyn FnOnce() + Send>;

/// Byte sink borrowed from a connection for the duration of one exchange.
///
/// Wraps an [`AsyncWrite`] together with an optional close hook that releases the connection
/// level response object once the sink itself is shut down.
pub struct Sink<W> {
    io: W,
    hook: Option<CloseHook>,
    closed: bool,
}

impl<W> Sink<W> {
    /// Create new [`Sink`] over a writer.
    pub fn new(io: W) -> Self {
        Self { io, hook: None, closed: false }
    }

    /// Run `hook` once, right after the writer is shut down.
    pub fn with_close_hook<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.io
    }

    /// Returns `true` once [`close`][Sink::close] has been called.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Mark closed and run the hook without touching the writer.
    pub(crate) fn abandon(&mut self) {
        self.closed = true;
        if let Some(hook) = self.hook.take() {
            hook();
        }
    }
}

impl<W> Sink<W>
where
    W: AsyncWrite + Unpin,
{
    pub(crate) async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.ensure_open()?;
        self.io.write_all(buf).await
    }

    pub(crate) async fn write_all_buf<B: Buf>(&mut self, buf: &mut B) -> io::Result<()> {
        self.ensure_open()?;
        self.io.write_all_buf(buf).await
    }

    pub(crate) async fn flush(&mut self) -> io::Result<()> {
        self.ensure_open()?;
        self.io.flush().await
    }

    /// Shut down the writer then run the close hook.
    ///
    /// The hook runs even if shutdown fails. Closing twice is a no-op.
    pub(crate) async fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let result = self.io.shutdown().await;
        if let Some(hook) = self.hook.take() {
            hook();
        }
        result
    }

    fn ensure_open(&self) -> io::Result<()> {
        match self.closed {
            true => Err(io::ErrorKind::BrokenPipe.into()),
            false => Ok(()),
        }
    }
}

impl<W: std::fmt::Debug> std::fmt::Debug for Sink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink")
            .field("io", &self.io)
            .field("hook", &self.hook.is_some())
            .field("closed", &self.closed)
            .finish()
    }
}

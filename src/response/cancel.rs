use tokio::sync::watch;

/// Create a linked cancellation handle and signal.
pub fn cancel_pair() -> (Cancel, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (Cancel(tx), CancelSignal(rx))
}

/// Handle that aborts in-flight transmission.
#[derive(Debug)]
pub struct Cancel(watch::Sender<bool>);

impl Cancel {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

/// Signal observed by a [`Response`][super::Response] during each write and flush.
#[derive(Clone, Debug)]
pub struct CancelSignal(watch::Receiver<bool>);

impl CancelSignal {
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once cancelled, never resolves if the handle is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        let cancelled = self.0.wait_for(|cancelled| *cancelled).await.is_ok();
        if !cancelled {
            std::future::pending::<()>().await
        }
    }
}

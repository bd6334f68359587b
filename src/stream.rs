//! Long-lived background work that emits messages over time.
//!
//! A [`BackgroundStream`] is started once and yields a [`StreamSource`] to
//! drain from `update()` plus a [`StopHandle`]. Whoever owns the source must
//! call `stop()` when it no longer wants the stream, typically in
//! `Screen::destroy`.

pub mod forward;
pub mod process;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

pub use forward::{Forward, ForwardRegistry, ForwardSpec, ForwardStatus};
pub use process::{ExitReason, ProcessEvent, ProcessStream};

pub trait BackgroundStream {
    type Message: Send + 'static;

    /// Start producing messages. Must be called inside the tokio runtime.
    fn start(self) -> (StreamSource<Self::Message>, StopHandle);
}

/// Receiving end of a background stream.
pub struct StreamSource<M> {
    rx: UnboundedReceiver<M>,
}

impl<M> StreamSource<M> {
    /// A connected sender/source pair for stream implementations.
    pub fn channel() -> (UnboundedSender<M>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    pub fn try_next(&mut self) -> Option<M> {
        self.rx.try_recv().ok()
    }

    pub async fn next(&mut self) -> Option<M> {
        self.rx.recv().await
    }
}

/// Stops a background stream. Cloneable; stopping twice, or after the stream
/// already ended, does nothing.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    token: CancellationToken,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token the worker watches to know when to stop.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_is_idempotent() {
        let handle = StopHandle::new();
        let clone = handle.clone();
        assert!(!handle.is_stopped());

        handle.stop();
        handle.stop();
        clone.stop();
        assert!(handle.is_stopped());
        assert!(handle.token().is_cancelled());
    }

    #[tokio::test]
    async fn test_source_drains_in_order() {
        let (tx, mut source) = StreamSource::channel();
        tx.send(1).unwrap();
        tx.send(2).unwrap();
        drop(tx);

        assert_eq!(source.try_next(), Some(1));
        assert_eq!(source.next().await, Some(2));
        assert_eq!(source.next().await, None);
    }
}

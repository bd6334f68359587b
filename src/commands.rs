//! Async commands pattern for side effects.
//!
//! Commands represent async operations that run outside the main event loop.
//! Screens return commands, and the App spawns them with automatic
//! completion detection and status tracking. A command reports its result by
//! sending a message into the inbox of the screen that issued it.

mod batch;
mod chain;
pub mod clipboard;

use std::future::Future;

use async_trait::async_trait;
use color_eyre::Result;
use futures::future::BoxFuture;

pub use batch::Batch;
pub use chain::Chain;
pub use clipboard::{Clipboard, CopyToClipboardCmd, SystemClipboard};

/// Async command that performs side effects.
///
/// Commands are spawned by the App and tracked for status display.
/// They typically send results back to a screen via its inbox.
#[async_trait]
pub trait Command: Send + 'static {
    /// Human-readable name for status display.
    fn name(&self) -> String;

    /// Execute the command.
    async fn execute(self: Box<Self>) -> Result<()>;
}

/// A command built from a name and a future.
pub struct Task {
    name: String,
    future: BoxFuture<'static, Result<()>>,
}

impl Task {
    pub fn new<F>(name: impl Into<String>, future: F) -> Self
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            name: name.into(),
            future: Box::pin(future),
        }
    }
}

#[async_trait]
impl Command for Task {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn execute(self: Box<Self>) -> Result<()> {
        self.future.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_task_runs_future() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task: Box<dyn Command> = Box::new(Task::new("Ping", async move {
            tx.send(42)?;
            Ok(())
        }));

        assert_eq!(task.name(), "Ping");
        task.execute().await.unwrap();
        assert_eq!(rx.recv().await, Some(42));
    }
}

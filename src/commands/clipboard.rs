use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::app::AppEvent;
use crate::commands::Command;
use crate::ui::ToastType;

/// Best-effort text sink for copy operations.
pub trait Clipboard: Send + Sync {
    /// Write text to the clipboard.
    ///
    /// # Errors
    /// Returns an error if the platform clipboard is unavailable.
    fn write(&self, text: &str) -> Result<()>;
}

/// The platform clipboard.
///
/// On Linux, clipboard contents are only available while the owning process
/// holds the clipboard, so a single instance is kept for the app lifetime and
/// created on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Mutex<Option<arboard::Clipboard>>,
}

impl Clipboard for SystemClipboard {
    fn write(&self, text: &str) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| eyre!("Failed to lock clipboard: {e}"))?;

        if guard.is_none() {
            *guard = Some(arboard::Clipboard::new()?);
        }

        if let Some(clipboard) = guard.as_mut() {
            clipboard.set_text(text)?;
        }
        Ok(())
    }
}

/// Copies a string to the clipboard and shows a short confirmation.
///
/// Clipboard failures are swallowed: the user sees no status change.
pub struct CopyToClipboardCmd {
    text: String,
    label: String,
    clipboard: Arc<dyn Clipboard>,
    app_tx: UnboundedSender<AppEvent>,
}

impl CopyToClipboardCmd {
    pub fn new(
        text: impl Into<String>,
        label: impl Into<String>,
        clipboard: Arc<dyn Clipboard>,
        app_tx: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            clipboard,
            app_tx,
        }
    }
}

#[async_trait]
impl Command for CopyToClipboardCmd {
    fn name(&self) -> String {
        format!("Copying {}", self.label)
    }

    async fn execute(self: Box<Self>) -> Result<()> {
        match self.clipboard.write(&self.text) {
            Ok(()) => {
                let _ = self.app_tx.send(AppEvent::ShowToast {
                    message: format!("Copied {}: {}", self.label, self.text),
                    toast_type: ToastType::Success,
                });
            }
            Err(e) => warn!("Clipboard write failed: {e}"),
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use tokio::sync::mpsc;

    use super::*;

    /// Records writes; fails every write when `broken` is set.
    #[derive(Default)]
    pub struct FakeClipboard {
        pub writes: Mutex<Vec<String>>,
        pub broken: bool,
    }

    impl Clipboard for FakeClipboard {
        fn write(&self, text: &str) -> Result<()> {
            if self.broken {
                return Err(eyre!("no display"));
            }
            self.writes.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_copy_shows_toast() {
        let clipboard = Arc::new(FakeClipboard::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cmd = CopyToClipboardCmd::new("i-0abc", "id", clipboard.clone(), tx);

        Box::new(cmd).execute().await.unwrap();

        assert_eq!(*clipboard.writes.lock().unwrap(), vec!["i-0abc".to_string()]);
        assert!(matches!(
            rx.try_recv(),
            Ok(AppEvent::ShowToast { toast_type: ToastType::Success, .. })
        ));
    }

    #[tokio::test]
    async fn test_copy_failure_is_silent() {
        let clipboard = Arc::new(FakeClipboard {
            broken: true,
            ..FakeClipboard::default()
        });
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cmd = CopyToClipboardCmd::new("i-0abc", "id", clipboard, tx);

        assert!(Box::new(cmd).execute().await.is_ok());
        assert!(rx.try_recv().is_err());
    }
}

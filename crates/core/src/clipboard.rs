use std::sync::Mutex;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// Write-only, asynchronous, fallible access to a clipboard.
#[allow(async_fn_in_trait)]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Keeps every write in memory. Can be told to fail to exercise the
/// best-effort path.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    writes: Mutex<Vec<String>>,
    fail_with: Mutex<Option<ClipboardError>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(err: ClipboardError) -> Self {
        let cb = Self::default();
        cb.set_failure(Some(err));
        cb
    }

    pub fn set_failure(&self, err: Option<ClipboardError>) {
        *self.fail_with.lock().unwrap_or_else(|e| e.into_inner()) = err;
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last(&self) -> Option<String> {
        self.writes().last().cloned()
    }
}

impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if let Some(err) = self.fail_with.lock().unwrap_or_else(|e| e.into_inner()).clone() {
            return Err(err);
        }
        self.writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(text.to_string());
        Ok(())
    }
}

/// Used when clipboard access is turned off in the settings.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledClipboard;

impl Clipboard for DisabledClipboard {
    async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable("disabled in settings".into()))
    }
}

impl<C: Clipboard> Clipboard for std::sync::Arc<C> {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        (**self).write_text(text).await
    }
}

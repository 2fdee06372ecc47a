use std::{io, sync::mpsc, thread};

use reso_core::clipboard::{Clipboard, ClipboardError, DisabledClipboard};
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Something text can be placed on. Implemented by the arboard handle and by
/// test doubles.
pub trait TextSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

impl TextSink for arboard::Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        arboard::Clipboard::set_text(self, text.to_owned())
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

struct WriteRequest {
    text: String,
    reply: oneshot::Sender<Result<(), ClipboardError>>,
}

/// Owns the clipboard handle. On X11/Wayland the copying process serves the
/// contents, so the handle has to outlive the write; it is only reopened
/// after a failure.
struct SinkHolder<B, F> {
    sink: Option<B>,
    open: F,
}

impl<B, F> SinkHolder<B, F>
where
    B: TextSink,
    F: FnMut() -> Result<B, ClipboardError>,
{
    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.sink.is_none() {
            self.sink = Some((self.open)()?);
            debug!(target: "tui", "clipboard handle opened");
        }
        let res = match self.sink.as_mut() {
            Some(sink) => sink.set_text(text),
            None => Err(ClipboardError::Unavailable("no handle".into())),
        };
        if res.is_err() {
            self.sink = None;
        }
        res
    }
}

/// The desktop clipboard via arboard. Writes are handed to a dedicated
/// thread that keeps a single handle alive for the whole run, so the event
/// loop never waits on the display server.
#[derive(Clone)]
pub struct SystemClipboard {
    tx: mpsc::Sender<WriteRequest>,
}

impl SystemClipboard {
    pub fn spawn() -> io::Result<Self> {
        Self::spawn_with(|| {
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))
        })
    }

    pub fn spawn_with<B, F>(open: F) -> io::Result<Self>
    where
        B: TextSink + 'static,
        F: FnMut() -> Result<B, ClipboardError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<WriteRequest>();
        thread::Builder::new()
            .name("reso-clipboard".into())
            .spawn(move || {
                let mut holder = SinkHolder { sink: None, open };
                // ends when every SystemClipboard is dropped
                for req in rx {
                    let res = holder.write(&req.text);
                    let _ = req.reply.send(res);
                }
                debug!(target: "tui", "clipboard thread exiting");
            })?;
        Ok(Self { tx })
    }
}

impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(WriteRequest {
                text: text.to_owned(),
                reply,
            })
            .map_err(|_| ClipboardError::Unavailable("clipboard thread stopped".into()))?;
        rx.await
            .map_err(|_| ClipboardError::Unavailable("clipboard thread stopped".into()))?
    }
}

pub enum AppClipboard {
    System(SystemClipboard),
    Disabled(DisabledClipboard),
}

impl AppClipboard {
    pub fn from_settings(enabled: bool) -> Self {
        if !enabled {
            debug!(target: "tui", "clipboard disabled");
            return AppClipboard::Disabled(DisabledClipboard);
        }
        match SystemClipboard::spawn() {
            Ok(c) => AppClipboard::System(c),
            Err(e) => {
                warn!(target: "tui", "clipboard thread: {}", e);
                AppClipboard::Disabled(DisabledClipboard)
            }
        }
    }
}

impl Clipboard for AppClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        match self {
            AppClipboard::System(c) => c.write_text(text).await,
            AppClipboard::Disabled(c) => c.write_text(text).await,
        }
    }
}

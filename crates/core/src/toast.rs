use std::time::Duration;

use tokio::time::Instant;

pub const TOAST_TTL: Duration = Duration::from_millis(2000);

/// A single transient notification. Showing a new message while one is
/// visible replaces it and restarts the dismiss window; nothing queues.
#[derive(Debug, Clone)]
pub struct Toast {
    message: String,
    shown_at: Option<Instant>,
    ttl: Duration,
}

impl Default for Toast {
    fn default() -> Self {
        Self::new(TOAST_TTL)
    }
}

impl Toast {
    pub fn new(ttl: Duration) -> Self {
        Self {
            message: String::new(),
            shown_at: None,
            ttl,
        }
    }

    pub fn show<S: Into<String>>(&mut self, message: S) {
        self.message = message.into();
        self.shown_at = Some(Instant::now());
    }

    pub fn message(&self, now: Instant) -> Option<&str> {
        let shown = self.shown_at?;
        (now.duration_since(shown) < self.ttl).then_some(self.message.as_str())
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.message(now).is_some()
    }

    /// Hide the toast once its window has passed. Returns true when this call
    /// changed what should be on screen.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.shown_at {
            Some(shown) if now.duration_since(shown) >= self.ttl => {
                self.shown_at = None;
                true
            }
            _ => false,
        }
    }
}

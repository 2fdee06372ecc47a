use std::time::Duration;

use tokio::{sync::mpsc, time::Instant};
use tracing::{debug, info, warn};

use crate::clipboard::Clipboard;
use crate::convert::{convert, format_value, Side};
use crate::debounce::{Debouncer, Settled, DEBOUNCE_QUIET};
use crate::history::{HistoryRecord, HistoryStore};
use crate::input::{is_numeric_in_progress, parse_value};
use crate::storage::KeyValueStore;
use crate::toast::{Toast, TOAST_TTL};

/// What the two fields currently display. Never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPair {
    pub left: String,
    pub right: String,
    pub active: Option<Side>,
}

impl FieldPair {
    pub fn get(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn set(&mut self, side: Side, text: String) {
        match side {
            Side::Left => self.left = text,
            Side::Right => self.right = text,
        }
    }
}

/// The edit waiting for its quiet period to elapse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pending {
    pub side: Side,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettleOutcome {
    pub result_text: String,
    pub copied: bool,
    pub committed: bool,
}

pub type SettledRx = mpsc::UnboundedReceiver<Settled<Pending>>;

/// Owns both fields, the history and the pending debounced action.
///
/// Edits are applied synchronously; the clipboard copy and the history
/// commit run later, when the owner of the [`SettledRx`] returned by
/// [`Converter::new`] passes each message back through [`Converter::settle`].
pub struct Converter<S, C> {
    fields: FieldPair,
    history: HistoryStore<S>,
    debouncer: Debouncer<Pending>,
    toast: Toast,
    clipboard: C,
}

impl<S: KeyValueStore, C: Clipboard> Converter<S, C> {
    pub fn new(store: S, clipboard: C) -> (Self, SettledRx) {
        Self::with_timing(store, clipboard, DEBOUNCE_QUIET, TOAST_TTL)
    }

    pub fn with_timing(store: S, clipboard: C, quiet: Duration, toast_ttl: Duration) -> (Self, SettledRx) {
        let (debouncer, rx) = Debouncer::new(quiet);
        let c = Self {
            fields: FieldPair::default(),
            history: HistoryStore::load(store),
            debouncer,
            toast: Toast::new(toast_ttl),
            clipboard,
        };
        (c, rx)
    }

    pub fn fields(&self) -> &FieldPair {
        &self.fields
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn toast_message(&self, now: Instant) -> Option<&str> {
        self.toast.message(now)
    }

    pub fn has_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Apply a keystroke's worth of text to one field. Returns false when the
    /// text is not a number in progress, in which case nothing changes.
    pub fn edit_field(&mut self, side: Side, raw: &str) -> bool {
        if !is_numeric_in_progress(raw) {
            debug!(target: "reso", side = side.label(), raw, "edit rejected");
            return false;
        }
        self.fields.set(side, raw.to_string());
        self.fields.active = Some(side);

        if raw.is_empty() {
            self.fields.set(side.opposite(), String::new());
            self.debouncer.cancel();
            return true;
        }

        // still typing, e.g. a lone "."
        let Some(value) = parse_value(raw) else {
            return true;
        };
        if value == 0.0 {
            self.debouncer.cancel();
            return true;
        }

        let mirrored = convert(side, value);
        self.fields.set(side.opposite(), format_value(mirrored));
        self.debouncer.schedule(Pending { side, value });
        true
    }

    /// Restore a past conversion into the fields. This is a display restore
    /// only: nothing is copied and nothing is committed.
    pub fn select_history(&mut self, record: &HistoryRecord) {
        let side = record.input_side;
        self.fields.set(side, format_value(record.input_value));
        self.fields
            .set(side.opposite(), format_value(convert(side, record.input_value)));
        self.fields.active = Some(side);
        debug!(target: "reso", id = %record.id, "history selected");
    }

    pub fn select_history_at(&mut self, index: usize) -> bool {
        let Some(record) = self.history.get(index).cloned() else {
            return false;
        };
        self.select_history(&record);
        true
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Run a settled debounce action: copy the derived value, then commit it
    /// to history whether or not the copy worked. Superseded actions yield
    /// `None` and have no effect.
    pub async fn settle(&mut self, settled: Settled<Pending>) -> Option<SettleOutcome> {
        let Pending { side, value } = self.debouncer.accept(settled)?;
        let result = convert(side, value);
        let result_text = format_value(result);

        let copied = match self.clipboard.write_text(&result_text).await {
            Ok(()) => {
                self.toast.show(format!("Copied {} to clipboard", result_text));
                info!(target: "reso", "copied {} to clipboard", result_text);
                true
            }
            Err(e) => {
                warn!(target: "reso", "clipboard: {}", e);
                false
            }
        };
        let committed = self.history.commit(side, value);
        Some(SettleOutcome {
            result_text,
            copied,
            committed,
        })
    }

    /// Expire timed UI state. Returns true when something visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.toast.expire(now)
    }
}

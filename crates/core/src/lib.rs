//! Domain logic for the reso converter: the 1.6 ratio, the dual-field
//! controller, the debounced clipboard/history pipeline and its persistence.

pub mod clipboard;
pub mod controller;
pub mod convert;
pub mod debounce;
pub mod history;
pub mod input;
pub mod storage;
pub mod toast;

pub use controller::{Converter, FieldPair, Pending, SettleOutcome};
pub use convert::Side;
pub use history::{HistoryRecord, HistoryStore};

// Centralized UI strings and labels. ASCII-friendly by default.

use unicode_width::UnicodeWidthStr;

pub const TITLE_APP: &str = "Resolution 1.6";
pub const SUBTITLE_APP: &str = "Golden ratio scalar for UI design";

// Field block titles (keep surrounding spaces for visual padding)
pub const TITLE_LEFT: &str = " Base Value (Left) ";
pub const TITLE_RIGHT: &str = " Scaled Value (Right) ";
pub const TITLE_HISTORY: &str = " Recent History ";
pub const TITLE_HELP: &str = " Help / Shortcuts ";

pub const PLACEHOLDER_LEFT: &str = "1920";
pub const PLACEHOLDER_RIGHT: &str = "1200";

pub const OPERATOR: &str = "x1.6";
pub const HISTORY_ARROW: &str = " -> ";
pub const HISTORY_EMPTY: &str = "Start typing to calculate";

// "12s ago", "3m ago", ... for history rows
pub fn format_age(now_ms: u64, then_ms: u64) -> String {
    let secs = now_ms.saturating_sub(then_ms) / 1000;
    match secs {
        0..=4 => "just now".to_string(),
        5..=59 => format!("{}s ago", secs),
        60..=3599 => format!("{}m ago", secs / 60),
        3600..=86_399 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

// Build the status bar line with width-aware compaction.
// - focus: e.g., "Base" or "History"
// - history: (records, limit)
// - pending: a debounced copy is waiting
pub fn build_status_line(
    focus: &str,
    history: (usize, usize),
    pending: bool,
    clipboard: bool,
    max_width: u16,
) -> String {
    let mut segments: Vec<String> = Vec::new();
    segments.push(format!("[{}]", focus));
    segments.push(format!("Hist:{}/{}", history.0, history.1));
    if pending {
        segments.push("Copy pending".to_string());
    }
    if !clipboard {
        segments.push("Clipboard off".to_string());
    }
    // Hints ordered by importance; will be appended if space allows.
    let hints: [&str; 5] = [
        "Tab: switch field",
        "Enter: restore",
        "Ctrl+L: clear history",
        "?: help",
        "Esc: quit",
    ];
    for h in hints {
        segments.push(h.to_string());
    }

    let sep = "  |  ";
    let mut out = String::new();
    let mut used = 0usize;
    for (i, seg) in segments.iter().enumerate() {
        let segw = UnicodeWidthStr::width(seg.as_str());
        let addw = segw
            + if i == 0 {
                0
            } else {
                UnicodeWidthStr::width(sep)
            };
        if used + addw > max_width as usize {
            break;
        }
        if i > 0 {
            out.push_str(sep);
            used += UnicodeWidthStr::width(sep);
        }
        out.push_str(seg);
        used += segw;
    }
    out
}

pub fn help_lines_ascii() -> &'static [&'static str] {
    &[
        "Fields",
        "  Type digits and one '.' to convert; the other field follows instantly",
        "  Backspace: delete last char    Delete/Ctrl+U: clear field",
        "  After 0.8s without typing the result is copied and saved to history",
        "Focus",
        "  Tab/Shift+Tab: Base -> Scaled -> History    Left/Right: switch field",
        "History",
        "  Up/Down or j/k: select    Enter/Space: restore    Mouse click: restore",
        "  c/Delete (in history) or Ctrl+L: clear all",
        "Others",
        "  ?/F1: open/close this panel    Esc/Ctrl-C: quit",
    ]
}

use reso_core::Side;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use super::App;

// Fields are edited at the end only; every change goes through the
// converter's numeric gate, which may refuse it.
impl App {
    fn focused_side(&self) -> Option<Side> {
        self.focus.side()
    }

    pub fn type_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.insert_text(c.encode_utf8(&mut buf));
    }

    pub fn insert_text(&mut self, s: &str) {
        let Some(side) = self.focused_side() else {
            return;
        };
        let s = s.trim();
        if s.is_empty() {
            return;
        }
        let mut next = self.conv.fields().get(side).to_string();
        next.push_str(s);
        if !self.conv.edit_field(side, &next) {
            debug!(target: "tui", "rejected input {:?}", s);
        }
    }

    pub fn delete_left(&mut self) {
        let Some(side) = self.focused_side() else {
            return;
        };
        let current = self.conv.fields().get(side);
        let mut parts: Vec<&str> = current.graphemes(true).collect();
        if parts.pop().is_none() {
            return;
        }
        let next = parts.concat();
        self.conv.edit_field(side, &next);
    }

    pub fn clear_focused_field(&mut self) {
        if let Some(side) = self.focused_side() {
            self.conv.edit_field(side, "");
        }
    }
}

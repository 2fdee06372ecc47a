use tracing::info;

use super::{App, Focus};

impl App {
    pub fn history_select_up(&mut self) {
        if self.history_selected > 0 {
            self.history_selected -= 1;
        }
    }

    pub fn history_select_down(&mut self) {
        if self.history_selected + 1 < self.conv.history().len() {
            self.history_selected += 1;
        }
    }

    /// Restore the highlighted record and hand focus to the field it was
    /// typed into.
    pub fn history_apply_selected(&mut self) {
        self.history_apply_at(self.history_selected);
    }

    pub fn history_apply_at(&mut self, index: usize) {
        let Some(side) = self.conv.history().get(index).map(|r| r.input_side) else {
            return;
        };
        self.history_selected = index;
        self.conv.select_history_at(index);
        self.focus = Focus::from(side);
    }

    pub fn clear_history(&mut self) {
        if self.conv.history().is_empty() {
            return;
        }
        info!(target: "tui", "clearing history ({} records)", self.conv.history().len());
        self.conv.clear_history();
        self.history_selected = 0;
        if self.focus == Focus::History {
            self.focus = Focus::Left;
        }
    }

    pub fn clamp_history_selection(&mut self) {
        let len = self.conv.history().len();
        self.history_selected = self.history_selected.min(len.saturating_sub(1));
    }
}

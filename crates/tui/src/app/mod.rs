use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use reso_core::controller::SettledRx;
use reso_core::debounce::Settled;
use reso_core::storage::KeyValueStore;
use reso_core::{Converter, Pending, Side};
use tracing::info;

use crate::clipboard::AppClipboard;

pub mod fields;
pub mod history;

pub type AppConverter = Converter<Box<dyn KeyValueStore>, AppClipboard>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Left,
    Right,
    History,
}

impl Focus {
    pub fn side(self) -> Option<Side> {
        match self {
            Focus::Left => Some(Side::Left),
            Focus::Right => Some(Side::Right),
            Focus::History => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Focus::Left => "Base",
            Focus::Right => "Scaled",
            Focus::History => "History",
        }
    }

    fn next(self) -> Self {
        match self {
            Focus::Left => Focus::Right,
            Focus::Right => Focus::History,
            Focus::History => Focus::Left,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Left => Focus::History,
            Focus::Right => Focus::Left,
            Focus::History => Focus::Right,
        }
    }
}

impl From<Side> for Focus {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => Focus::Left,
            Side::Right => Focus::Right,
        }
    }
}

pub struct App {
    pub conv: AppConverter,
    pub focus: Focus,
    pub history_selected: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub clipboard_enabled: bool,
    pub dirty: bool,
    pub left_area: Option<Rect>,
    pub right_area: Option<Rect>,
    pub history_area: Option<Rect>,
}

impl App {
    pub fn new(store: Box<dyn KeyValueStore>, clipboard: AppClipboard) -> (Self, SettledRx) {
        let clipboard_enabled = matches!(clipboard, AppClipboard::System(_));
        let (conv, rx) = Converter::new(store, clipboard);
        let app = Self {
            conv,
            focus: Focus::Left,
            history_selected: 0,
            should_quit: false,
            show_help: false,
            clipboard_enabled,
            dirty: true,
            left_area: None,
            right_area: None,
            history_area: None,
        };
        (app, rx)
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.dirty = true;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                self.show_help = false;
            } else if ctrl && key.code == KeyCode::Char('c') {
                self.should_quit = true;
            }
            return;
        }

        match key.code {
            KeyCode::Char('c') if ctrl => {
                info!(target: "tui", "on_key: Ctrl+C => quit");
                self.should_quit = true;
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('l') if ctrl => self.clear_history(),
            KeyCode::Char('u') if ctrl => self.clear_focused_field(),
            KeyCode::F(1) | KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            _ => match self.focus {
                Focus::Left | Focus::Right => self.on_field_key(key),
                Focus::History => self.on_history_key(key),
            },
        }
    }

    fn on_field_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.type_char(c),
            KeyCode::Backspace => self.delete_left(),
            KeyCode::Delete => self.clear_focused_field(),
            KeyCode::Left => self.focus = Focus::Left,
            KeyCode::Right => self.focus = Focus::Right,
            KeyCode::Down | KeyCode::Enter => {
                if !self.conv.history().is_empty() {
                    self.focus = Focus::History;
                }
            }
            _ => {}
        }
    }

    fn on_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.history_select_up(),
            KeyCode::Down | KeyCode::Char('j') => self.history_select_down(),
            KeyCode::Enter | KeyCode::Char(' ') => self.history_apply_selected(),
            KeyCode::Char('c') | KeyCode::Delete => self.clear_history(),
            _ => {}
        }
    }

    /// Run a debounce action that fired; the converter discards stale ones.
    pub async fn on_settled(&mut self, settled: Settled<Pending>) {
        if let Some(outcome) = self.conv.settle(settled).await {
            info!(
                target: "tui",
                "settled: result={} copied={} committed={}",
                outcome.result_text, outcome.copied, outcome.committed
            );
            if outcome.committed {
                // the new record lands on top; keep the highlight on the same one
                self.history_selected += 1;
            }
            self.clamp_history_selection();
            self.dirty = true;
        }
    }

    pub fn on_tick(&mut self) {
        if self.conv.tick(tokio::time::Instant::now()) {
            self.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reso_core::clipboard::DisabledClipboard;
    use reso_core::storage::MemoryStore;

    use super::*;

    fn app() -> (App, SettledRx) {
        App::new(
            Box::new(MemoryStore::new()),
            AppClipboard::Disabled(DisabledClipboard),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    async fn settle(app: &mut App, rx: &mut SettledRx) {
        tokio::time::sleep(Duration::from_secs(2)).await;
        while let Ok(s) = rx.try_recv() {
            app.on_settled(s).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn typing_mirrors_into_other_field() {
        let (mut app, _rx) = app();
        type_str(&mut app, "1920");
        assert_eq!(app.conv.fields().left, "1920");
        assert_eq!(app.conv.fields().right, "1200");
    }

    #[tokio::test(start_paused = true)]
    async fn non_numeric_keys_are_ignored() {
        let (mut app, _rx) = app();
        type_str(&mut app, "1a-2.e.5");
        assert_eq!(app.conv.fields().left, "12.5");
    }

    #[tokio::test(start_paused = true)]
    async fn backspace_to_empty_clears_both() {
        let (mut app, _rx) = app();
        type_str(&mut app, "16");
        assert_eq!(app.conv.fields().right, "10");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.conv.fields().left, "");
        assert_eq!(app.conv.fields().right, "");
        assert!(!app.conv.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn tab_moves_focus_to_scaled_field() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Right);
        type_str(&mut app, "1200");
        assert_eq!(app.conv.fields().left, "1920");
        assert_eq!(app.conv.fields().active, Some(Side::Right));
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Focus::Left);
    }

    #[tokio::test(start_paused = true)]
    async fn history_enter_restores_record() {
        let (mut app, mut rx) = app();
        type_str(&mut app, "1920");
        settle(&mut app, &mut rx).await;
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "5");
        settle(&mut app, &mut rx).await;
        assert_eq!(app.conv.history().len(), 2);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::History);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.conv.fields().left, "1920");
        assert_eq!(app.conv.fields().right, "1200");
        assert_eq!(app.focus, Focus::Left);
        settle(&mut app, &mut rx).await;
        assert_eq!(app.conv.history().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn selection_follows_record_when_new_one_is_committed() {
        let (mut app, mut rx) = app();
        type_str(&mut app, "10");
        settle(&mut app, &mut rx).await;
        press(&mut app, KeyCode::Delete);
        type_str(&mut app, "20");
        settle(&mut app, &mut rx).await;
        // [20, 10]; highlight 10
        app.history_selected = 1;
        press(&mut app, KeyCode::Delete);
        type_str(&mut app, "30");
        settle(&mut app, &mut rx).await;

        assert_eq!(app.conv.history().len(), 3);
        assert_eq!(app.history_selected, 2);
        assert_eq!(app.conv.history().records()[2].input_value, 10.0);

        // a deduplicated settle leaves the highlight alone
        press(&mut app, KeyCode::Delete);
        type_str(&mut app, "30");
        settle(&mut app, &mut rx).await;
        assert_eq!(app.conv.history().len(), 3);
        assert_eq!(app.history_selected, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn ctrl_l_clears_history() {
        let (mut app, mut rx) = app();
        type_str(&mut app, "64");
        settle(&mut app, &mut rx).await;
        assert_eq!(app.conv.history().len(), 1);
        app.on_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
        assert!(app.conv.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn help_swallows_keys_until_closed() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::F(1));
        assert!(app.show_help);
        type_str(&mut app, "12");
        assert_eq!(app.conv.fields().left, "");
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }
}

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::Backend, layout::Position, Terminal};
use reso_core::controller::SettledRx;

use crate::{
    app::{App, Focus},
    ui,
};

/// Drive the UI until the user quits. Terminal input, settled debounce
/// actions and timed UI state are all handled on this one loop, so the
/// converter is only ever touched from here.
pub async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    settled: &mut SettledRx,
) -> anyhow::Result<()> {
    let mut last_draw = Instant::now();
    let heartbeat = Duration::from_millis(500);
    loop {
        if app.dirty || last_draw.elapsed() >= heartbeat {
            terminal.draw(|f| ui::draw(f, app))?;
            app.dirty = false;
            last_draw = Instant::now();
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    app.on_key(key);
                }
                Event::Paste(s) => {
                    app.insert_text(&s);
                    app.dirty = true;
                }
                Event::Resize(_, _) => {
                    app.dirty = true;
                }
                Event::Mouse(me) => on_mouse(app, me),
                _ => {}
            }
        }

        while let Ok(s) = settled.try_recv() {
            app.on_settled(s).await;
        }
        app.on_tick();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn on_mouse(app: &mut App, me: MouseEvent) {
    if app.show_help {
        return;
    }
    let pos = Position::new(me.column, me.row);
    let in_history = app.history_area.is_some_and(|a| a.contains(pos));
    match me.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(idx) = ui::history_row_at(app, me.column, me.row) {
                app.history_apply_at(idx);
                app.dirty = true;
                return;
            }
            if app.left_area.is_some_and(|a| a.contains(pos)) {
                app.focus = Focus::Left;
                app.dirty = true;
            } else if app.right_area.is_some_and(|a| a.contains(pos)) {
                app.focus = Focus::Right;
                app.dirty = true;
            }
        }
        MouseEventKind::ScrollUp if in_history => {
            app.history_select_up();
            app.dirty = true;
        }
        MouseEventKind::ScrollDown if in_history => {
            app.history_select_down();
            app.dirty = true;
        }
        _ => {}
    }
}

use std::time::{SystemTime, UNIX_EPOCH};

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use reso_core::convert::format_value;
use reso_core::Side;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus};
use crate::strings::{
    build_status_line, format_age, help_lines_ascii, HISTORY_ARROW, HISTORY_EMPTY, OPERATOR,
    PLACEHOLDER_LEFT, PLACEHOLDER_RIGHT, SUBTITLE_APP, TITLE_APP, TITLE_HELP, TITLE_HISTORY,
    TITLE_LEFT, TITLE_RIGHT,
};
use crate::theme::THEME;

pub fn draw(f: &mut Frame, app: &mut App) {
    // Layout: header (2), fields (5), history (rest), status (1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(5),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0]);
    draw_fields(f, chunks[1], app);
    app.history_area = Some(chunks[2]);
    draw_history(f, chunks[2], app);
    draw_status(f, chunks[3], app);

    if let Some(msg) = app.conv.toast_message(tokio::time::Instant::now()) {
        draw_toast(f, chunks[2], msg);
    }
    if app.show_help {
        draw_help(f, f.area());
    }
}

fn draw_header(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            TITLE_APP,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(SUBTITLE_APP, Style::default().fg(THEME.muted))),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_fields(f: &mut Frame, area: Rect, app: &mut App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Percentage(10),
            Constraint::Percentage(45),
        ])
        .split(area);
    app.left_area = Some(cols[0]);
    app.right_area = Some(cols[2]);

    draw_field(f, cols[0], app, Side::Left);
    let mid = Rect {
        y: cols[1].y + cols[1].height / 2,
        height: 1.min(cols[1].height),
        ..cols[1]
    };
    f.render_widget(
        Paragraph::new(Span::styled(OPERATOR, Style::default().fg(THEME.left_accent)))
            .alignment(Alignment::Center),
        mid,
    );
    draw_field(f, cols[2], app, Side::Right);
}

fn draw_field(f: &mut Frame, area: Rect, app: &App, side: Side) {
    let (title, placeholder, accent) = match side {
        Side::Left => (TITLE_LEFT, PLACEHOLDER_LEFT, THEME.left_accent),
        Side::Right => (TITLE_RIGHT, PLACEHOLDER_RIGHT, THEME.right_accent),
    };
    let focused = app.focus == Focus::from(side);
    let active = app.conv.fields().active == Some(side);
    let border_style = if focused {
        Style::default().fg(THEME.border_focus)
    } else if active {
        Style::default().fg(THEME.border_active_side)
    } else {
        Style::default().fg(THEME.border_inactive)
    };
    let mut block = Block::default()
        .title(Span::styled(title, Style::default().fg(THEME.muted)))
        .borders(Borders::ALL)
        .border_style(border_style);
    if active {
        block = block.title_bottom(Line::from(Span::styled("━━━━", Style::default().fg(accent))).centered());
    }

    let value = app.conv.fields().get(side);
    let span = if value.is_empty() {
        Span::styled(placeholder, Style::default().fg(THEME.placeholder))
    } else {
        Span::styled(
            value.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )
    };
    let inner = block.inner(area);
    let text_area = Rect {
        y: inner.y + inner.height.saturating_sub(1) / 2,
        height: 1.min(inner.height),
        ..inner
    };
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(span).alignment(Alignment::Center), text_area);

    if focused && text_area.height > 0 {
        // long values overflow the field; pin the cursor to its right edge
        let w = UnicodeWidthStr::width(value).min(text_area.width as usize) as u16;
        let start = text_area.x + (text_area.width - w) / 2;
        let x = start
            .saturating_add(w)
            .min(text_area.x + text_area.width.saturating_sub(1));
        f.set_cursor_position(Position::new(x, text_area.y));
    }
}

fn draw_history(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::History;
    let border_style = if focused {
        Style::default().fg(THEME.border_focus)
    } else {
        Style::default().fg(THEME.border_inactive)
    };
    let block = Block::default()
        .title(Span::styled(
            TITLE_HISTORY,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(border_style);

    let records = app.conv.history().records();
    if records.is_empty() {
        let para = Paragraph::new(Line::from(Span::styled(
            HISTORY_EMPTY,
            Style::default().fg(THEME.muted),
        )))
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(para, area);
        return;
    }

    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let inner_h = area.height.saturating_sub(2) as usize;
    // keep the selection on screen
    let start = (app.history_selected + 1).saturating_sub(inner_h);
    let mut lines: Vec<Line> = Vec::new();
    for (i, r) in records.iter().enumerate().skip(start).take(inner_h) {
        let selected = focused && i == app.history_selected;
        let (left, right) = r.pair();
        let driving = |side: Side, accent: Color| {
            if r.input_side == side {
                Style::default().fg(accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(THEME.muted)
            }
        };
        let mut spans = vec![
            Span::raw(if selected { "> " } else { "  " }),
            Span::styled(format!("{:>8}", format_value(left)), driving(Side::Left, THEME.left_accent)),
            Span::styled(HISTORY_ARROW, Style::default().fg(THEME.muted)),
            Span::styled(format!("{:<8}", format_value(right)), driving(Side::Right, THEME.right_accent)),
            Span::styled(format!("  {}", format_age(now_ms, r.timestamp)), Style::default().fg(THEME.muted)),
        ];
        if selected {
            for s in &mut spans {
                s.style = s
                    .style
                    .fg(THEME.history_selected_fg)
                    .bg(THEME.history_selected_bg);
            }
        }
        lines.push(Line::from(spans));
    }
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let tips = build_status_line(
        app.focus.label(),
        (app.conv.history().len(), app.conv.history().limit()),
        app.conv.has_pending(),
        app.clipboard_enabled,
        area.width,
    );
    let para = Paragraph::new(Span::styled(tips, Style::default().fg(Color::DarkGray)));
    f.render_widget(para, area);
}

fn draw_toast(f: &mut Frame, area: Rect, msg: &str) {
    let w = (UnicodeWidthStr::width(msg) as u16 + 6).min(area.width);
    if area.height < 3 || w == 0 {
        return;
    }
    let rect = Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + area.height - 3,
        width: w,
        height: 3,
    };
    let line = Line::from(vec![
        Span::styled("● ", Style::default().fg(THEME.toast_dot)),
        Span::styled(msg.to_string(), Style::default().fg(THEME.toast_fg)),
    ]);
    let para = Paragraph::new(line)
        .alignment(Alignment::Center)
        .style(Style::default().bg(THEME.toast_bg))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(THEME.border_inactive)));
    f.render_widget(Clear, rect);
    f.render_widget(para, rect);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(80, 60, area);
    let block = Block::default()
        .title(Span::styled(
            TITLE_HELP,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    let lines = help_lines_ascii()
        .iter()
        .map(|s| Line::from(*s))
        .collect::<Vec<Line>>();
    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(Clear, popup_area);
    f.render_widget(para, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1]);
    horiz[1]
}

/// Index of the history row under a terminal position, if any.
pub fn history_row_at(app: &App, column: u16, row: u16) -> Option<usize> {
    let area = app.history_area?;
    let inside = column >= area.x
        && column < area.x + area.width
        && row > area.y
        && row < area.y + area.height.saturating_sub(1);
    if !inside {
        return None;
    }
    let inner_h = area.height.saturating_sub(2) as usize;
    let start = (app.history_selected + 1).saturating_sub(inner_h);
    let idx = start + (row - (area.y + 1)) as usize;
    (idx < app.conv.history().len()).then_some(idx)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::{backend::TestBackend, Terminal};
    use reso_core::clipboard::DisabledClipboard;
    use reso_core::storage::MemoryStore;

    use super::*;
    use crate::clipboard::AppClipboard;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn renders_fields_and_history() {
        let (mut app, mut rx) = App::new(
            Box::new(MemoryStore::new()),
            AppClipboard::Disabled(DisabledClipboard),
        );
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();

        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let empty = screen(&terminal);
        assert!(empty.contains(HISTORY_EMPTY));
        assert!(empty.contains(PLACEHOLDER_LEFT));

        app.type_char('1');
        app.type_char('9');
        app.type_char('2');
        app.type_char('0');
        tokio::time::sleep(Duration::from_secs(1)).await;
        while let Ok(s) = rx.try_recv() {
            app.on_settled(s).await;
        }
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let shown = screen(&terminal);
        assert!(shown.contains("1200"));
        assert!(shown.contains("1920 -> 1200"));
        assert!(shown.contains("Clipboard off"));
        assert!(!shown.contains(HISTORY_EMPTY));
    }

    #[tokio::test(start_paused = true)]
    async fn very_long_value_draws_without_panicking() {
        let (mut app, _rx) = App::new(
            Box::new(MemoryStore::new()),
            AppClipboard::Disabled(DisabledClipboard),
        );
        app.insert_text(&"1".repeat(65_535));
        assert_eq!(app.conv.fields().left.len(), 65_535);
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        app.insert_text(&"2".repeat(70_000));
        terminal.draw(|f| draw(f, &mut app)).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn click_maps_to_history_row() {
        let (mut app, mut rx) = App::new(
            Box::new(MemoryStore::new()),
            AppClipboard::Disabled(DisabledClipboard),
        );
        app.type_char('8');
        tokio::time::sleep(Duration::from_secs(1)).await;
        while let Ok(s) = rx.try_recv() {
            app.on_settled(s).await;
        }
        app.history_area = Some(Rect::new(0, 10, 40, 6));
        assert_eq!(history_row_at(&app, 5, 11), Some(0));
        assert_eq!(history_row_at(&app, 5, 12), None);
        assert_eq!(history_row_at(&app, 5, 10), None);
        assert_eq!(history_row_at(&app, 50, 11), None);
    }
}

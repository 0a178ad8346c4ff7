use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::notify::NoticeLevel;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let narrow = area.width < crate::app::NARROW_WIDTH_THRESHOLD;

    let hints: &[(&str, &str)] = if state.has_confirm_overlay() {
        &[("y", "confirm"), ("n", "cancel")]
    } else if state.menu_open {
        &[("j/k", "move"), ("Enter", "deploy"), ("1-9", "pick"), ("Esc", "close")]
    } else if narrow {
        &[("d", "deploy"), ("r", "refresh"), ("s", "stop"), ("q", "quit")]
    } else {
        &[
            ("d/Enter", "deploy menu"),
            ("1-9", "deploy env"),
            ("r", "refresh badge"),
            ("s", "stop watching"),
            ("q", "quit"),
        ]
    };

    let line = if let Some(notif) = state.notifications.last() {
        let (icon, color) = match notif.level {
            NoticeLevel::Success => ("✓ ", Color::Green),
            NoticeLevel::Error => ("✗ ", Color::Red),
        };
        Line::from(vec![
            Span::styled(icon, Style::default().fg(color)),
            Span::styled(&notif.message, Style::default().fg(color)),
        ])
    } else {
        let mut spans: Vec<Span> = Vec::new();
        for (i, (key, desc)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
            spans.push(Span::styled(
                format!(" {desc}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    };

    let footer = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}

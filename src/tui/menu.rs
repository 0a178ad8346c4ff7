//! The deploy button and its environment dropdown.

use crate::app::AppState;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

const BUTTON_LABEL: &str = "Deploy site";
const BUTTON_HEIGHT: u16 = 3;

/// Rows needed for the button plus the open dropdown.
pub fn height(state: &AppState) -> u16 {
    if state.menu_open {
        BUTTON_HEIGHT + state.environments.len() as u16 + 2
    } else {
        BUTTON_HEIGHT
    }
}

fn pad_to(text: &str, width: usize) -> String {
    let w = text.width();
    if w >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - w))
    }
}

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::vertical([Constraint::Length(BUTTON_HEIGHT), Constraint::Min(0)]).split(area);

    let indicator = if state.menu_open { "▴" } else { "▾" };
    let button = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{BUTTON_LABEL} "),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(indicator, Style::default().fg(Color::Cyan)),
    ]))
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .style(Style::default().bg(Color::Blue)),
    );
    f.render_widget(button, chunks[0]);

    if !state.menu_open {
        return;
    }

    let width = chunks[1].width.saturating_sub(2) as usize;
    let lines: Vec<Line> = state
        .environments
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let selected = i == state.menu_cursor;
            let text = pad_to(&format!(" {}  {}", i + 1, entry.label), width);
            let style = if selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(Span::styled(text, style))
        })
        .collect();

    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(list, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_counts_display_width() {
        assert_eq!(pad_to("ab", 4), "ab  ");
        assert_eq!(pad_to("é", 3), "é  ");
        assert_eq!(pad_to("toolong", 3), "toolong");
    }
}

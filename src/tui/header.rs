use crate::app::{AppState, Phase};
use crate::tui::spinner;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", state.config.version_string),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
    ];

    match &state.phase {
        Phase::Idle => {
            spans.push(Span::styled("idle", Style::default().fg(Color::DarkGray)));
        }
        Phase::Triggering(env) => {
            spans.push(Span::styled(
                format!("{} triggering {}", spinner::frame(state.spinner_frame), state.label_for(env)),
                Style::default().fg(Color::Yellow),
            ));
        }
        Phase::Polling(env) => {
            spans.push(Span::styled(
                format!("watching {}", state.label_for(env)),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
            if let Some(secs) = state.next_refresh_in() {
                spans.push(Span::styled(
                    format!(" {secs}s"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }
        Phase::Failed(env) => {
            spans.push(Span::styled(
                format!("trigger failed: {}", state.label_for(env)),
                Style::default().fg(Color::Red),
            ));
        }
    }

    if state.error_message().is_some() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            "!",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    f.render_widget(header, area);
}

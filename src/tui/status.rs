//! Status panel: the active environment and its live badge.

use crate::app::{AppState, Phase};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn status_color(status: &str) -> Color {
    match status.to_ascii_lowercase().as_str() {
        "passed" | "success" => Color::Green,
        "failed" | "error" => Color::Red,
        "running" | "pending" | "created" | "preparing" | "waiting_for_resource" => Color::Yellow,
        "canceled" | "cancelled" | "skipped" | "manual" => Color::Magenta,
        _ => Color::Gray,
    }
}

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let label_style = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    match &state.active_environment {
        Some(env) => {
            lines.push(Line::from(vec![
                Span::styled("Environment  ", label_style),
                Span::styled(
                    state.label_for(env),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));

            let (status, color) = match &state.badge_status {
                Some(s) => (s.as_str(), status_color(s)),
                None if state.badge_url.is_some() => ("unknown", Color::Gray),
                None => ("waiting for badge", Color::DarkGray),
            };
            lines.push(Line::from(vec![
                Span::styled("Pipeline     ", label_style),
                Span::styled(
                    status,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]));

            if let Some(url) = &state.badge_url {
                lines.push(Line::from(vec![
                    Span::styled("Badge        ", label_style),
                    Span::styled(url.as_str(), Style::default().fg(Color::Blue)),
                ]));
            }

            if !matches!(state.phase, Phase::Polling(_)) {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "not refreshing",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        None => {
            lines.push(Line::from(Span::styled(
                "No deployment started yet. Press d to choose an environment.",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Status ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(panel, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_words_colored() {
        assert_eq!(status_color("passed"), Color::Green);
        assert_eq!(status_color("FAILED"), Color::Red);
        assert_eq!(status_color("running"), Color::Yellow);
        assert_eq!(status_color("canceled"), Color::Magenta);
        assert_eq!(status_color("whatever"), Color::Gray);
    }
}

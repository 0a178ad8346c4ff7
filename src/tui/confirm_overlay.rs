use crate::app::ConfirmOverlay;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

const WIDTH: u16 = 46;
const HEIGHT: u16 = 8;

/// Box of at most `width` x `height`, centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn key_hint<'a>(keys: &'a str, label: &'a str, color: Color) -> [Span<'a>; 2] {
    [
        Span::styled(keys, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(label, Style::default().fg(Color::DarkGray)),
    ]
}

pub fn render(f: &mut Frame, overlay: &ConfirmOverlay) {
    let rect = centered(f.area(), WIDTH, HEIGHT);
    f.render_widget(Clear, rect);

    let mut hints = Vec::with_capacity(4);
    hints.extend(key_hint("y", " deploy   ", Color::Green));
    hints.extend(key_hint("n", " cancel ", Color::Red));

    let block = Block::default()
        .title(format!(" {} ", overlay.title))
        .title_bottom(Line::from(hints).centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let body = vec![
        Line::from(""),
        Line::from(Span::styled(
            overlay.message.as_str(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("[{}] starts a pipeline, then watches its badge", overlay.environment),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .block(block)
        .centered();
    f.render_widget(paragraph, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_fits_small_area() {
        let area = Rect::new(0, 0, 30, 5);
        assert_eq!(centered(area, WIDTH, HEIGHT), Rect::new(0, 0, 30, 5));
    }

    #[test]
    fn centered_in_large_area() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered(area, WIDTH, HEIGHT), Rect::new(27, 16, 46, 8));
    }
}

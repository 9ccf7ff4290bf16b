use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{Dialog, DialogKind};

/// Modal message box drawn over the main screen
pub struct DialogWidget<'a> {
    dialog: &'a Dialog,
}

impl<'a> DialogWidget<'a> {
    pub fn new(dialog: &'a Dialog) -> Self {
        Self { dialog }
    }

    fn border_color(kind: DialogKind) -> Color {
        match kind {
            DialogKind::Warning => Color::Yellow,
            DialogKind::Info => Color::Green,
            DialogKind::Error => Color::Red,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(50, 30, area);
        f.render_widget(Clear, popup);

        let color = Self::border_color(self.dialog.kind);
        let mut lines: Vec<Line> = self
            .dialog
            .message
            .lines()
            .map(|line| Line::from(line.to_string()))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[ OK ]  Enter/Esc",
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.dialog.title))
                    .border_style(Style::default().fg(color)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, popup);
    }
}

/// A rectangle of the given percentages centred in `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(50, 30, outer);
        assert_eq!(inner.width, 50);
        assert_eq!(inner.height, 12);
        assert_eq!(inner.x, 25);
        assert!(inner.y > 0 && inner.bottom() < outer.bottom());
    }

    #[test]
    fn test_dialog_shows_title_and_message() {
        let dialog = Dialog {
            kind: DialogKind::Warning,
            title: "Input Error".to_string(),
            message: "Please enter a phone number".to_string(),
        };
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|f| DialogWidget::new(&dialog).render(f, f.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Input Error"));
        assert!(text.contains("Please enter a phone number"));
    }
}

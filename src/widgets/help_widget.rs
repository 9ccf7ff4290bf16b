use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Key reference shown with F1
const HELP_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Lookup",
        &[
            ("Enter", "Track the number in the input field"),
            ("F2", "Choose the country the number is dialled from"),
            ("Tab", "Switch between Basic Info and Advanced Info"),
        ],
    ),
    (
        "Results",
        &[
            ("Ctrl+O", "Open the coordinates in OpenStreetMap"),
            ("Ctrl+Y", "Copy the number in E.164 format"),
            ("Ctrl+B", "Copy the information on the current tab"),
        ],
    ),
    (
        "General",
        &[
            ("F1", "Show this help"),
            ("F5", "Show the application log"),
            ("Esc", "Close the current popup"),
            ("Ctrl+C / Ctrl+Q", "Quit"),
        ],
    ),
];

pub struct HelpWidget {
    scroll_offset: u16,
}

impl HelpWidget {
    pub fn new() -> Self {
        Self { scroll_offset: 0 }
    }

    pub fn lines() -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (title, keys) in HELP_SECTIONS {
            lines.push(Line::from(Span::styled(
                title.to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, description) in keys.iter() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<18}", key),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw(description.to_string()),
                ]));
            }
            lines.push(Line::from(""));
        }
        lines
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max = Self::lines().len().saturating_sub(1) as u16;
        self.scroll_offset = (self.scroll_offset + 1).min(max);
    }

    pub fn reset(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        f.render_widget(Clear, area);
        let help = Paragraph::new(Self::lines())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help (↑↓ to scroll, Esc/q to close)")
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.scroll_offset, 0));
        f.render_widget(help, area);
    }
}

impl Default for HelpWidget {
    fn default() -> Self {
        Self::new()
    }
}

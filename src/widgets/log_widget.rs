use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::utils::logging::{LogEntry, LogRingBuffer};

/// Viewer over the in-memory log, newest entries at the bottom
pub struct LogWidget {
    buffer: Option<LogRingBuffer>,
    /// Lines scrolled back from the newest entry
    scroll_back: usize,
}

impl LogWidget {
    pub fn new(buffer: Option<LogRingBuffer>) -> Self {
        Self {
            buffer,
            scroll_back: 0,
        }
    }

    fn entries(&self) -> Vec<LogEntry> {
        self.buffer
            .as_ref()
            .map(|b| b.get_recent(b.len()))
            .unwrap_or_default()
    }

    pub fn scroll_up(&mut self, amount: usize) {
        let max = self.entries().len().saturating_sub(1);
        self.scroll_back = (self.scroll_back + amount).min(max);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(amount);
    }

    pub fn scroll_to_newest(&mut self) {
        self.scroll_back = 0;
    }

    /// The entries that fit in `height` rows at the current position
    pub fn visible_entries(&self, height: usize) -> Vec<LogEntry> {
        let entries = self.entries();
        let end = entries.len().saturating_sub(self.scroll_back);
        let start = end.saturating_sub(height);
        entries[start..end].to_vec()
    }

    fn level_color(level: &str) -> Color {
        match level {
            "ERROR" => Color::Red,
            "WARN" => Color::Yellow,
            "DEBUG" | "TRACE" => Color::DarkGray,
            _ => Color::White,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        f.render_widget(Clear, area);

        let visible_height = area.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = self
            .visible_entries(visible_height)
            .iter()
            .map(|entry| {
                Line::from(Span::styled(
                    entry.format_for_display(),
                    Style::default().fg(Self::level_color(&entry.level)),
                ))
            })
            .collect();

        let title = match crate::utils::dual_logging::get_dual_logger() {
            Some(logger) => format!(
                "Log ({}) - ↑↓/PgUp/PgDn scroll, End newest, Esc close",
                logger.log_path().display()
            ),
            None => "Log - ↑↓/PgUp/PgDn scroll, End newest, Esc close".to_string(),
        };

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    fn filled(count: usize) -> LogRingBuffer {
        let buffer = LogRingBuffer::new();
        for i in 0..count {
            buffer.push(LogEntry::new(Level::INFO, "test", format!("line {}", i)));
        }
        buffer
    }

    #[test]
    fn test_shows_newest_entries() {
        let widget = LogWidget::new(Some(filled(20)));
        let visible = widget.visible_entries(5);
        assert_eq!(visible.len(), 5);
        assert_eq!(visible[4].message, "line 19");
        assert_eq!(visible[0].message, "line 15");
    }

    #[test]
    fn test_scroll_back_and_forward() {
        let mut widget = LogWidget::new(Some(filled(20)));
        widget.scroll_up(3);
        assert_eq!(widget.visible_entries(5)[4].message, "line 16");

        widget.scroll_up(100);
        let visible = widget.visible_entries(5);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].message, "line 0");

        widget.scroll_to_newest();
        assert_eq!(widget.visible_entries(5)[4].message, "line 19");
    }

    #[test]
    fn test_without_buffer() {
        let mut widget = LogWidget::new(None);
        widget.scroll_up(1);
        assert!(widget.visible_entries(10).is_empty());
    }
}

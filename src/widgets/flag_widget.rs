use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Paragraph, Widget},
};

use crate::app::FlagState;
use crate::services::flags::FlagImage;

/// Draws the flag area: the image in half-block cells, or a text fallback
pub struct FlagWidget<'a> {
    state: &'a FlagState,
}

impl<'a> FlagWidget<'a> {
    pub fn new(state: &'a FlagState) -> Self {
        Self { state }
    }

    /// Rows the flag area needs for the current state
    pub fn height(state: &FlagState) -> u16 {
        match state {
            FlagState::Hidden => 0,
            FlagState::Loading | FlagState::Label(_) => 1,
            FlagState::Image(image) => image.text_rows(),
        }
    }
}

impl Widget for FlagWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            FlagState::Hidden => {}
            FlagState::Loading => Paragraph::new("Loading flag...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .render(area, buf),
            FlagState::Label(label) => Paragraph::new(label.as_str())
                .alignment(Alignment::Center)
                .render(area, buf),
            FlagState::Image(image) => render_half_blocks(image, area, buf),
        }
    }
}

/// Each cell shows two vertically stacked pixels: the upper half block is
/// drawn in the top pixel's colour over the bottom pixel's colour.
fn render_half_blocks(image: &FlagImage, area: Rect, buf: &mut Buffer) {
    let columns = (image.width as u16).min(area.width);
    let rows = image.text_rows().min(area.height);
    let left = area.x + (area.width - columns) / 2;

    for row in 0..rows {
        for col in 0..columns {
            let top = image.pixel(col as u32, row as u32 * 2);
            let bottom = image.pixel(col as u32, row as u32 * 2 + 1);
            let (Some(top), Some(bottom)) = (top, bottom) else {
                continue;
            };
            if let Some(cell) = buf.cell_mut((left + col, area.y + row)) {
                cell.set_char('▀')
                    .set_fg(Color::Rgb(top[0], top[1], top[2]))
                    .set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped(width: u32, height: u32) -> FlagImage {
        let pixels = (0..height)
            .flat_map(|y| (0..width).map(move |_| if y % 2 == 0 { [255, 0, 0] } else { [0, 0, 255] }))
            .collect();
        FlagImage {
            width,
            height,
            pixels,
        }
    }

    #[test]
    fn test_image_uses_half_blocks() {
        let state = FlagState::Image(striped(4, 4));
        let area = Rect::new(0, 0, 8, 2);
        let mut buf = Buffer::empty(area);

        FlagWidget::new(&state).render(area, &mut buf);

        // 4 columns centred in 8
        let cell = buf.cell((2, 0)).unwrap();
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
        assert_eq!(cell.bg, Color::Rgb(0, 0, 255));
        assert_eq!(buf.cell((0, 0)).unwrap().symbol(), " ");
        assert_eq!(FlagWidget::height(&state), 2);
    }

    #[test]
    fn test_fallback_label() {
        let state = FlagState::Label("Flag of Indonesia".to_string());
        let area = Rect::new(0, 0, 17, 1);
        let mut buf = Buffer::empty(area);

        FlagWidget::new(&state).render(area, &mut buf);

        let text: String = (0..17).map(|x| buf.cell((x, 0)).unwrap().symbol().to_string()).collect();
        assert_eq!(text, "Flag of Indonesia");
        assert_eq!(FlagWidget::height(&FlagState::Hidden), 0);
    }
}

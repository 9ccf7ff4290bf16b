use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::phone::RegionEntry;

/// A region that matched the current filter
#[derive(Debug, Clone)]
pub struct RegionMatch {
    /// Index into the full region list
    pub index: usize,
    pub score: i64,
    /// Matched character positions in the display name, for highlighting
    pub indices: Vec<usize>,
}

/// Popup for choosing the dialling region, filtered with fuzzy matching
pub struct RegionPicker {
    query: String,
    matches: Vec<RegionMatch>,
    selected: usize,
    matcher: SkimMatcherV2,
}

impl RegionPicker {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            matches: Vec::new(),
            selected: 0,
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Reset the filter and put the cursor on `current`
    pub fn open(&mut self, regions: &[RegionEntry], current: usize) {
        self.query.clear();
        self.refilter(regions);
        self.selected = self
            .matches
            .iter()
            .position(|m| m.index == current)
            .unwrap_or(0);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[RegionMatch] {
        &self.matches
    }

    pub fn push_char(&mut self, c: char, regions: &[RegionEntry]) {
        self.query.push(c);
        self.refilter(regions);
    }

    pub fn pop_char(&mut self, regions: &[RegionEntry]) {
        self.query.pop();
        self.refilter(regions);
    }

    /// Matches against "Name (+code) XX" so names, calling codes and ISO
    /// codes all work as filters
    fn refilter(&mut self, regions: &[RegionEntry]) {
        self.selected = 0;

        if self.query.is_empty() {
            self.matches = (0..regions.len())
                .map(|index| RegionMatch {
                    index,
                    score: 0,
                    indices: Vec::new(),
                })
                .collect();
            return;
        }

        let mut matches: Vec<RegionMatch> = regions
            .iter()
            .enumerate()
            .filter_map(|(index, region)| {
                let haystack = format!("{} {}", region.display_name(), region.code);
                self.matcher
                    .fuzzy_indices(&haystack, &self.query)
                    .map(|(score, indices)| RegionMatch {
                        index,
                        score,
                        indices,
                    })
            })
            .collect();

        matches.sort_by(|a, b| b.score.cmp(&a.score).then(a.index.cmp(&b.index)));
        self.matches = matches;
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.matches.len() {
            self.selected += 1;
        }
    }

    pub fn page_up(&mut self, amount: usize) {
        self.selected = self.selected.saturating_sub(amount);
    }

    pub fn page_down(&mut self, amount: usize) {
        self.selected = (self.selected + amount).min(self.matches.len().saturating_sub(1));
    }

    /// Index into the full region list of the highlighted match
    pub fn selected_region(&self) -> Option<usize> {
        self.matches.get(self.selected).map(|m| m.index)
    }

    pub fn render(&self, f: &mut Frame, area: Rect, regions: &[RegionEntry]) {
        f.render_widget(Clear, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        let filter = Paragraph::new(self.query.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select Country (type to filter, Enter to choose, Esc to cancel)")
                .style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(filter, chunks[0]);

        let items: Vec<ListItem> = self
            .matches
            .iter()
            .filter_map(|m| regions.get(m.index).map(|region| (m, region)))
            .map(|(m, region)| ListItem::new(Self::highlighted_line(region, &m.indices)))
            .collect();

        let title = format!("{} of {} countries", self.matches.len(), regions.len());
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if !self.matches.is_empty() {
            state.select(Some(self.selected));
        }
        f.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn highlighted_line(region: &RegionEntry, indices: &[usize]) -> Line<'static> {
        let name = region.display_name();
        let spans: Vec<Span> = name
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if indices.contains(&i) {
                    Span::styled(
                        c.to_string(),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw(c.to_string())
                }
            })
            .collect();
        Line::from(spans)
    }
}

impl Default for RegionPicker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions() -> Vec<RegionEntry> {
        [
            ("DE", "Germany", 49),
            ("ID", "Indonesia", 62),
            ("IN", "India", 91),
            ("US", "United States", 1),
        ]
        .iter()
        .map(|(code, name, calling_code)| RegionEntry {
            code: code.to_string(),
            name: name.to_string(),
            calling_code: *calling_code,
        })
        .collect()
    }

    #[test]
    fn test_open_selects_current_region() {
        let regions = regions();
        let mut picker = RegionPicker::new();
        picker.open(&regions, 3);

        assert_eq!(picker.matches().len(), 4);
        assert_eq!(picker.selected_region(), Some(3));
    }

    #[test]
    fn test_filter_by_name() {
        let regions = regions();
        let mut picker = RegionPicker::new();
        picker.open(&regions, 0);

        for c in "indo".chars() {
            picker.push_char(c, &regions);
        }
        assert_eq!(picker.selected_region(), Some(1));
        assert!(picker.matches().iter().all(|m| m.index != 0));

        picker.pop_char(&regions);
        assert_eq!(picker.query(), "ind");
    }

    #[test]
    fn test_filter_by_calling_code() {
        let regions = regions();
        let mut picker = RegionPicker::new();
        picker.open(&regions, 0);

        for c in "+62".chars() {
            picker.push_char(c, &regions);
        }
        assert_eq!(picker.selected_region(), Some(1));
    }

    #[test]
    fn test_navigation_is_clamped() {
        let regions = regions();
        let mut picker = RegionPicker::new();
        picker.open(&regions, 0);

        picker.move_up();
        assert_eq!(picker.selected_region(), Some(0));
        picker.page_down(10);
        assert_eq!(picker.selected_region(), Some(3));
        picker.move_down();
        assert_eq!(picker.selected_region(), Some(3));
    }

    #[test]
    fn test_no_matches() {
        let regions = regions();
        let mut picker = RegionPicker::new();
        picker.open(&regions, 0);
        for c in "zzzz".chars() {
            picker.push_char(c, &regions);
        }
        assert!(picker.matches().is_empty());
        assert_eq!(picker.selected_region(), None);
    }
}

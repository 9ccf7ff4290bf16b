//! The tracker screen.
//!
//! Draws whatever the [`AppController`] holds and turns key presses into
//! controller calls. All state changes go through the controller, so the
//! screen can be rebuilt from it at any frame.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};
use std::time::Duration;
use tracing::{info, warn};
use tui_input::{backend::crossterm::EventHandler, Input};

use super::key_dispatcher::{Action, InputMode, KeyDispatcher};
use super::terminal::TerminalGuard;
use crate::app::panels::Panel;
use crate::app::{AppContext, AppController, LookupPhase, SubmitOutcome};
use crate::config::config::DisplayConfig;
use crate::handlers::map::{view_on_map, SystemBrowser, UrlOpener};
use crate::handlers::yank::{Clipboard, SystemClipboard, YankHandler, YankTarget};
use crate::phone::RegionEntry;
use crate::utils::logging::LogRingBuffer;
use crate::widgets::dialog_widget::{centered_rect, DialogWidget};
use crate::widgets::flag_widget::FlagWidget;
use crate::widgets::help_widget::HelpWidget;
use crate::widgets::log_widget::LogWidget;
use crate::widgets::region_picker::RegionPicker;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTab {
    Basic,
    Advanced,
}

impl ResultTab {
    fn from_config(name: &str) -> Self {
        if name.eq_ignore_ascii_case("advanced") {
            ResultTab::Advanced
        } else {
            ResultTab::Basic
        }
    }

    fn index(self) -> usize {
        match self {
            ResultTab::Basic => 0,
            ResultTab::Advanced => 1,
        }
    }

    fn toggled(self) -> Self {
        match self {
            ResultTab::Basic => ResultTab::Advanced,
            ResultTab::Advanced => ResultTab::Basic,
        }
    }
}

/// Popup covering the main screen, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlay {
    None,
    RegionPicker,
    Help,
    Logs,
}

pub struct TrackerTui {
    controller: AppController,
    regions: Vec<RegionEntry>,
    selected_region: usize,
    input: Input,
    tab: ResultTab,
    overlay: Overlay,
    picker: RegionPicker,
    help: HelpWidget,
    logs: LogWidget,
    dispatcher: KeyDispatcher,
    clipboard: Box<dyn Clipboard>,
    browser: Box<dyn UrlOpener>,
    use_glyphs: bool,
    should_quit: bool,
}

impl TrackerTui {
    pub fn new(
        controller: AppController,
        regions: Vec<RegionEntry>,
        selected_region: usize,
        display: &DisplayConfig,
        clipboard: Box<dyn Clipboard>,
        browser: Box<dyn UrlOpener>,
        log_buffer: Option<LogRingBuffer>,
    ) -> Self {
        Self {
            controller,
            selected_region: selected_region.min(regions.len().saturating_sub(1)),
            regions,
            input: Input::default(),
            tab: ResultTab::from_config(&display.start_tab),
            overlay: Overlay::None,
            picker: RegionPicker::new(),
            help: HelpWidget::new(),
            logs: LogWidget::new(log_buffer),
            dispatcher: KeyDispatcher::new(),
            clipboard,
            browser,
            use_glyphs: display.use_glyphs,
            should_quit: false,
        }
    }

    /// Screen wired to the real clipboard, browser and background threads
    pub fn from_context(context: &AppContext, log_buffer: Option<LogRingBuffer>) -> Self {
        Self::new(
            context.controller(),
            context.regions().to_vec(),
            context.default_region_index(),
            &context.config().display,
            Box::new(SystemClipboard),
            Box::new(SystemBrowser),
            log_buffer,
        )
    }

    pub fn controller(&self) -> &AppController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AppController {
        &mut self.controller
    }

    pub fn selected_region(&self) -> Option<&RegionEntry> {
        self.regions.get(self.selected_region)
    }

    pub fn input_text(&self) -> &str {
        self.input.value()
    }

    pub fn tab(&self) -> ResultTab {
        self.tab
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn run(mut self) -> Result<()> {
        let mut guard = TerminalGuard::new()?;
        info!(target: "tui", "Tracker screen started");

        loop {
            self.controller.process_pending_events();
            guard.terminal_mut().draw(|f| self.draw(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    // Windows reports releases too
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        info!(target: "tui", "Tracker screen closed");
        Ok(())
    }

    fn input_mode(&self) -> InputMode {
        if self.controller.dialog().is_some() {
            return InputMode::Dialog;
        }
        match self.overlay {
            Overlay::None => InputMode::Main,
            Overlay::RegionPicker => InputMode::RegionPicker,
            Overlay::Help => InputMode::Help,
            Overlay::Logs => InputMode::Logs,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let mode = self.input_mode();
        match self.dispatcher.action(mode, &key) {
            Some(action) => self.apply(mode, action),
            None => self.handle_unbound_key(mode, key),
        }
    }

    fn handle_unbound_key(&mut self, mode: InputMode, key: KeyEvent) {
        match mode {
            InputMode::Main => {
                self.input.handle_event(&Event::Key(key));
            }
            InputMode::RegionPicker => match key.code {
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.picker.push_char(c, &self.regions)
                }
                KeyCode::Backspace => self.picker.pop_char(&self.regions),
                _ => {}
            },
            InputMode::Dialog | InputMode::Help | InputMode::Logs => {}
        }
    }

    fn apply(&mut self, mode: InputMode, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Track => self.track(),
            Action::OpenRegionPicker => {
                self.picker.open(&self.regions, self.selected_region);
                self.overlay = Overlay::RegionPicker;
            }
            Action::SwitchTab => self.tab = self.tab.toggled(),
            Action::ViewOnMap => self.open_map(),
            Action::CopyE164 => self.yank(YankTarget::E164),
            Action::CopyPanel => self.yank(match self.tab {
                ResultTab::Basic => YankTarget::BasicPanel,
                ResultTab::Advanced => YankTarget::AdvancedPanel,
            }),
            Action::ShowHelp => {
                self.help.reset();
                self.overlay = Overlay::Help;
            }
            Action::ShowLogs => {
                self.logs.scroll_to_newest();
                self.overlay = Overlay::Logs;
            }
            Action::Close => {
                if mode == InputMode::Dialog {
                    self.controller.dismiss_dialog();
                } else {
                    self.overlay = Overlay::None;
                }
            }
            Action::Confirm => {
                if let Some(index) = self.picker.selected_region() {
                    self.selected_region = index;
                    if let Some(region) = self.regions.get(index) {
                        info!(target: "tui", "Region set to {}", region.code);
                    }
                }
                self.overlay = Overlay::None;
            }
            Action::MoveUp => match mode {
                InputMode::RegionPicker => self.picker.move_up(),
                InputMode::Help => self.help.scroll_up(),
                InputMode::Logs => self.logs.scroll_up(1),
                _ => {}
            },
            Action::MoveDown => match mode {
                InputMode::RegionPicker => self.picker.move_down(),
                InputMode::Help => self.help.scroll_down(),
                InputMode::Logs => self.logs.scroll_down(1),
                _ => {}
            },
            Action::PageUp => match mode {
                InputMode::RegionPicker => self.picker.page_up(PAGE_SIZE),
                InputMode::Logs => self.logs.scroll_up(PAGE_SIZE),
                _ => {}
            },
            Action::PageDown => match mode {
                InputMode::RegionPicker => self.picker.page_down(PAGE_SIZE),
                InputMode::Logs => self.logs.scroll_down(PAGE_SIZE),
                _ => {}
            },
            Action::Top => match mode {
                InputMode::Help => self.help.reset(),
                InputMode::Logs => self.logs.scroll_up(usize::MAX / 2),
                _ => {}
            },
            Action::Bottom => {
                if mode == InputMode::Logs {
                    self.logs.scroll_to_newest();
                }
            }
        }
    }

    fn track(&mut self) {
        let Some(region) = self.regions.get(self.selected_region).cloned() else {
            self.controller.set_status("No country selected");
            return;
        };
        let typed = self.input.value().to_string();
        if let SubmitOutcome::Busy = self.controller.submit(&typed, &region) {
            self.controller.set_status("A lookup is already running");
        }
    }

    fn open_map(&mut self) {
        match view_on_map(&self.controller, self.browser.as_ref()) {
            Ok(message) => self.controller.set_status(message),
            Err(e) => {
                warn!(target: "tui", "Opening the map failed: {:#}", e);
                self.controller.set_status(format!("Could not open map: {}", e));
            }
        }
    }

    fn yank(&mut self, target: YankTarget) {
        match YankHandler::yank(target, &self.controller, self.clipboard.as_mut()) {
            Ok(message) => self.controller.set_status(message),
            Err(e) => {
                warn!(target: "yank", "Copy failed: {:#}", e);
                self.controller.set_status(format!("Copy failed: {}", e));
            }
        }
    }

    pub fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // title
                Constraint::Length(3), // region, number, track
                Constraint::Length(2), // tabs
                Constraint::Min(5),    // results
                Constraint::Length(1), // status
                Constraint::Length(1), // key hints
            ])
            .split(f.area());

        self.draw_title(f, chunks[0]);
        self.draw_input_row(f, chunks[1]);
        self.draw_tabs(f, chunks[2]);
        self.draw_results(f, chunks[3]);
        self.draw_status(f, chunks[4]);
        self.draw_key_hints(f, chunks[5]);

        let area = f.area();
        match self.overlay {
            Overlay::None => {}
            Overlay::RegionPicker => {
                self.picker
                    .render(f, centered_rect(60, 70, area), &self.regions)
            }
            Overlay::Help => self.help.render(f, centered_rect(60, 60, area)),
            Overlay::Logs => self.logs.render(f, centered_rect(90, 80, area)),
        }

        if let Some(dialog) = self.controller.dialog() {
            DialogWidget::new(dialog).render(f, area);
        }
    }

    fn draw_title(&self, f: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(Span::styled(
            "Phone Number Tracker",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn draw_input_row(&self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Min(20),
                Constraint::Length(14),
            ])
            .split(area);

        let region_text = self
            .selected_region()
            .map(|r| r.display_name())
            .unwrap_or_else(|| "No countries available".to_string());
        let region = Paragraph::new(region_text).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Country (F2)"),
        );
        f.render_widget(region, columns[0]);

        let input_area = columns[1];
        let width = input_area.width.saturating_sub(2) as usize;
        let scroll = self.input.visual_scroll(width);
        let focused = self.input_mode() == InputMode::Main;
        let border = if focused { Color::Yellow } else { Color::DarkGray };
        let number = Paragraph::new(self.input.value())
            .scroll((0, scroll as u16))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Phone Number")
                    .border_style(Style::default().fg(border)),
            );
        f.render_widget(number, input_area);
        if focused {
            f.set_cursor_position((
                input_area.x + 1 + (self.input.visual_cursor().saturating_sub(scroll)) as u16,
                input_area.y + 1,
            ));
        }

        let (label, style) = if self.controller.can_submit() {
            (
                "Track",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("Working", Style::default().fg(Color::DarkGray))
        };
        let button = Paragraph::new(Span::styled(label, style))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Enter"));
        f.render_widget(button, columns[2]);
    }

    fn draw_tabs(&self, f: &mut Frame, area: Rect) {
        let tabs = Tabs::new(vec!["Basic Info", "Advanced Info"])
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .select(self.tab.index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            );
        f.render_widget(tabs, area);
    }

    fn draw_results(&self, f: &mut Frame, area: Rect) {
        let panel = match self.tab {
            ResultTab::Basic => self.controller.basic_panel(),
            ResultTab::Advanced => self.controller.advanced_panel(),
        };

        let Some(panel) = panel else {
            let hint = Paragraph::new("Enter a phone number and press Enter to track it")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(hint, area);
            return;
        };

        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let flag_height = FlagWidget::height(self.controller.flag());
        let map_height = if self.tab == ResultTab::Advanced { 1 } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(flag_height),
                Constraint::Min(1),
                Constraint::Length(map_height),
            ])
            .split(inner);

        f.render_widget(FlagWidget::new(self.controller.flag()), rows[0]);

        let text = Paragraph::new(panel_lines(&panel)).wrap(Wrap { trim: false });
        f.render_widget(text, rows[1]);

        if self.tab == ResultTab::Advanced {
            let style = if self.controller.map_available() {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let map = Paragraph::new(Span::styled("[ View on Map: Ctrl+O ]", style))
                .alignment(Alignment::Center);
            f.render_widget(map, rows[2]);
        }
    }

    fn status_glyph(&self) -> &'static str {
        match (self.controller.phase(), self.use_glyphs) {
            (LookupPhase::Submitting { .. }, true) => "⏳ ",
            (LookupPhase::Failed, true) => "✗ ",
            (LookupPhase::Displaying, true) => "✓ ",
            (LookupPhase::Submitting { .. }, false) => "[..] ",
            (LookupPhase::Failed, false) => "[!] ",
            (LookupPhase::Displaying, false) => "[ok] ",
            (LookupPhase::Idle, _) => "",
        }
    }

    fn draw_status(&self, f: &mut Frame, area: Rect) {
        let color = match self.controller.phase() {
            LookupPhase::Submitting { .. } => Color::Yellow,
            LookupPhase::Failed => Color::Red,
            _ => Color::Green,
        };
        let status = Paragraph::new(Line::from(vec![
            Span::styled(self.status_glyph(), Style::default().fg(color)),
            Span::raw(self.controller.status().to_string()),
        ]));
        f.render_widget(status, area);
    }

    fn draw_key_hints(&self, f: &mut Frame, area: Rect) {
        let hints = Paragraph::new(
            "Enter track | F2 country | Tab switch | Ctrl+O map | Ctrl+Y copy | F1 help | Ctrl+Q quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(hints, area);
    }
}

fn panel_lines(panel: &Panel) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for section in &panel.sections {
        lines.push(Line::from(Span::styled(
            format!("========== {} ==========", section.title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for (label, value) in &section.rows {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<20}", format!("{}:", label)), Style::default().fg(Color::Yellow)),
                Span::raw(value.clone()),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines
}

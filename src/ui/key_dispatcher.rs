use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Represents a key binding
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }

    pub fn with_ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Which part of the screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputMode {
    Main,
    RegionPicker,
    Dialog,
    Help,
    Logs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Track,
    OpenRegionPicker,
    SwitchTab,
    ViewOnMap,
    CopyE164,
    CopyPanel,
    ShowHelp,
    ShowLogs,
    Close,
    Confirm,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

/// Maps keys to actions per input mode. Keys without a binding fall
/// through to the focused text field.
pub struct KeyDispatcher {
    maps: HashMap<InputMode, HashMap<KeyBinding, Action>>,
}

impl KeyDispatcher {
    pub fn new() -> Self {
        let mut dispatcher = Self {
            maps: HashMap::new(),
        };
        dispatcher.setup_main_bindings();
        dispatcher.setup_picker_bindings();
        dispatcher.setup_dialog_bindings();
        dispatcher.setup_scroll_bindings(InputMode::Help);
        dispatcher.setup_scroll_bindings(InputMode::Logs);
        dispatcher
    }

    fn bind(&mut self, mode: InputMode, binding: KeyBinding, action: Action) {
        self.maps.entry(mode).or_default().insert(binding, action);
    }

    fn setup_main_bindings(&mut self) {
        let mode = InputMode::Main;
        self.bind(mode, KeyBinding::new(KeyCode::Enter), Action::Track);
        self.bind(mode, KeyBinding::new(KeyCode::F(2)), Action::OpenRegionPicker);
        self.bind(mode, KeyBinding::new(KeyCode::Tab), Action::SwitchTab);
        self.bind(mode, KeyBinding::new(KeyCode::BackTab), Action::SwitchTab);
        self.bind(mode, KeyBinding::with_ctrl(KeyCode::Char('o')), Action::ViewOnMap);
        self.bind(mode, KeyBinding::with_ctrl(KeyCode::Char('y')), Action::CopyE164);
        self.bind(mode, KeyBinding::with_ctrl(KeyCode::Char('b')), Action::CopyPanel);
        self.bind(mode, KeyBinding::new(KeyCode::F(1)), Action::ShowHelp);
        self.bind(mode, KeyBinding::new(KeyCode::F(5)), Action::ShowLogs);
        self.bind(mode, KeyBinding::with_ctrl(KeyCode::Char('c')), Action::Quit);
        self.bind(mode, KeyBinding::with_ctrl(KeyCode::Char('q')), Action::Quit);
    }

    fn setup_picker_bindings(&mut self) {
        let mode = InputMode::RegionPicker;
        self.bind(mode, KeyBinding::new(KeyCode::Enter), Action::Confirm);
        self.bind(mode, KeyBinding::new(KeyCode::Esc), Action::Close);
        self.bind(mode, KeyBinding::new(KeyCode::Up), Action::MoveUp);
        self.bind(mode, KeyBinding::new(KeyCode::Down), Action::MoveDown);
        self.bind(mode, KeyBinding::new(KeyCode::PageUp), Action::PageUp);
        self.bind(mode, KeyBinding::new(KeyCode::PageDown), Action::PageDown);
        self.bind(mode, KeyBinding::with_ctrl(KeyCode::Char('c')), Action::Quit);
    }

    fn setup_dialog_bindings(&mut self) {
        let mode = InputMode::Dialog;
        self.bind(mode, KeyBinding::new(KeyCode::Enter), Action::Close);
        self.bind(mode, KeyBinding::new(KeyCode::Esc), Action::Close);
        self.bind(mode, KeyBinding::new(KeyCode::Char(' ')), Action::Close);
        self.bind(mode, KeyBinding::with_ctrl(KeyCode::Char('c')), Action::Quit);
    }

    fn setup_scroll_bindings(&mut self, mode: InputMode) {
        self.bind(mode, KeyBinding::new(KeyCode::Esc), Action::Close);
        self.bind(mode, KeyBinding::new(KeyCode::Char('q')), Action::Close);
        self.bind(mode, KeyBinding::new(KeyCode::Up), Action::MoveUp);
        self.bind(mode, KeyBinding::new(KeyCode::Char('k')), Action::MoveUp);
        self.bind(mode, KeyBinding::new(KeyCode::Down), Action::MoveDown);
        self.bind(mode, KeyBinding::new(KeyCode::Char('j')), Action::MoveDown);
        self.bind(mode, KeyBinding::new(KeyCode::PageUp), Action::PageUp);
        self.bind(mode, KeyBinding::new(KeyCode::PageDown), Action::PageDown);
        self.bind(mode, KeyBinding::new(KeyCode::Home), Action::Top);
        self.bind(mode, KeyBinding::new(KeyCode::End), Action::Bottom);
        self.bind(mode, KeyBinding::with_ctrl(KeyCode::Char('c')), Action::Quit);
    }

    /// Action bound to `key` in `mode`, if any
    pub fn action(&self, mode: InputMode, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);
        self.maps
            .get(&mode)
            .and_then(|map| map.get(&binding))
            .copied()
    }
}

impl Default for KeyDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

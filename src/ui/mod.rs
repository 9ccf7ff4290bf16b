pub mod key_dispatcher;
pub mod terminal;
pub mod tracker_tui;

pub use tracker_tui::TrackerTui;

pub mod dialog_widget;
pub mod flag_widget;
pub mod help_widget;
pub mod log_widget;
pub mod region_picker;

//! Actions that leave the application: clipboard and browser.

pub mod map;
pub mod yank;

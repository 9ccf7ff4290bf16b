use anyhow::{anyhow, Result};
use tracing::debug;

use crate::app::controller::AppController;

/// What part of the displayed result to copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YankTarget {
    E164,
    BasicPanel,
    AdvancedPanel,
}

/// Destination for yanked text
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| anyhow!("Failed to access clipboard: {}", e))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| anyhow!("Failed to copy to clipboard: {}", e))
    }
}

pub struct YankHandler;

impl YankHandler {
    /// Text for `target` from the displayed result, if there is one
    pub fn yank_text(target: YankTarget, controller: &AppController) -> Option<String> {
        match target {
            YankTarget::E164 => controller.last_result().map(|r| r.e164_format.clone()),
            YankTarget::BasicPanel => controller.basic_panel().map(|p| p.plain_text()),
            YankTarget::AdvancedPanel => controller.advanced_panel().map(|p| p.plain_text()),
        }
    }

    /// Copy `target` and return the status message to show
    pub fn yank(
        target: YankTarget,
        controller: &AppController,
        clipboard: &mut dyn Clipboard,
    ) -> Result<String> {
        let Some(text) = Self::yank_text(target, controller) else {
            return Ok("Nothing to copy yet".to_string());
        };
        debug!(target: "yank", "Yanking {:?} ({} chars)", target, text.len());

        clipboard.set_text(&text)?;
        Ok(match target {
            YankTarget::E164 => format!("Copied {}", text),
            YankTarget::BasicPanel => "Copied basic info".to_string(),
            YankTarget::AdvancedPanel => "Copied advanced info".to_string(),
        })
    }
}

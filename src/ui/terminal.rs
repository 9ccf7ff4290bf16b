use anyhow::{anyhow, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tracing::error;

/// Puts the terminal in raw/alternate-screen mode and restores it on drop,
/// including when the UI loop returns an error or panics.
///
/// While the guard lives, panic reports go to the log instead of stderr,
/// which would land on the alternate screen in raw mode.
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode().map_err(|e| anyhow!("Failed to enable raw mode: {}", e))?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(anyhow!("Failed to setup terminal: {}", e));
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => {
                install_panic_logging();
                Ok(Self { terminal })
            }
            Err(e) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                Err(anyhow!("Failed to create terminal: {}", e))
            }
        }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
        restore_panic_hook();

        if std::thread::panicking() {
            eprintln!("phone-tracker stopped after an internal error; details are in the log");
        }
    }
}

/// Report panics on any thread through `tracing::error!`
pub fn install_panic_logging() {
    panic::set_hook(Box::new(|info| {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown cause".to_string())
            .replace('\n', " ");
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());
        let thread = std::thread::current();

        error!(
            target: "panic",
            "Thread '{}' panicked at {}: {}",
            thread.name().unwrap_or("unnamed"),
            location,
            message
        );
    }));
}

/// Put back the default panic hook
pub fn restore_panic_hook() {
    let _ = panic::take_hook();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::logging::{DualWriter, LogRingBuffer};

    #[test]
    fn test_panics_are_logged() {
        let buffer = LogRingBuffer::new();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(DualWriter::new(buffer.clone(), None))
            .with_ansi(false)
            .without_time()
            .compact()
            .finish();

        let caught = tracing::subscriber::with_default(subscriber, || {
            install_panic_logging();
            let caught = panic::catch_unwind(|| panic!("flag decoder exploded"));
            restore_panic_hook();
            caught
        });

        assert!(caught.is_err());
        let entries = buffer.get_recent(10);
        let entry = entries
            .iter()
            .find(|e| e.message.contains("flag decoder exploded"))
            .unwrap();
        assert_eq!(entry.level, "ERROR");
        assert_eq!(entry.target, "panic");
    }
}

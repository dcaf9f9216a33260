//! Terminal setup and teardown utilities.
//!
//! This module provides functions for initializing and restoring the terminal
//! state, a panic hook that restores the terminal before the panic message is
//! printed, and [`TerminalBell`], the haptics sink used in a terminal.

use std::io::{self, Stdout, Write};

use cardgrid_engine::Haptics;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

/// The terminal type used by the application.
pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Error type for terminal operations.
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    /// Failed to initialize the terminal.
    #[error("failed to setup terminal: {0}")]
    Setup(#[source] io::Error),

    /// Failed to restore the terminal.
    #[error("failed to restore terminal: {0}")]
    Restore(#[source] io::Error),
}

/// Sets up the terminal for TUI rendering.
///
/// Enables raw mode, enters the alternate screen, and turns on mouse capture
/// so pointer drags reach the grid.
///
/// # Errors
///
/// Returns an error if any terminal operation fails.
///
/// # Examples
///
/// ```no_run
/// use cardgrid_tui::terminal;
///
/// let mut terminal = terminal::setup_terminal().expect("failed to setup terminal");
/// // Use terminal...
/// terminal::restore_terminal(&mut terminal).expect("failed to restore terminal");
/// ```
pub fn setup_terminal() -> Result<AppTerminal, TerminalError> {
    enable_raw_mode().map_err(TerminalError::Setup)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(TerminalError::Setup)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(TerminalError::Setup)
}

/// Restores the terminal to its original state.
///
/// # Errors
///
/// Returns an error if any terminal operation fails.
pub fn restore_terminal(terminal: &mut AppTerminal) -> Result<(), TerminalError> {
    disable_raw_mode().map_err(TerminalError::Restore)?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .map_err(TerminalError::Restore)?;
    terminal.show_cursor().map_err(TerminalError::Restore)?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before panicking.
///
/// Call this once at startup, before [`setup_terminal`]. The previous hook
/// still runs after the terminal has been restored.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Haptics for terminals: rings the bell once per pattern.
///
/// Terminals have no vibration motor, so the pattern's shape is ignored.
/// Only the drop pattern (more than one pulse) rings, keeping drag starts
/// silent.
///
/// # Examples
///
/// ```
/// use cardgrid_engine::Haptics;
/// use cardgrid_engine::haptics::{DRAG_START_PATTERN, DROP_PATTERN};
/// use cardgrid_tui::terminal::TerminalBell;
///
/// let mut bell = TerminalBell::new(Vec::new());
/// bell.vibrate(DRAG_START_PATTERN);
/// bell.vibrate(DROP_PATTERN);
/// assert_eq!(bell.into_inner(), b"\x07");
/// ```
#[derive(Debug)]
pub struct TerminalBell<W: Write = Stdout> {
    out: W,
}

impl Default for TerminalBell {
    fn default() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalBell<W> {
    /// Creates a bell writing to `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Haptics for TerminalBell<W> {
    fn vibrate(&mut self, pattern: &[u32]) {
        if pattern.len() < 2 {
            return;
        }
        // A bell that cannot be written is not worth surfacing.
        let _ = self.out.write_all(b"\x07").and_then(|()| self.out.flush());
    }
}

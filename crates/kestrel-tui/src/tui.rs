//! Owning the terminal: raw mode, alternate screen, and restoring both on
//! every exit path including panics.

use std::io::{self, Stdout, stdout};

use color_eyre::eyre::Result;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tracing::warn;

type Backend = CrosstermBackend<Stdout>;

pub struct Tui {
    terminal: Terminal<Backend>,
    /// Set between `enter` and `exit`, so restoring happens at most once.
    entered: bool,
}

impl Tui {
    /// Wraps stdout. The screen is untouched until [`Tui::enter`].
    pub fn new() -> Result<Self> {
        Ok(Self {
            terminal: Terminal::new(CrosstermBackend::new(stdout()))?,
            entered: false,
        })
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        self.entered = true;
        self.terminal.clear()?;
        Ok(())
    }

    pub fn exit(&mut self) {
        if !std::mem::take(&mut self.entered) {
            return;
        }
        if let Err(e) = restore() {
            warn!(error = %e, "terminal was not fully restored");
        }
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        self.exit();
    }
}

fn restore() -> io::Result<()> {
    execute!(stdout(), LeaveAlternateScreen, cursor::Show)?;
    terminal::disable_raw_mode()
}

/// Panic and eyre hooks that put the terminal back before reporting.
///
/// Installed before the terminal is entered so early failures print cleanly.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .panic_section("kestrel crashed; the log file may have details")
        .into_hooks();
    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        // Ignored: the report matters more than a clean screen.
        let _ = restore();
        panic_hook(info);
    }));
    Ok(())
}

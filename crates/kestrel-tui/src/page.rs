//! Page trait: the state machine behind one navigable screen.

use ratatui::{Frame, layout::Rect};

use crate::action::Action;
use crate::command::Command;

/// A key binding advertised in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub key: &'static str,
    pub name: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, name: &'static str) -> Self {
        Self { key, name }
    }
}

/// Every screen inside a tab implements Page.
///
/// Lifecycle: built by its tab on a `Load*Page` action → `init` →
/// (`update` | `on_tick` | `render`)*. A page only mutates itself; anything
/// it wants done elsewhere is returned as [`Command`]s.
pub trait Page: Send {
    /// Commands to run when the page becomes active.
    fn init(&mut self) -> Vec<Command> {
        Vec::new()
    }

    /// Consume one action.
    fn update(&mut self, action: &Action) -> Vec<Command>;

    /// Advance animations.
    fn on_tick(&mut self) {}

    fn render(&self, frame: &mut Frame, area: Rect);

    /// Breadcrumb shown in the status bar.
    fn title(&self) -> String;

    fn shortcuts(&self) -> Vec<Shortcut> {
        Vec::new()
    }
}

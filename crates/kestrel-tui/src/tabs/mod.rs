//! Navigation controllers, one per resource area.
//!
//! A tab owns exactly one active [`Page`]. It intercepts `Load*Page`
//! actions, builds (or reuses) the target page, returns the page's init
//! commands and makes it active. Everything else goes to the page that owns
//! it, which is usually the active one.

pub mod cgroups;
pub mod schema_registry;
pub mod topics;

use ratatui::{Frame, layout::Rect};

use crate::action::Action;
use crate::command::Command;
use crate::page::Page;

pub use cgroups::CGroupsTab;
pub use schema_registry::SchemaRegistryTab;
pub use topics::TopicsTab;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::EnumIter)]
pub enum TabId {
    #[default]
    Topics,
    ConsumerGroups,
    SchemaRegistry,
}

impl TabId {
    /// All tabs in tab-bar order.
    pub const ALL: [TabId; 3] = [Self::Topics, Self::ConsumerGroups, Self::SchemaRegistry];

    pub fn label(self) -> &'static str {
        match self {
            Self::Topics => "Topics",
            Self::ConsumerGroups => "Consumer Groups",
            Self::SchemaRegistry => "Schema Registry",
        }
    }

    /// Global shortcut, shown in the tab bar.
    pub fn hotkey(self) -> char {
        match self {
            Self::Topics => 't',
            Self::ConsumerGroups => 'g',
            Self::SchemaRegistry => 's',
        }
    }

    pub fn from_hotkey(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.hotkey() == c)
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&t| t == self).unwrap_or(0)
    }
}

pub trait Tab: Send {
    fn id(&self) -> TabId;

    /// Commands of the landing page, run once when the tab is built.
    fn init(&mut self) -> Vec<Command>;

    fn update(&mut self, action: Action) -> Vec<Command>;

    fn active_page(&self) -> &dyn Page;

    fn active_page_mut(&mut self) -> &mut dyn Page;

    fn on_tick(&mut self) {
        self.active_page_mut().on_tick();
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.active_page().render(frame, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotkeys_round_trip() {
        for tab in TabId::ALL {
            assert_eq!(TabId::from_hotkey(tab.hotkey()), Some(tab));
        }
        assert_eq!(TabId::from_hotkey('x'), None);
    }

    #[test]
    fn index_follows_tab_bar_order() {
        assert_eq!(TabId::SchemaRegistry.index(), 2);
    }
}

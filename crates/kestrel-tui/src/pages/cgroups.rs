//! Consumer group list.

use std::cmp::Ordering;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use throbber_widgets_tui::ThrobberState;

use kestrel_core::{CGroupDeleter, CGroupLister, ConsumerGroup, Operation};

use crate::action::{Action, Confirm};
use crate::command::{Command, Scope, admin};
use crate::page::{Page, Shortcut};
use crate::pages::{ctrl, emit, render_loading};
use crate::widgets::list_view::{ListItem, ListView};

pub const PAGE: &str = "cgroups";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumIter)]
pub enum GroupColumn {
    #[default]
    Name,
    State,
    Members,
}

impl ListItem for ConsumerGroup {
    type Column = GroupColumn;

    fn primary_text(&self) -> &str {
        &self.name
    }

    fn compare(&self, other: &Self, column: GroupColumn) -> Ordering {
        match column {
            GroupColumn::Name => self.name.cmp(&other.name),
            GroupColumn::State => self.state.cmp(&other.state),
            GroupColumn::Members => self.members.len().cmp(&other.members.len()),
        }
    }

    fn cell(&self, column: GroupColumn) -> String {
        match column {
            GroupColumn::Name => self.name.clone(),
            GroupColumn::State => self.state.clone(),
            GroupColumn::Members => self.members.len().to_string(),
        }
    }

    fn width(column: GroupColumn) -> Constraint {
        match column {
            GroupColumn::Name => Constraint::Fill(1),
            GroupColumn::State => Constraint::Length(14),
            GroupColumn::Members => Constraint::Length(10),
        }
    }
}

pub struct CGroupsPage {
    scope: Scope,
    lister: Arc<dyn CGroupLister>,
    deleter: Arc<dyn CGroupDeleter>,
    list: ListView<ConsumerGroup>,
    loading: bool,
    loaded: bool,
    throbber_state: ThrobberState,
}

impl CGroupsPage {
    pub fn new(lister: Arc<dyn CGroupLister>, deleter: Arc<dyn CGroupDeleter>) -> Self {
        Self {
            scope: Scope::new(PAGE),
            lister,
            deleter,
            list: ListView::new(),
            loading: false,
            loaded: false,
            throbber_state: ThrobberState::default(),
        }
    }

    pub fn list(&self) -> &ListView<ConsumerGroup> {
        &self.list
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Commands finishing this page's listing are keyed under it.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    fn refresh(&mut self) -> Vec<Command> {
        self.loading = true;
        vec![admin::list_cgroups(Arc::clone(&self.lister)).keyed(self.scope)]
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        if !self.loaded || self.list.handle_key(key) {
            return Vec::new();
        }
        if key.code == KeyCode::F(5) {
            return self.refresh();
        }
        let Some(group) = self.list.selected_item().cloned() else {
            return Vec::new();
        };
        if ctrl(key, 'd') {
            let delete = admin::delete_cgroup(Arc::clone(&self.deleter), group.name.clone());
            return emit(Action::RequestConfirm(Confirm::new(
                format!("Delete consumer group {}?", group.name),
                delete.keyed(self.scope),
            )));
        }
        if key.code == KeyCode::Enter {
            return emit(Action::LoadCGroupTopicsPage { group });
        }
        Vec::new()
    }
}

impl Page for CGroupsPage {
    fn init(&mut self) -> Vec<Command> {
        self.refresh()
    }

    fn update(&mut self, action: &Action) -> Vec<Command> {
        match action {
            Action::ConsumerGroupListingStarted(_) => {
                self.loading = true;
                Vec::new()
            }
            Action::ConsumerGroupsListed(groups) => {
                self.list.set_items(groups.clone());
                self.loading = false;
                self.loaded = true;
                Vec::new()
            }
            Action::ConsumerGroupDeleted { .. } => self.refresh(),
            Action::Error(envelope) if envelope.operation == Operation::ListConsumerGroups => {
                self.loading = false;
                Vec::new()
            }
            Action::Key(key) => self.handle_key(key),
            _ => Vec::new(),
        }
    }

    fn on_tick(&mut self) {
        if self.loading {
            self.throbber_state.calc_next();
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        if self.loading && !self.loaded {
            render_loading(frame, area, "Loading consumer groups", &self.throbber_state);
        } else {
            self.list.render(frame, area, "Consumer Groups");
        }
    }

    fn title(&self) -> String {
        "Consumer Groups".into()
    }

    fn shortcuts(&self) -> Vec<Shortcut> {
        vec![
            Shortcut::new("F5", "Refresh"),
            Shortcut::new("/", "Filter"),
            Shortcut::new("F3", "Sort"),
            Shortcut::new("⏎", "Offsets"),
            Shortcut::new("^D", "Delete"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_core::{GroupMember, SandboxCluster};
    use pretty_assertions::assert_eq;

    fn group(name: &str, members: usize) -> ConsumerGroup {
        ConsumerGroup {
            name: name.into(),
            state: if members == 0 { "Empty" } else { "Stable" }.into(),
            members: (0..members)
                .map(|i| GroupMember {
                    member_id: format!("m-{i}"),
                    client_id: "client".into(),
                    client_host: "/10.0.0.1".into(),
                })
                .collect(),
        }
    }

    fn page() -> CGroupsPage {
        let cluster = Arc::new(SandboxCluster::new());
        CGroupsPage::new(cluster.clone(), cluster)
    }

    #[test]
    fn stays_loading_until_groups_arrive() {
        let mut page = page();
        page.init();
        assert!(page.is_loading());
        page.update(&Action::ConsumerGroupsListed(vec![group("b", 0), group("a", 2)]));
        assert!(!page.is_loading());
        let names: Vec<_> = page.list().displayed().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn members_column_sorts_by_count() {
        let mut page = page();
        page.update(&Action::ConsumerGroupsListed(vec![
            group("few", 1),
            group("many", 3),
            group("none", 0),
        ]));
        for code in [KeyCode::F(3), KeyCode::Right, KeyCode::Right, KeyCode::Enter] {
            page.update(&Action::Key(KeyEvent::from(code)));
        }
        let names: Vec<_> = page.list().displayed().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["many", "few", "none"]);
    }

    #[test]
    fn enter_opens_offsets_of_selected_group() {
        let mut page = page();
        page.update(&Action::ConsumerGroupsListed(vec![group("billing", 1)]));
        let commands = page.update(&Action::Key(KeyEvent::from(KeyCode::Enter)));
        assert_eq!(commands.len(), 1);
    }
}

//! Config entries of one topic, with inline value editing.

use std::cmp::Ordering;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use throbber_widgets_tui::ThrobberState;

use kestrel_core::{ConfigEntry, ConfigLister, ConfigUpdater, Operation, ResourceRef};

use crate::action::Action;
use crate::command::{Command, Scope, admin};
use crate::page::{Page, Shortcut};
use crate::pages::{emit, render_loading};
use crate::widgets::list_view::{ListItem, ListView};
use crate::widgets::text_field::TextField;

const PAGE: &str = "topic-configs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumIter)]
pub enum ConfigColumn {
    #[default]
    Key,
    Value,
}

impl ListItem for ConfigEntry {
    type Column = ConfigColumn;

    fn primary_text(&self) -> &str {
        &self.key
    }

    fn compare(&self, other: &Self, column: ConfigColumn) -> Ordering {
        match column {
            ConfigColumn::Key => self.key.cmp(&other.key),
            ConfigColumn::Value => self.value.cmp(&other.value),
        }
    }

    fn cell(&self, column: ConfigColumn) -> String {
        match column {
            ConfigColumn::Key => self.key.clone(),
            ConfigColumn::Value => self.value.clone(),
        }
    }
}

pub struct TopicConfigsPage {
    scope: Scope,
    resource: ResourceRef,
    lister: Arc<dyn ConfigLister>,
    updater: Arc<dyn ConfigUpdater>,
    list: ListView<ConfigEntry>,
    /// Key being edited and its input.
    editing: Option<(String, TextField)>,
    loading: bool,
    throbber_state: ThrobberState,
}

impl TopicConfigsPage {
    pub fn new(
        topic: String,
        lister: Arc<dyn ConfigLister>,
        updater: Arc<dyn ConfigUpdater>,
    ) -> Self {
        Self {
            scope: Scope::new(PAGE),
            resource: ResourceRef::Topic(topic),
            lister,
            updater,
            list: ListView::new(),
            editing: None,
            loading: false,
            throbber_state: ThrobberState::default(),
        }
    }

    pub fn list(&self) -> &ListView<ConfigEntry> {
        &self.list
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    fn refresh(&mut self) -> Vec<Command> {
        self.loading = true;
        vec![
            admin::list_configs(Arc::clone(&self.lister), self.resource.clone())
                .keyed(self.scope),
        ]
    }

    fn handle_edit_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => {
                self.editing = None;
                Vec::new()
            }
            KeyCode::Enter => {
                let Some((config_key, field)) = self.editing.take() else {
                    return Vec::new();
                };
                vec![
                    admin::update_config(
                        Arc::clone(&self.updater),
                        self.resource.clone(),
                        config_key,
                        field.value,
                    )
                    .keyed(self.scope),
                ]
            }
            _ => {
                if let Some((_, field)) = &mut self.editing {
                    field.edit(key);
                }
                Vec::new()
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        if self.editing.is_some() {
            return self.handle_edit_key(key);
        }
        if self.list.handle_key(key) {
            return Vec::new();
        }
        match key.code {
            KeyCode::Esc => emit(Action::LoadTopicsPage),
            KeyCode::F(5) => self.refresh(),
            KeyCode::Enter => {
                if let Some(entry) = self.list.selected_item() {
                    let field = TextField::new("New value").with_value(entry.value.clone());
                    self.editing = Some((entry.key.clone(), field));
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}

impl Page for TopicConfigsPage {
    fn init(&mut self) -> Vec<Command> {
        self.refresh()
    }

    fn update(&mut self, action: &Action) -> Vec<Command> {
        match action {
            Action::ConfigsListed { resource, configs } if *resource == self.resource => {
                self.list.set_items(
                    configs
                        .iter()
                        .map(|(key, value)| ConfigEntry::new(key, value))
                        .collect(),
                );
                self.loading = false;
                Vec::new()
            }
            Action::ConfigUpdated { resource, .. } if *resource == self.resource => {
                self.refresh()
            }
            Action::Error(envelope) if envelope.operation == Operation::ListConfigs => {
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
        if self.loading && self.list.items().is_empty() {
            render_loading(frame, area, "Loading configs", &self.throbber_state);
            return;
        }
        let title = format!("Configs of {}", self.resource.name());
        match &self.editing {
            Some((_, field)) => {
                let [list_area, edit_area] =
                    Layout::vertical([Constraint::Min(3), Constraint::Length(4)]).areas(area);
                self.list.render(frame, list_area, &title);
                field.render(frame, edit_area, true);
            }
            None => self.list.render(frame, area, &title),
        }
    }

    fn title(&self) -> String {
        format!("Topics / {} / Configs", self.resource.name())
    }

    fn shortcuts(&self) -> Vec<Shortcut> {
        if self.editing.is_some() {
            vec![Shortcut::new("⏎", "Save"), Shortcut::new("Esc", "Cancel")]
        } else {
            vec![
                Shortcut::new("⏎", "Edit"),
                Shortcut::new("F5", "Refresh"),
                Shortcut::new("/", "Filter"),
                Shortcut::new("Esc", "Back"),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use kestrel_core::SandboxCluster;
    use pretty_assertions::assert_eq;

    fn page() -> TopicConfigsPage {
        let cluster = Arc::new(SandboxCluster::new());
        let mut page = TopicConfigsPage::new("orders".into(), cluster.clone(), cluster);
        page.init();
        let configs: IndexMap<String, String> = [
            ("retention.ms".to_string(), "604800000".to_string()),
            ("cleanup.policy".to_string(), "delete".to_string()),
        ]
        .into_iter()
        .collect();
        page.update(&Action::ConfigsListed {
            resource: ResourceRef::Topic("orders".into()),
            configs,
        });
        page
    }

    fn press(page: &mut TopicConfigsPage, code: KeyCode) -> Vec<Command> {
        page.update(&Action::Key(KeyEvent::from(code)))
    }

    #[test]
    fn configs_are_listed_by_key() {
        let page = page();
        let keys: Vec<_> = page.list().displayed().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["cleanup.policy", "retention.ms"]);
    }

    #[test]
    fn configs_of_other_resources_are_ignored() {
        let mut page = page();
        page.update(&Action::ConfigsListed {
            resource: ResourceRef::Topic("users".into()),
            configs: IndexMap::new(),
        });
        assert_eq!(page.list().items().len(), 2);
    }

    #[test]
    fn enter_edits_and_submits_update() {
        let mut page = page();
        assert!(press(&mut page, KeyCode::Enter).is_empty());
        assert!(page.is_editing());
        for _ in 0.."delete".len() {
            press(&mut page, KeyCode::Backspace);
        }
        for c in "compact".chars() {
            press(&mut page, KeyCode::Char(c));
        }
        let commands = press(&mut page, KeyCode::Enter);
        assert!(!page.is_editing());
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].operation(), Some(Operation::UpdateConfig));
    }

    #[test]
    fn esc_cancels_edit_before_leaving() {
        let mut page = page();
        press(&mut page, KeyCode::Enter);
        assert!(press(&mut page, KeyCode::Esc).is_empty());
        assert!(!page.is_editing());
        let commands = press(&mut page, KeyCode::Esc);
        assert_eq!(commands.len(), 1);
        assert!(commands[0].operation().is_none());
    }
}

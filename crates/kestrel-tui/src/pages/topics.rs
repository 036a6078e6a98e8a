//! Topic list, the landing page of the topics tab.

use std::cmp::Ordering;
use std::sync::Arc;

use crossterm::event::KeyCode;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use throbber_widgets_tui::ThrobberState;

use kestrel_core::{ListedTopic, Operation, TopicDeleter, TopicLister};

use crate::action::{Action, Confirm};
use crate::command::{Command, Scope, admin};
use crate::page::{Page, Shortcut};
use crate::pages::{ctrl, emit, render_loading};
use crate::widgets::list_view::{ListItem, ListView};

const PAGE: &str = "topics";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumIter)]
pub enum TopicColumn {
    #[default]
    Name,
    Partitions,
    Replicas,
}

impl ListItem for ListedTopic {
    type Column = TopicColumn;

    fn primary_text(&self) -> &str {
        &self.name
    }

    fn compare(&self, other: &Self, column: TopicColumn) -> Ordering {
        match column {
            TopicColumn::Name => self.name.cmp(&other.name),
            TopicColumn::Partitions => self.partition_count.cmp(&other.partition_count),
            TopicColumn::Replicas => self.replicas.cmp(&other.replicas),
        }
    }

    fn cell(&self, column: TopicColumn) -> String {
        match column {
            TopicColumn::Name => self.name.clone(),
            TopicColumn::Partitions => self.partition_count.to_string(),
            TopicColumn::Replicas => self.replicas.to_string(),
        }
    }

    fn width(column: TopicColumn) -> Constraint {
        match column {
            TopicColumn::Name => Constraint::Fill(1),
            TopicColumn::Partitions | TopicColumn::Replicas => Constraint::Length(14),
        }
    }
}

pub struct TopicsPage {
    scope: Scope,
    lister: Arc<dyn TopicLister>,
    deleter: Arc<dyn TopicDeleter>,
    list: ListView<ListedTopic>,
    loading: bool,
    loaded: bool,
    throbber_state: ThrobberState,
}

impl TopicsPage {
    pub fn new(lister: Arc<dyn TopicLister>, deleter: Arc<dyn TopicDeleter>) -> Self {
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

    pub fn list(&self) -> &ListView<ListedTopic> {
        &self.list
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn refresh(&mut self) -> Vec<Command> {
        self.loading = true;
        vec![admin::list_topics(Arc::clone(&self.lister)).keyed(self.scope)]
    }

    fn handle_key(&mut self, key: &crossterm::event::KeyEvent) -> Vec<Command> {
        if !self.loaded {
            return Vec::new();
        }
        if self.list.handle_key(key) {
            return Vec::new();
        }
        if key.code == KeyCode::F(5) {
            return self.refresh();
        }
        if ctrl(key, 'n') {
            return emit(Action::LoadCreateTopicPage);
        }

        let Some(topic) = self.list.selected_item().cloned() else {
            return Vec::new();
        };
        if ctrl(key, 'd') {
            let delete = admin::delete_topic(Arc::clone(&self.deleter), topic.name.clone());
            return emit(Action::RequestConfirm(Confirm::new(
                format!("Delete topic {}?", topic.name),
                delete.keyed(self.scope),
            )));
        }
        if key.code == KeyCode::Enter || ctrl(key, 'o') {
            return emit(Action::LoadTopicConfigsPage { topic: topic.name });
        }
        if ctrl(key, 'p') {
            return emit(Action::LoadPublishPage { topic });
        }
        if ctrl(key, 'r') {
            return emit(Action::LoadRecordsPage {
                topic,
                partition: 0,
            });
        }
        Vec::new()
    }
}

impl Page for TopicsPage {
    fn init(&mut self) -> Vec<Command> {
        self.refresh()
    }

    fn update(&mut self, action: &Action) -> Vec<Command> {
        match action {
            Action::TopicsListed(topics) => {
                self.list.set_items(topics.clone());
                self.loading = false;
                self.loaded = true;
                Vec::new()
            }
            Action::TopicDeleted { .. } => self.refresh(),
            Action::Error(envelope) if envelope.operation == Operation::ListTopics => {
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
            render_loading(frame, area, "Loading topics", &self.throbber_state);
        } else {
            self.list.render(frame, area, "Topics");
        }
    }

    fn title(&self) -> String {
        "Topics".into()
    }

    fn shortcuts(&self) -> Vec<Shortcut> {
        vec![
            Shortcut::new("F5", "Refresh"),
            Shortcut::new("/", "Filter"),
            Shortcut::new("F3", "Sort"),
            Shortcut::new("^N", "Create"),
            Shortcut::new("^D", "Delete"),
            Shortcut::new("⏎", "Configs"),
            Shortcut::new("^P", "Publish"),
            Shortcut::new("^R", "Read"),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use kestrel_core::{ErrorKind, SandboxCluster};
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    fn page() -> TopicsPage {
        let cluster = Arc::new(SandboxCluster::new());
        TopicsPage::new(cluster.clone(), cluster)
    }

    fn loaded() -> TopicsPage {
        let mut page = page();
        page.init();
        page.update(&Action::TopicsListed(vec![
            ListedTopic::new("topic2", 2, 1),
            ListedTopic::new("topic3", 3, 1),
            ListedTopic::new("topic1", 1, 1),
        ]));
        page
    }

    fn names(page: &TopicsPage) -> Vec<String> {
        page.list().displayed().map(|t| t.name.clone()).collect()
    }

    fn press(page: &mut TopicsPage, code: KeyCode) -> Vec<Command> {
        page.update(&Action::Key(KeyEvent::from(code)))
    }

    fn screen(page: &TopicsPage) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();
        terminal.draw(|f| page.render(f, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn default_render_is_ascending_by_name() {
        let page = loaded();
        assert_eq!(names(&page), vec!["topic1", "topic2", "topic3"]);
        let screen = screen(&page);
        assert!(screen.contains("▲ Name"), "{screen}");
        let first = screen.find("topic1").unwrap();
        assert!(first < screen.find("topic2").unwrap());
        assert!(screen.find("topic2").unwrap() < screen.find("topic3").unwrap());
    }

    #[test]
    fn partitions_sort_starts_descending_then_toggles() {
        let mut page = loaded();
        press(&mut page, KeyCode::F(3));
        press(&mut page, KeyCode::Right);
        press(&mut page, KeyCode::Enter);
        assert_eq!(names(&page), vec!["topic3", "topic2", "topic1"]);
        assert!(screen(&page).contains("▼ Partitions"));

        press(&mut page, KeyCode::Enter);
        assert_eq!(names(&page), vec!["topic1", "topic2", "topic3"]);
        assert!(screen(&page).contains("▲ Partitions"));
    }

    #[test]
    fn typing_a_filter_narrows_rows_and_selects_first() {
        let mut page = loaded();
        press(&mut page, KeyCode::Down);
        press(&mut page, KeyCode::Char('/'));
        for c in "topic2".chars() {
            press(&mut page, KeyCode::Char(c));
        }
        assert_eq!(names(&page), vec!["topic2"]);
        assert_eq!(page.list().selected(), Some(0));
    }

    #[tokio::test]
    async fn failed_delete_leaves_rows_unchanged() {
        let cluster = Arc::new(SandboxCluster::new());
        let mut page = loaded();
        let before = names(&page);

        let action = admin::delete_topic(cluster, "does-not-exist".into()).run().await;
        let Action::Error(envelope) = &action else {
            panic!("expected an error, got {action:?}");
        };
        assert_eq!(envelope.operation, Operation::DeleteTopic);
        assert_eq!(envelope.cause.kind(), ErrorKind::NotFound);

        assert!(page.update(&action).is_empty());
        assert_eq!(names(&page), before);
    }

    #[test]
    fn list_error_clears_loading_only() {
        let mut page = loaded();
        press(&mut page, KeyCode::F(5));
        assert!(page.is_loading());
        page.update(&Action::error(
            Operation::ListTopics,
            kestrel_core::AdminError::network("broker down"),
        ));
        assert!(!page.is_loading());
        assert_eq!(names(&page).len(), 3);
    }

    #[test]
    fn keys_before_first_load_are_ignored() {
        let mut page = page();
        page.init();
        assert!(press(&mut page, KeyCode::F(5)).is_empty());
        assert!(screen(&page).contains("Loading topics"));
    }

    #[test]
    fn delete_asks_for_confirmation() {
        let mut page = loaded();
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        let commands = page.update(&Action::Key(ctrl_d));
        assert_eq!(commands.len(), 1);
        assert!(commands[0].operation().is_none());
    }
}

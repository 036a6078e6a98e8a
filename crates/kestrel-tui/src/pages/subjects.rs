//! Schema registry subjects.

use std::cmp::Ordering;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use throbber_widgets_tui::ThrobberState;

use kestrel_core::{ErrorKind, Operation, Subject, SubjectLister};

use crate::action::Action;
use crate::command::{Command, Scope, admin};
use crate::page::{Page, Shortcut};
use crate::pages::{emit, render_loading};
use crate::theme;
use crate::widgets::list_view::{ListItem, ListView};

const PAGE: &str = "subjects";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumIter)]
pub enum SubjectColumn {
    #[default]
    Name,
    Versions,
    Latest,
}

impl ListItem for Subject {
    type Column = SubjectColumn;

    fn primary_text(&self) -> &str {
        &self.name
    }

    fn compare(&self, other: &Self, column: SubjectColumn) -> Ordering {
        match column {
            SubjectColumn::Name => self.name.cmp(&other.name),
            SubjectColumn::Versions => self.versions.len().cmp(&other.versions.len()),
            SubjectColumn::Latest => self.latest_version().cmp(&other.latest_version()),
        }
    }

    fn cell(&self, column: SubjectColumn) -> String {
        match column {
            SubjectColumn::Name => self.name.clone(),
            SubjectColumn::Versions => self.versions.len().to_string(),
            SubjectColumn::Latest => self
                .latest_version()
                .map(|v| v.to_string())
                .unwrap_or_default(),
        }
    }

    fn width(column: SubjectColumn) -> Constraint {
        match column {
            SubjectColumn::Name => Constraint::Fill(1),
            SubjectColumn::Versions | SubjectColumn::Latest => Constraint::Length(12),
        }
    }
}

pub struct SubjectsPage {
    scope: Scope,
    lister: Arc<dyn SubjectLister>,
    list: ListView<Subject>,
    loading: bool,
    /// Set when the session has no registry to talk to.
    unavailable: Option<String>,
    throbber_state: ThrobberState,
}

impl SubjectsPage {
    pub fn new(lister: Arc<dyn SubjectLister>) -> Self {
        Self {
            scope: Scope::new(PAGE),
            lister,
            list: ListView::new(),
            loading: false,
            unavailable: None,
            throbber_state: ThrobberState::default(),
        }
    }

    pub fn list(&self) -> &ListView<Subject> {
        &self.list
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Mark the page as loading ahead of a registry handshake.
    pub fn set_loading(&mut self) {
        self.loading = true;
    }

    fn refresh(&mut self) -> Vec<Command> {
        self.loading = true;
        vec![admin::list_subjects(Arc::clone(&self.lister)).keyed(self.scope)]
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        if self.list.handle_key(key) {
            return Vec::new();
        }
        match key.code {
            KeyCode::F(5) => self.refresh(),
            KeyCode::Enter => match self.list.selected_item() {
                Some(subject) => emit(Action::LoadSchemaDetailsPage {
                    subject: subject.clone(),
                }),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}

impl Page for SubjectsPage {
    fn init(&mut self) -> Vec<Command> {
        self.refresh()
    }

    fn update(&mut self, action: &Action) -> Vec<Command> {
        match action {
            Action::SubjectsListed(subjects) => {
                self.list.set_items(subjects.clone());
                self.loading = false;
                self.unavailable = None;
                Vec::new()
            }
            Action::Error(envelope)
                if matches!(
                    envelope.operation,
                    Operation::ListSubjects | Operation::SetSchemaRegistryConnection
                ) =>
            {
                self.loading = false;
                if envelope.operation == Operation::SetSchemaRegistryConnection
                    || envelope.cause.kind() == ErrorKind::NotFound
                {
                    self.unavailable = Some(envelope.cause.to_string());
                }
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
            render_loading(frame, area, "Loading subjects", &self.throbber_state);
            return;
        }
        match &self.unavailable {
            Some(reason) => {
                let [list_area, note_area] =
                    Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
                self.list.render(frame, list_area, "Subjects");
                frame.render_widget(
                    Paragraph::new(Line::styled(format!(" {reason}"), theme::error_text())),
                    note_area,
                );
            }
            None => self.list.render(frame, area, "Subjects"),
        }
    }

    fn title(&self) -> String {
        "Subjects".into()
    }

    fn shortcuts(&self) -> Vec<Shortcut> {
        vec![
            Shortcut::new("F5", "Refresh"),
            Shortcut::new("/", "Filter"),
            Shortcut::new("F3", "Sort"),
            Shortcut::new("⏎", "Versions"),
        ]
    }
}

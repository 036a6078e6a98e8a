//! Topic creation form.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use kestrel_core::{ConfigEntry, Operation, TopicCreationDetails, TopicCreator};

use crate::action::Action;
use crate::command::{Command, Scope, admin};
use crate::page::{Page, Shortcut};
use crate::pages::emit;
use crate::theme;
use crate::widgets::text_field::{Form, TextField};

const PAGE: &str = "create-topic";

const NAME: usize = 0;
const PARTITIONS: usize = 1;
const REPLICATION: usize = 2;
const CONFIGS: usize = 3;

pub struct CreateTopicPage {
    scope: Scope,
    creator: Arc<dyn TopicCreator>,
    form: Form,
    error: Option<String>,
    submitting: bool,
}

impl CreateTopicPage {
    pub fn new(creator: Arc<dyn TopicCreator>) -> Self {
        Self {
            scope: Scope::new(PAGE),
            creator,
            form: Form::new(vec![
                TextField::new("Name"),
                TextField::new("Partitions").with_value("1"),
                TextField::new("Replication factor").with_value("1"),
                TextField::new("Configs (key=value, comma separated)"),
            ]),
            error: None,
            submitting: false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Parse the form. Errors are phrased for inline display.
    fn details(&self) -> Result<TopicCreationDetails, String> {
        let name = self.form.value(NAME).trim();
        if name.is_empty() {
            return Err("name is required".into());
        }
        let partition_count = self
            .form
            .value(PARTITIONS)
            .trim()
            .parse::<i32>()
            .map_err(|_| "partitions must be a whole number".to_string())?;
        let replication_factor = self
            .form
            .value(REPLICATION)
            .trim()
            .parse::<i16>()
            .map_err(|_| "replication factor must be a whole number".to_string())?;
        let configs = parse_configs(self.form.value(CONFIGS))?;

        Ok(TopicCreationDetails {
            name: name.to_string(),
            partition_count,
            replication_factor,
            configs,
        })
    }

    fn submit(&mut self) -> Vec<Command> {
        match self.details() {
            Ok(details) => {
                self.error = None;
                self.submitting = true;
                vec![
                    admin::create_topic(Arc::clone(&self.creator), details).keyed(self.scope),
                ]
            }
            Err(reason) => {
                self.error = Some(reason);
                Vec::new()
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => emit(Action::LoadTopicsPage),
            KeyCode::Enter => self.submit(),
            _ => {
                self.form.handle_key(key);
                Vec::new()
            }
        }
    }
}

fn parse_configs(raw: &str) -> Result<Vec<ConfigEntry>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok(ConfigEntry::new(key.trim(), value.trim()))
            }
            _ => Err(format!("config `{pair}` is not key=value")),
        })
        .collect()
}

impl Page for CreateTopicPage {
    fn update(&mut self, action: &Action) -> Vec<Command> {
        match action {
            Action::TopicCreated { .. } => {
                self.submitting = false;
                emit(Action::LoadTopicsPage)
            }
            Action::Error(envelope) if envelope.operation == Operation::CreateTopic => {
                self.submitting = false;
                self.error = Some(envelope.cause.to_string());
                Vec::new()
            }
            Action::Key(key) => self.handle_key(key),
            _ => Vec::new(),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Create topic ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [form_area, message_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
        self.form.render(frame, form_area);

        let message = if self.submitting {
            Span::styled(" Creating…", theme::key_hint())
        } else if let Some(error) = &self.error {
            Span::styled(format!(" {error}"), theme::error_text())
        } else {
            Span::raw("")
        };
        frame.render_widget(Paragraph::new(message), message_area);
    }

    fn title(&self) -> String {
        "Topics / Create".into()
    }

    fn shortcuts(&self) -> Vec<Shortcut> {
        vec![
            Shortcut::new("Tab", "Next field"),
            Shortcut::new("⏎", "Create"),
            Shortcut::new("Esc", "Back"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_core::{AdminError, SandboxCluster};
    use pretty_assertions::assert_eq;

    fn type_text(page: &mut CreateTopicPage, text: &str) {
        for c in text.chars() {
            page.update(&Action::Key(KeyEvent::from(KeyCode::Char(c))));
        }
    }

    fn press(page: &mut CreateTopicPage, code: KeyCode) -> Vec<Command> {
        page.update(&Action::Key(KeyEvent::from(code)))
    }

    #[test]
    fn configs_parse_as_pairs() {
        assert_eq!(
            parse_configs("retention.ms=1000, cleanup.policy = compact").unwrap_or_default(),
            vec![
                ConfigEntry::new("retention.ms", "1000"),
                ConfigEntry::new("cleanup.policy", "compact"),
            ]
        );
        assert!(parse_configs("").is_ok_and(|c| c.is_empty()));
        assert!(parse_configs("oops").is_err());
    }

    #[test]
    fn empty_name_is_rejected_locally() {
        let mut page = CreateTopicPage::new(Arc::new(SandboxCluster::new()));
        assert!(press(&mut page, KeyCode::Enter).is_empty());
        assert_eq!(page.error(), Some("name is required"));
    }

    #[test]
    fn valid_form_submits_one_keyed_command() {
        let mut page = CreateTopicPage::new(Arc::new(SandboxCluster::new()));
        type_text(&mut page, "events");
        let commands = press(&mut page, KeyCode::Enter);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].operation(), Some(Operation::CreateTopic));
        assert!(commands[0].key().is_some());
    }

    #[test]
    fn remote_failure_is_shown_inline() {
        let mut page = CreateTopicPage::new(Arc::new(SandboxCluster::new()));
        page.update(&Action::error(
            Operation::CreateTopic,
            AdminError::conflict("topic events exists"),
        ));
        assert_eq!(page.error(), Some("Conflict: topic events exists"));
    }
}

//! Publish a single record to a topic.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use kestrel_core::{ListedTopic, Operation, ProducerRecord, PublishResult, Publisher};

use crate::action::Action;
use crate::command::{Command, Scope, admin};
use crate::page::{Page, Shortcut};
use crate::pages::emit;
use crate::theme;
use crate::widgets::text_field::{Form, TextField};

const PAGE: &str = "publish";

const KEY: usize = 0;
const PARTITION: usize = 1;
const VALUE: usize = 2;

enum Status {
    Idle,
    Sending,
    Delivered(PublishResult),
    Failed(String),
}

pub struct PublishPage {
    scope: Scope,
    topic: ListedTopic,
    publisher: Arc<dyn Publisher>,
    form: Form,
    status: Status,
}

impl PublishPage {
    pub fn new(topic: ListedTopic, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            scope: Scope::new(PAGE),
            topic,
            publisher,
            form: Form::new(vec![
                TextField::new("Key (optional)"),
                TextField::new("Partition (blank for any)"),
                TextField::new("Value"),
            ]),
            status: Status::Idle,
        }
    }

    pub fn status_text(&self) -> String {
        match &self.status {
            Status::Idle => String::new(),
            Status::Sending => "Publishing…".into(),
            Status::Delivered(result) => format!(
                "Delivered to partition {} at offset {}",
                result.partition, result.offset
            ),
            Status::Failed(reason) => reason.clone(),
        }
    }

    fn record(&self) -> Result<ProducerRecord, String> {
        let partition = match self.form.value(PARTITION).trim() {
            "" => None,
            raw => Some(
                raw.parse::<i32>()
                    .map_err(|_| "partition must be a whole number".to_string())?,
            ),
        };
        let key = Some(self.form.value(KEY))
            .filter(|k| !k.is_empty())
            .map(str::to_owned);

        Ok(ProducerRecord {
            topic: self.topic.name.clone(),
            key,
            value: self.form.value(VALUE).to_owned(),
            partition,
        })
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => emit(Action::LoadTopicsPage),
            KeyCode::Enter => match self.record() {
                Ok(record) => {
                    self.status = Status::Sending;
                    vec![
                        admin::publish(Arc::clone(&self.publisher), record).keyed(self.scope),
                    ]
                }
                Err(reason) => {
                    self.status = Status::Failed(reason);
                    Vec::new()
                }
            },
            _ => {
                self.form.handle_key(key);
                Vec::new()
            }
        }
    }
}

impl Page for PublishPage {
    fn update(&mut self, action: &Action) -> Vec<Command> {
        match action {
            Action::Published { topic, result } if *topic == self.topic.name => {
                self.status = Status::Delivered(*result);
                self.form.clear(VALUE);
                Vec::new()
            }
            Action::Error(envelope) if envelope.operation == Operation::Publish => {
                self.status = Status::Failed(envelope.cause.to_string());
                Vec::new()
            }
            Action::Key(key) => self.handle_key(key),
            _ => Vec::new(),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(
                " Publish to {} ({} partitions) ",
                self.topic.name, self.topic.partition_count
            ))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [form_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
        self.form.render(frame, form_area);

        let style = match self.status {
            Status::Failed(_) => theme::error_text(),
            _ => theme::key_hint(),
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {}", self.status_text()), style)),
            status_area,
        );
    }

    fn title(&self) -> String {
        format!("Topics / {} / Publish", self.topic.name)
    }

    fn shortcuts(&self) -> Vec<Shortcut> {
        vec![
            Shortcut::new("Tab", "Next field"),
            Shortcut::new("⏎", "Publish"),
            Shortcut::new("Esc", "Back"),
        ]
    }
}

//! Records of one topic partition, streamed in as they are read.

use std::cmp::Ordering;
use std::sync::Arc;

use bytesize::ByteSize;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::widgets::{Block, BorderType, Borders};
use throbber_widgets_tui::ThrobberState;
use uuid::Uuid;

use kestrel_core::{ConsumerRecord, ListedTopic, Operation, ReadDetails, RecordReader};

use crate::action::Action;
use crate::command::{Command, Scope, admin};
use crate::page::{Page, Shortcut};
use crate::pages::{emit, pretty_json, render_loading};
use crate::theme;
use crate::widgets::list_view::{ListItem, ListView};
use crate::widgets::viewport::Viewport;

pub const PAGE: &str = "records";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumIter)]
pub enum RecordColumn {
    #[default]
    Offset,
    Key,
    Value,
    Size,
    Timestamp,
}

fn size_of(record: &ConsumerRecord) -> u64 {
    u64::try_from(record.value.len()).unwrap_or(u64::MAX)
}

impl ListItem for ConsumerRecord {
    type Column = RecordColumn;

    fn primary_text(&self) -> &str {
        &self.value
    }

    fn compare(&self, other: &Self, column: RecordColumn) -> Ordering {
        match column {
            RecordColumn::Offset => self.offset.cmp(&other.offset),
            RecordColumn::Key => self.key.cmp(&other.key),
            RecordColumn::Value => self.value.cmp(&other.value),
            RecordColumn::Size => size_of(self).cmp(&size_of(other)),
            RecordColumn::Timestamp => self.timestamp.cmp(&other.timestamp),
        }
    }

    fn cell(&self, column: RecordColumn) -> String {
        match column {
            RecordColumn::Offset => self.offset.to_string(),
            RecordColumn::Key => self.key.clone().unwrap_or_default(),
            RecordColumn::Value => self.value.clone(),
            RecordColumn::Size => ByteSize(size_of(self)).to_string(),
            RecordColumn::Timestamp => self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    fn width(column: RecordColumn) -> Constraint {
        match column {
            RecordColumn::Offset | RecordColumn::Size => Constraint::Length(10),
            RecordColumn::Key => Constraint::Length(16),
            RecordColumn::Value => Constraint::Fill(1),
            RecordColumn::Timestamp => Constraint::Length(20),
        }
    }
}

pub struct RecordsPage {
    scope: Scope,
    topic: ListedTopic,
    partition: i32,
    read_id: Uuid,
    limit: usize,
    reader: Arc<dyn RecordReader>,
    list: ListView<ConsumerRecord>,
    detail: Option<Viewport>,
    reading: bool,
    throbber_state: ThrobberState,
}

impl RecordsPage {
    pub fn new(
        topic: ListedTopic,
        partition: i32,
        read_id: Uuid,
        limit: usize,
        reader: Arc<dyn RecordReader>,
    ) -> Self {
        Self {
            scope: Scope::of(PAGE, read_id),
            topic,
            partition,
            read_id,
            limit,
            reader,
            list: ListView::new(),
            detail: None,
            reading: false,
            throbber_state: ThrobberState::default(),
        }
    }

    pub fn list(&self) -> &ListView<ConsumerRecord> {
        &self.list
    }

    pub fn is_reading(&self) -> bool {
        self.reading
    }

    fn switch_partition(&self, delta: i32) -> Vec<Command> {
        let partition = self.partition + delta;
        if partition < 0 || partition >= self.topic.partition_count {
            return Vec::new();
        }
        emit(Action::LoadRecordsPage {
            topic: self.topic.clone(),
            partition,
        })
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        if let Some(detail) = &mut self.detail {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.detail = None,
                KeyCode::Up => detail.scroll_up(1),
                KeyCode::Down => detail.scroll_down(1),
                KeyCode::PageUp => detail.scroll_up(10),
                KeyCode::PageDown => detail.scroll_down(10),
                _ => {}
            }
            return Vec::new();
        }
        if self.list.handle_key(key) {
            return Vec::new();
        }
        match key.code {
            KeyCode::Esc => emit(Action::LoadTopicsPage),
            KeyCode::Left => self.switch_partition(-1),
            KeyCode::Right => self.switch_partition(1),
            KeyCode::Enter => {
                if let Some(record) = self.list.selected_item() {
                    self.detail = Some(Viewport::new(&pretty_json(&record.value)));
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}

impl Page for RecordsPage {
    fn init(&mut self) -> Vec<Command> {
        self.reading = true;
        let details = ReadDetails {
            topic: self.topic.name.clone(),
            partition: self.partition,
            start_offset: 0,
            limit: self.limit,
        };
        vec![
            admin::read_records(Arc::clone(&self.reader), details, self.read_id)
                .keyed(self.scope),
        ]
    }

    fn update(&mut self, action: &Action) -> Vec<Command> {
        match action {
            Action::RecordReceived {
                read_id, record, ..
            } if *read_id == self.read_id => {
                self.list.push(record.clone());
                Vec::new()
            }
            Action::RecordsReadFinished { read_id } if *read_id == self.read_id => {
                self.reading = false;
                Vec::new()
            }
            Action::Error(envelope) if envelope.operation == Operation::ReadRecords => {
                self.reading = false;
                Vec::new()
            }
            Action::Key(key) => self.handle_key(key),
            _ => Vec::new(),
        }
    }

    fn on_tick(&mut self) {
        if self.reading {
            self.throbber_state.calc_next();
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        if let Some(detail) = &self.detail {
            let block = Block::default()
                .title(" Record ")
                .title_style(theme::title_style())
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border_focused());
            let inner = block.inner(area);
            frame.render_widget(block, area);
            detail.render(frame, inner);
            return;
        }
        if self.reading && self.list.items().is_empty() {
            render_loading(frame, area, "Reading records", &self.throbber_state);
            return;
        }
        let title = format!(
            "{} partition {}/{}",
            self.topic.name,
            self.partition,
            self.topic.partition_count.saturating_sub(1)
        );
        self.list.render(frame, area, &title);
    }

    fn title(&self) -> String {
        format!("Topics / {} / Partition {}", self.topic.name, self.partition)
    }

    fn shortcuts(&self) -> Vec<Shortcut> {
        vec![
            Shortcut::new("←/→", "Partition"),
            Shortcut::new("⏎", "Inspect"),
            Shortcut::new("/", "Filter"),
            Shortcut::new("Esc", "Back"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use kestrel_core::SandboxCluster;
    use pretty_assertions::assert_eq;

    fn record(offset: i64, value: &str) -> ConsumerRecord {
        ConsumerRecord {
            partition: 0,
            offset,
            key: None,
            value: value.into(),
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default(),
        }
    }

    fn page(read_id: Uuid) -> RecordsPage {
        RecordsPage::new(
            ListedTopic::new("orders", 3, 1),
            1,
            read_id,
            10,
            Arc::new(SandboxCluster::new()),
        )
    }

    fn press(page: &mut RecordsPage, code: KeyCode) -> Vec<Command> {
        page.update(&Action::Key(KeyEvent::from(code)))
    }

    #[test]
    fn records_of_another_read_are_ignored() {
        let read_id = Uuid::new_v4();
        let mut page = page(read_id);
        page.init();
        page.update(&Action::RecordReceived {
            read_id: Uuid::new_v4(),
            record: record(0, "stale"),
            next: None,
        });
        page.update(&Action::RecordReceived {
            read_id,
            record: record(0, "fresh"),
            next: None,
        });
        let values: Vec<_> = page.list().items().iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["fresh"]);

        page.update(&Action::RecordsReadFinished { read_id });
        assert!(!page.is_reading());
    }

    #[test]
    fn partition_paging_stays_in_range() {
        let mut page = page(Uuid::new_v4());
        assert_eq!(press(&mut page, KeyCode::Left).len(), 1);
        assert_eq!(press(&mut page, KeyCode::Right).len(), 1);

        let mut last = RecordsPage::new(
            ListedTopic::new("orders", 3, 1),
            2,
            Uuid::new_v4(),
            10,
            Arc::new(SandboxCluster::new()),
        );
        assert!(press(&mut last, KeyCode::Right).is_empty());
    }

    #[test]
    fn enter_opens_pretty_detail() {
        let read_id = Uuid::new_v4();
        let mut page = page(read_id);
        page.update(&Action::RecordReceived {
            read_id,
            record: record(4, r#"{"id":4}"#),
            next: None,
        });
        press(&mut page, KeyCode::Enter);
        let detail = page.detail.as_ref().map(|d| d.visible(3).to_vec());
        assert_eq!(
            detail,
            Some(vec!["{".to_string(), "  \"id\": 4".to_string(), "}".to_string()])
        );
        assert!(press(&mut page, KeyCode::Esc).is_empty());
        assert!(page.detail.is_none());
    }
}

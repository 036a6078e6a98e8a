//! Members and committed offsets of one consumer group.

use std::cmp::Ordering;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use throbber_widgets_tui::ThrobberState;

use kestrel_core::{ConsumerGroup, GroupMember, OffsetLister, Operation, TopicPartitionOffset};

use crate::action::Action;
use crate::command::{Command, Scope, admin};
use crate::page::{Page, Shortcut};
use crate::pages::{emit, render_loading};
use crate::widgets::list_view::{ListItem, ListView};

const PAGE: &str = "cgroup-topics";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumIter)]
pub enum MemberColumn {
    #[default]
    #[strum(to_string = "Member ID")]
    MemberId,
    #[strum(to_string = "Client ID")]
    ClientId,
    #[strum(to_string = "Host")]
    ClientHost,
}

impl ListItem for GroupMember {
    type Column = MemberColumn;

    fn primary_text(&self) -> &str {
        &self.member_id
    }

    fn compare(&self, other: &Self, column: MemberColumn) -> Ordering {
        match column {
            MemberColumn::MemberId => self.member_id.cmp(&other.member_id),
            MemberColumn::ClientId => self.client_id.cmp(&other.client_id),
            MemberColumn::ClientHost => self.client_host.cmp(&other.client_host),
        }
    }

    fn cell(&self, column: MemberColumn) -> String {
        match column {
            MemberColumn::MemberId => self.member_id.clone(),
            MemberColumn::ClientId => self.client_id.clone(),
            MemberColumn::ClientHost => self.client_host.clone(),
        }
    }

    fn width(column: MemberColumn) -> Constraint {
        match column {
            MemberColumn::MemberId => Constraint::Fill(2),
            MemberColumn::ClientId | MemberColumn::ClientHost => Constraint::Fill(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumIter)]
pub enum OffsetColumn {
    #[default]
    Topic,
    Partition,
    Offset,
}

impl ListItem for TopicPartitionOffset {
    type Column = OffsetColumn;

    fn primary_text(&self) -> &str {
        &self.topic
    }

    fn compare(&self, other: &Self, column: OffsetColumn) -> Ordering {
        match column {
            OffsetColumn::Topic => self
                .topic
                .cmp(&other.topic)
                .then(self.partition.cmp(&other.partition)),
            OffsetColumn::Partition => self.partition.cmp(&other.partition),
            OffsetColumn::Offset => self.offset.cmp(&other.offset),
        }
    }

    fn cell(&self, column: OffsetColumn) -> String {
        match column {
            OffsetColumn::Topic => self.topic.clone(),
            OffsetColumn::Partition => self.partition.to_string(),
            OffsetColumn::Offset => self.offset.to_string(),
        }
    }

    fn width(column: OffsetColumn) -> Constraint {
        match column {
            OffsetColumn::Topic => Constraint::Fill(1),
            OffsetColumn::Partition | OffsetColumn::Offset => Constraint::Length(12),
        }
    }
}

/// Which of the two lists receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    Members,
    #[default]
    Offsets,
}

pub struct CGroupTopicsPage {
    scope: Scope,
    group: String,
    lister: Arc<dyn OffsetLister>,
    members: ListView<GroupMember>,
    list: ListView<TopicPartitionOffset>,
    focus: Focus,
    loading: bool,
    throbber_state: ThrobberState,
}

impl CGroupTopicsPage {
    pub fn new(group: ConsumerGroup, lister: Arc<dyn OffsetLister>) -> Self {
        let mut members = ListView::new();
        members.set_items(group.members);
        Self {
            scope: Scope::new(PAGE),
            group: group.name,
            lister,
            members,
            list: ListView::new(),
            focus: Focus::default(),
            loading: false,
            throbber_state: ThrobberState::default(),
        }
    }

    pub fn list(&self) -> &ListView<TopicPartitionOffset> {
        &self.list
    }

    pub fn members(&self) -> &ListView<GroupMember> {
        &self.members
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    fn refresh(&mut self) -> Vec<Command> {
        self.loading = true;
        vec![admin::list_offsets(Arc::clone(&self.lister), self.group.clone()).keyed(self.scope)]
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        let consumed = match self.focus {
            Focus::Members => self.members.handle_key(key),
            Focus::Offsets => self.list.handle_key(key),
        };
        if consumed {
            return Vec::new();
        }
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Members => Focus::Offsets,
                    Focus::Offsets => Focus::Members,
                };
                Vec::new()
            }
            KeyCode::Esc => emit(Action::LoadCGroupsPage),
            KeyCode::F(5) => self.refresh(),
            _ => Vec::new(),
        }
    }
}

impl Page for CGroupTopicsPage {
    fn init(&mut self) -> Vec<Command> {
        self.refresh()
    }

    fn update(&mut self, action: &Action) -> Vec<Command> {
        match action {
            Action::OffsetsListed { group, offsets } if *group == self.group => {
                self.list.set_items(offsets.clone());
                self.loading = false;
                Vec::new()
            }
            Action::Error(envelope) if envelope.operation == Operation::ListOffsets => {
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
        // Borders, header row, and the filter line when one is shown.
        let chrome = if self.members.filter().is_empty() && !self.members.is_filtering() {
            3
        } else {
            4
        };
        let members_height = u16::try_from(self.members.items().len().max(1))
            .unwrap_or(u16::MAX)
            .saturating_add(chrome)
            .min(10);
        let [members_area, offsets_area] =
            Layout::vertical([Constraint::Length(members_height), Constraint::Min(3)]).areas(area);

        self.members.render_focused(
            frame,
            members_area,
            "Members",
            self.focus == Focus::Members,
        );
        if self.loading && self.list.items().is_empty() {
            render_loading(frame, offsets_area, "Loading offsets", &self.throbber_state);
        } else {
            self.list.render_focused(
                frame,
                offsets_area,
                "Committed offsets",
                self.focus == Focus::Offsets,
            );
        }
    }

    fn title(&self) -> String {
        format!("Consumer Groups / {}", self.group)
    }

    fn shortcuts(&self) -> Vec<Shortcut> {
        vec![
            Shortcut::new("F5", "Refresh"),
            Shortcut::new("Tab", "Members/Offsets"),
            Shortcut::new("/", "Filter"),
            Shortcut::new("Esc", "Back"),
        ]
    }
}

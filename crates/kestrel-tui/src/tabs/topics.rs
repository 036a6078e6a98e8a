//! Topics tab: topic list plus create, configs, publish and records pages.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use kestrel_core::Admin;

use crate::action::Action;
use crate::command::{Command, Scope};
use crate::page::Page;
use crate::pages::{
    CreateTopicPage, PublishPage, RecordsPage, TopicConfigsPage, TopicsPage, records,
};
use crate::tabs::{Tab, TabId};

pub struct TopicsTab {
    admin: Arc<dyn Admin>,
    read_limit: usize,
    /// Cached across visits so sort and filter survive.
    topics: TopicsPage,
    /// Active page when it is not the topic list.
    detail: Option<Box<dyn Page>>,
    /// The only record read whose continuations are still scheduled.
    current_read: Option<Uuid>,
}

impl TopicsTab {
    pub fn new(admin: Arc<dyn Admin>, read_limit: usize) -> Self {
        let topics = TopicsPage::new(admin.clone(), admin.clone());
        Self {
            admin,
            read_limit,
            topics,
            detail: None,
            current_read: None,
        }
    }

    pub fn topics_page(&self) -> &TopicsPage {
        &self.topics
    }

    /// Make `page` active and return its init commands.
    fn open(&mut self, mut page: Box<dyn Page>) -> Vec<Command> {
        let commands = page.init();
        self.detail = Some(page);
        commands
    }

    fn load(&mut self, action: Action) -> Vec<Command> {
        self.current_read = None;
        match action {
            Action::LoadTopicsPage => {
                self.detail = None;
                self.topics.init()
            }
            Action::LoadCreateTopicPage => {
                self.open(Box::new(CreateTopicPage::new(self.admin.clone())))
            }
            Action::LoadTopicConfigsPage { topic } => self.open(Box::new(TopicConfigsPage::new(
                topic,
                self.admin.clone(),
                self.admin.clone(),
            ))),
            Action::LoadPublishPage { topic } => {
                self.open(Box::new(PublishPage::new(topic, self.admin.clone())))
            }
            Action::LoadRecordsPage { topic, partition } => {
                let read_id = Uuid::new_v4();
                self.current_read = Some(read_id);
                self.open(Box::new(RecordsPage::new(
                    topic,
                    partition,
                    read_id,
                    self.read_limit,
                    self.admin.clone(),
                )))
            }
            _ => Vec::new(),
        }
    }

    fn is_current(&self, read_id: Uuid) -> bool {
        self.current_read == Some(read_id)
    }

    /// Schedule the next pull of the current read.
    fn continue_read(read_id: Uuid, next: Option<Command>) -> Vec<Command> {
        next.map(|next| next.keyed(Scope::of(records::PAGE, read_id)))
            .into_iter()
            .collect()
    }

    /// Results owned by the topic list reach it even while a detail page
    /// is active; errors go to both.
    fn forward(&mut self, action: &Action) -> Vec<Command> {
        let Some(detail) = &mut self.detail else {
            return self.topics.update(action);
        };
        match action {
            Action::TopicsListed(_) | Action::TopicDeleted { .. } => self.topics.update(action),
            Action::Error(_) => {
                let mut commands = self.topics.update(action);
                commands.extend(detail.update(action));
                commands
            }
            _ => detail.update(action),
        }
    }
}

impl Tab for TopicsTab {
    fn id(&self) -> TabId {
        TabId::Topics
    }

    fn init(&mut self) -> Vec<Command> {
        self.topics.init()
    }

    fn update(&mut self, action: Action) -> Vec<Command> {
        match action {
            Action::LoadTopicsPage
            | Action::LoadCreateTopicPage
            | Action::LoadTopicConfigsPage { .. }
            | Action::LoadPublishPage { .. }
            | Action::LoadRecordsPage { .. } => self.load(action),

            // Everything from a superseded read stops here; dropping its
            // continuation drops the stream.
            Action::RecordsReadStarted { read_id, .. }
            | Action::RecordReceived { read_id, .. }
            | Action::RecordsReadFinished { read_id }
                if !self.is_current(read_id) =>
            {
                debug!(%read_id, "dropping result of a superseded read");
                Vec::new()
            }

            Action::RecordsReadStarted { read_id, next } => Self::continue_read(read_id, next),
            Action::RecordReceived {
                read_id,
                record,
                next,
            } => {
                let mut commands = Self::continue_read(read_id, next);
                commands.extend(self.forward(&Action::RecordReceived {
                    read_id,
                    record,
                    next: None,
                }));
                commands
            }
            Action::RecordsReadFinished { read_id } => {
                self.current_read = None;
                self.forward(&Action::RecordsReadFinished { read_id })
            }

            other => self.forward(&other),
        }
    }

    fn active_page(&self) -> &dyn Page {
        match &self.detail {
            Some(page) => page.as_ref(),
            None => &self.topics,
        }
    }

    fn active_page_mut(&mut self) -> &mut dyn Page {
        match &mut self.detail {
            Some(page) => page.as_mut(),
            None => &mut self.topics,
        }
    }
}

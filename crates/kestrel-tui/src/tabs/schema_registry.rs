//! Schema registry tab: subjects and per-subject versions.

use std::sync::Arc;

use kestrel_core::{Admin, SchemaRegistryDetails};

use crate::action::Action;
use crate::command::{Command, admin};
use crate::page::Page;
use crate::pages::{SchemaDetailsPage, SubjectsPage};
use crate::tabs::{Tab, TabId};

pub struct SchemaRegistryTab {
    admin: Arc<dyn Admin>,
    registry: Option<SchemaRegistryDetails>,
    subjects: SubjectsPage,
    detail: Option<Box<dyn Page>>,
}

impl SchemaRegistryTab {
    pub fn new(admin: Arc<dyn Admin>, registry: Option<SchemaRegistryDetails>) -> Self {
        let subjects = SubjectsPage::new(admin.clone());
        Self {
            admin,
            registry,
            subjects,
            detail: None,
        }
    }

    fn forward(&mut self, action: &Action) -> Vec<Command> {
        let Some(detail) = &mut self.detail else {
            return self.subjects.update(action);
        };
        match action {
            Action::SubjectsListed(_) => self.subjects.update(action),
            Action::Error(_) => {
                let mut commands = self.subjects.update(action);
                commands.extend(detail.update(action));
                commands
            }
            _ => detail.update(action),
        }
    }
}

impl Tab for SchemaRegistryTab {
    fn id(&self) -> TabId {
        TabId::SchemaRegistry
    }

    /// Connect to the configured registry first, if any; subjects are
    /// listed once the connection is set.
    fn init(&mut self) -> Vec<Command> {
        match self.registry.clone() {
            Some(details) => {
                self.subjects.set_loading();
                let scope = self.subjects.scope();
                vec![admin::set_schema_registry(self.admin.clone(), details).keyed(scope)]
            }
            None => self.subjects.init(),
        }
    }

    fn update(&mut self, action: Action) -> Vec<Command> {
        match action {
            Action::SchemaRegistryConnected => self.subjects.init(),
            Action::LoadSubjectsPage => {
                self.detail = None;
                self.subjects.init()
            }
            Action::LoadSchemaDetailsPage { subject } => {
                let mut page = SchemaDetailsPage::new(subject, self.admin.clone());
                let commands = page.init();
                self.detail = Some(Box::new(page));
                commands
            }
            other => self.forward(&other),
        }
    }

    fn active_page(&self) -> &dyn Page {
        match &self.detail {
            Some(page) => page.as_ref(),
            None => &self.subjects,
        }
    }

    fn active_page_mut(&mut self) -> &mut dyn Page {
        match &mut self.detail {
            Some(page) => page.as_mut(),
            None => &mut self.subjects,
        }
    }
}

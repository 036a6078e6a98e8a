//! Consumer groups tab: group list and per-group offsets.

use std::sync::Arc;

use kestrel_core::Admin;

use crate::action::Action;
use crate::command::Command;
use crate::page::Page;
use crate::pages::{CGroupTopicsPage, CGroupsPage};
use crate::tabs::{Tab, TabId};

pub struct CGroupsTab {
    admin: Arc<dyn Admin>,
    groups: CGroupsPage,
    detail: Option<Box<dyn Page>>,
}

impl CGroupsTab {
    pub fn new(admin: Arc<dyn Admin>) -> Self {
        let groups = CGroupsPage::new(admin.clone(), admin.clone());
        Self {
            admin,
            groups,
            detail: None,
        }
    }

    pub fn groups_page(&self) -> &CGroupsPage {
        &self.groups
    }

    fn forward(&mut self, action: &Action) -> Vec<Command> {
        let Some(detail) = &mut self.detail else {
            return self.groups.update(action);
        };
        match action {
            Action::ConsumerGroupListingStarted(_)
            | Action::ConsumerGroupsListed(_)
            | Action::ConsumerGroupDeleted { .. } => self.groups.update(action),
            Action::Error(_) => {
                let mut commands = self.groups.update(action);
                commands.extend(detail.update(action));
                commands
            }
            _ => detail.update(action),
        }
    }
}

impl Tab for CGroupsTab {
    fn id(&self) -> TabId {
        TabId::ConsumerGroups
    }

    fn init(&mut self) -> Vec<Command> {
        self.groups.init()
    }

    fn update(&mut self, action: Action) -> Vec<Command> {
        match action {
            Action::LoadCGroupsPage => {
                self.detail = None;
                self.groups.init()
            }
            Action::LoadCGroupTopicsPage { group } => {
                let mut page = CGroupTopicsPage::new(group, self.admin.clone());
                let commands = page.init();
                self.detail = Some(Box::new(page));
                commands
            }
            // The listing only finishes once its completion is scheduled.
            Action::ConsumerGroupListingStarted(mut started) => {
                let mut commands: Vec<Command> = started
                    .completion
                    .take()
                    .map(|completion| completion.keyed(self.groups.scope()))
                    .into_iter()
                    .collect();
                commands.extend(self.forward(&Action::ConsumerGroupListingStarted(started)));
                commands
            }
            other => self.forward(&other),
        }
    }

    fn active_page(&self) -> &dyn Page {
        match &self.detail {
            Some(page) => page.as_ref(),
            None => &self.groups,
        }
    }

    fn active_page_mut(&mut self) -> &mut dyn Page {
        match &mut self.detail {
            Some(page) => page.as_mut(),
            None => &mut self.groups,
        }
    }
}

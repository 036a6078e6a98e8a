//! Application root: event loop, tab management, command dispatch.
//!
//! Everything that mutates UI state runs here, on one task, one action at a
//! time. Terminal events and command completions are the only inputs.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use kestrel_core::{
    Admin, ConnectionDetails, ErrorEnvelope, Instantiator, Operation, SchemaRegistryDetails,
};

use crate::action::{Action, Confirm, Notification, NotificationLevel};
use crate::command::{Command, Completion, Dispatcher};
use crate::event::{Event, EventReader};
use crate::tabs::{CGroupsTab, SchemaRegistryTab, Tab, TabId, TopicsTab};
use crate::theme;
use crate::tui::Tui;
use crate::widgets::{statusbar, sub_tabs};

/// How long a toast stays on screen.
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Everything needed to (re)build an admin session.
pub struct Session {
    pub instantiator: Instantiator,
    pub details: ConnectionDetails,
    pub registry: Option<SchemaRegistryDetails>,
    /// Records fetched per read.
    pub read_limit: usize,
    pub tick_rate: Duration,
}

pub struct App {
    session: Session,
    /// One per [`TabId`], in tab-bar order.
    tabs: Vec<Box<dyn Tab>>,
    active_tab: TabId,
    dispatcher: Dispatcher,
    completions: mpsc::UnboundedReceiver<Completion>,
    running: bool,
    pending_confirm: Option<Confirm>,
    notification: Option<(Notification, Instant)>,
}

impl App {
    /// Connect and build all tabs. Nothing is dispatched until [`App::start`].
    pub fn new(session: Session) -> Result<Self, ErrorEnvelope> {
        let admin = (session.instantiator)(&session.details)
            .map_err(|cause| ErrorEnvelope::new(Operation::Connect, cause))?;
        let tabs = build_tabs(&admin, &session);
        let (dispatcher, completions) = Dispatcher::new();

        Ok(Self {
            session,
            tabs,
            active_tab: TabId::default(),
            dispatcher,
            completions,
            running: true,
            pending_confirm: None,
            notification: None,
        })
    }

    /// Dispatch every tab's landing-page commands.
    pub fn start(&mut self) {
        let commands: Vec<Command> = self.tabs.iter_mut().flat_map(|tab| tab.init()).collect();
        self.dispatcher.dispatch_all(commands);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn active_tab(&self) -> TabId {
        self.active_tab
    }

    pub fn tab(&self, id: TabId) -> &dyn Tab {
        self.tabs[id.index()].as_ref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref().map(|(n, _)| n)
    }

    pub fn confirm_prompt(&self) -> Option<&str> {
        self.pending_confirm.as_ref().map(|c| c.prompt.as_str())
    }

    /// Run until quit. Owns the terminal for the duration.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.start();

        let mut events = EventReader::new(self.session.tick_rate, Duration::from_millis(33));
        info!(cluster = self.session.details.primary_server(), "event loop started");

        while self.running {
            tokio::select! {
                event = events.next() => {
                    let Some(event) = event else { break };
                    match event {
                        Event::Key(key) => self.handle_action(Action::Key(key)),
                        Event::Resize(w, h) => self.handle_action(Action::Resize(w, h)),
                        Event::Tick => self.handle_action(Action::Tick),
                        Event::Render => tui.draw(|frame| self.render(frame))?,
                    }
                }
                Some(completion) = self.completions.recv() => {
                    let action = self.dispatcher.complete(completion);
                    self.handle_action(action);
                }
            }
        }

        events.stop();
        tui.exit();
        info!("event loop ended");
        Ok(())
    }

    /// Wait for the next finished command and process its action.
    ///
    /// Returns `false` once no sender is left.
    pub async fn process_next_completion(&mut self) -> bool {
        match self.completions.recv().await {
            Some(completion) => {
                let action = self.dispatcher.complete(completion);
                self.handle_action(action);
                true
            }
            None => false,
        }
    }

    /// Process one action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Resize(..) | Action::Render => {}
            Action::Tick => self.on_tick(),
            Action::Key(key) => self.handle_key(key),
            Action::SwitchTab(id) => {
                debug!(from = ?self.active_tab, to = ?id, "switching tab");
                self.active_tab = id;
            }
            Action::Reconnect => self.reconnect(),
            Action::Notify(notification) => self.notify(notification),
            Action::RequestConfirm(confirm) => self.pending_confirm = Some(confirm),
            Action::Error(envelope) => {
                warn!(operation = %envelope.operation, error = %envelope.cause, "operation failed");
                self.notify(Notification::error(envelope.to_string()));
                for tab in &mut self.tabs {
                    let commands = tab.update(Action::Error(envelope.clone()));
                    self.dispatcher.dispatch_all(commands);
                }
            }
            other => {
                if let Some(message) = other.success_message() {
                    info!(%message, "operation succeeded");
                    self.notify(Notification::success(message));
                }
                if let Some(id) = other.tab() {
                    let commands = self.tabs[id.index()].update(other);
                    self.dispatcher.dispatch_all(commands);
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }

        // Confirmation dialog captures all other input.
        if let Some(confirm) = self.pending_confirm.take() {
            match key.code {
                KeyCode::Char('y' | 'Y') => {
                    info!(prompt = %confirm.prompt, "confirmed");
                    self.dispatcher.dispatch(confirm.command);
                }
                KeyCode::Char('n' | 'N') | KeyCode::Esc => {}
                _ => self.pending_confirm = Some(confirm),
            }
            return;
        }

        if ctrl {
            if let KeyCode::Char(c) = key.code {
                if c == 'k' {
                    self.reconnect();
                    return;
                }
                if let Some(tab) = TabId::from_hotkey(c) {
                    self.handle_action(Action::SwitchTab(tab));
                    return;
                }
            }
        }

        let commands = self.tabs[self.active_tab.index()].update(Action::Key(key));
        self.dispatcher.dispatch_all(commands);
    }

    fn on_tick(&mut self) {
        if self
            .notification
            .as_ref()
            .is_some_and(|(_, shown)| shown.elapsed() >= NOTIFICATION_TTL)
        {
            self.notification = None;
        }
        self.tabs[self.active_tab.index()].on_tick();
    }

    fn notify(&mut self, notification: Notification) {
        self.notification = Some((notification, Instant::now()));
    }

    /// Build a fresh admin session and fresh tabs. Commands still running
    /// against the old session complete into the new tabs.
    fn reconnect(&mut self) {
        info!(cluster = self.session.details.primary_server(), "reconnecting");
        match (self.session.instantiator)(&self.session.details) {
            Ok(admin) => {
                self.tabs = build_tabs(&admin, &self.session);
                self.start();
                self.notify(Notification::success(format!(
                    "Connected to {}",
                    self.session.details.primary_server()
                )));
            }
            Err(cause) => self.handle_action(Action::error(Operation::Connect, cause)),
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [tab_area, content_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_tab_bar(frame, tab_area);

        let tab = self.tab(self.active_tab);
        tab.render(frame, content_area);
        statusbar::render(frame, status_area, self.active_tab, tab.active_page());

        if let Some((notification, _)) = &self.notification {
            render_notification(frame, area, notification);
        }
        if let Some(confirm) = &self.pending_confirm {
            render_confirm_dialog(frame, area, &confirm.prompt);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let labels: Vec<String> = TabId::ALL
            .iter()
            .map(|id| format!("^{} {}", id.hotkey().to_ascii_uppercase(), id.label()))
            .collect();
        let mut line = sub_tabs::render_sub_tabs(&labels, self.active_tab.index(), None);
        line.spans.insert(0, Span::raw(" "));
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn build_tabs(admin: &Arc<dyn Admin>, session: &Session) -> Vec<Box<dyn Tab>> {
    vec![
        Box::new(TopicsTab::new(admin.clone(), session.read_limit)),
        Box::new(CGroupsTab::new(admin.clone())),
        Box::new(SchemaRegistryTab::new(
            admin.clone(),
            session.registry.clone(),
        )),
    ]
}

/// Centered y/n dialog.
fn render_confirm_dialog(frame: &mut Frame, area: Rect, prompt: &str) {
    let width = 50u16.min(area.width.saturating_sub(4));
    let height = 5u16;

    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    let dialog_area = Rect::new(area.x + x, area.y + y, width, height);

    frame.render_widget(Clear, dialog_area);
    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_PANEL)),
        dialog_area,
    );

    let block = Block::default()
        .title(" Confirm ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let text = vec![
        Line::from(Span::styled(format!("  {prompt}"), theme::table_row())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", theme::key_hint_key()),
            Span::styled("confirm    ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notification: &Notification) {
    let message_len = u16::try_from(notification.message.chars().count()).unwrap_or(u16::MAX);
    let width = message_len
        .saturating_add(6)
        .clamp(20, 70)
        .min(area.width.saturating_sub(2));
    let height = 3u16;

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 1);
    let toast_area = Rect::new(area.x + x, area.y + y, width, height.min(area.height));

    let (color, icon) = match notification.level {
        NotificationLevel::Success => (theme::MINT, "✓"),
        NotificationLevel::Error => (theme::ROSE, "✗"),
        NotificationLevel::Info => (theme::SKY, "·"),
    };

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme::BG_PANEL));
    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(notification.message.as_str(), theme::table_row()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use kestrel_core::{AdminError, SandboxCluster};

    fn session(cluster: &SandboxCluster) -> Session {
        Session {
            instantiator: cluster.instantiator(),
            details: ConnectionDetails::new(["sandbox:9092"]),
            registry: None,
            read_limit: 10,
            tick_rate: Duration::from_millis(250),
        }
    }

    fn ctrl(c: char) -> Action {
        Action::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    #[tokio::test]
    async fn failed_initial_connect_is_a_connect_error() {
        let cluster = SandboxCluster::new();
        let mut session = session(&cluster);
        session.details = ConnectionDetails::new(Vec::<String>::new());
        let Err(envelope) = App::new(session) else {
            panic!("connecting without servers must fail");
        };
        assert_eq!(envelope.operation, Operation::Connect);
    }

    #[tokio::test]
    async fn global_keys_switch_tabs_and_quit() {
        let cluster = SandboxCluster::new();
        let mut app = App::new(session(&cluster)).unwrap();
        app.handle_action(ctrl('g'));
        assert_eq!(app.active_tab(), TabId::ConsumerGroups);
        app.handle_action(ctrl('s'));
        assert_eq!(app.active_tab(), TabId::SchemaRegistry);
        app.handle_action(ctrl('c'));
        assert!(!app.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn toasts_expire_after_three_seconds() {
        let cluster = SandboxCluster::new();
        let mut app = App::new(session(&cluster)).unwrap();
        app.handle_action(Action::error(
            Operation::ListTopics,
            AdminError::network("broker down"),
        ));
        assert_eq!(
            app.notification().map(|n| n.level),
            Some(NotificationLevel::Error)
        );

        tokio::time::advance(Duration::from_secs(2)).await;
        app.handle_action(Action::Tick);
        assert!(app.notification().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        app.handle_action(Action::Tick);
        assert!(app.notification().is_none());
    }

    #[tokio::test]
    async fn confirm_dialog_swallows_other_keys() {
        let cluster = SandboxCluster::new();
        let mut app = App::new(session(&cluster)).unwrap();
        app.handle_action(Action::RequestConfirm(Confirm::new(
            "Delete topic orders?",
            Command::perform(Action::Tick),
        )));
        app.handle_action(ctrl('g'));
        assert_eq!(app.active_tab(), TabId::Topics);
        assert_eq!(app.confirm_prompt(), Some("Delete topic orders?"));

        app.handle_action(Action::Key(KeyEvent::from(KeyCode::Esc)));
        assert!(app.confirm_prompt().is_none());
    }

    #[tokio::test]
    async fn failed_reconnect_keeps_running_with_an_error_toast() {
        let cluster = SandboxCluster::new();
        let mut session = session(&cluster);
        let inner = cluster.instantiator();
        let attempts = Arc::new(AtomicUsize::new(0));
        session.instantiator = Arc::new(move |details: &ConnectionDetails| {
            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                inner(details)
            } else {
                Err(AdminError::network("connection refused"))
            }
        });

        let mut app = App::new(session).unwrap();
        app.handle_action(ctrl('k'));
        assert!(app.is_running());
        let notification = app.notification().unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert!(notification.message.starts_with("Connect failed"));
    }
}

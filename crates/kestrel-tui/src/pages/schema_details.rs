//! Versions of one subject, shown one at a time in a scrollable viewport.
//!
//! `←`/`→` move the version cursor, `⏎` shows the version under it and
//! scrolls back to the top, `↑`/`↓` scroll. Long schemas are clipped.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use throbber_widgets_tui::ThrobberState;

use kestrel_core::{Operation, Schema, SchemaLister, Subject};

use crate::action::Action;
use crate::command::{Command, Scope, admin};
use crate::page::{Page, Shortcut};
use crate::pages::{emit, pretty_json, render_loading};
use crate::theme;
use crate::widgets::sub_tabs::render_sub_tabs;
use crate::widgets::viewport::Viewport;

const PAGE: &str = "schema-details";

pub struct SchemaDetailsPage {
    scope: Scope,
    subject: Subject,
    lister: Arc<dyn SchemaLister>,
    schemas: Vec<Schema>,
    /// Version under the cursor.
    cursor: usize,
    /// Version whose content is shown.
    shown: usize,
    viewport: Viewport,
    loading: bool,
    throbber_state: ThrobberState,
}

impl SchemaDetailsPage {
    pub fn new(subject: Subject, lister: Arc<dyn SchemaLister>) -> Self {
        Self {
            scope: Scope::new(PAGE),
            subject,
            lister,
            schemas: Vec::new(),
            cursor: 0,
            shown: 0,
            viewport: Viewport::default(),
            loading: false,
            throbber_state: ThrobberState::default(),
        }
    }

    pub fn shown_schema(&self) -> Option<&Schema> {
        self.schemas.get(self.shown)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn show(&mut self, index: usize) {
        self.shown = index;
        self.cursor = index;
        let content = match self.schemas.get(index) {
            Some(Schema { err: Some(err), .. }) => err.clone(),
            Some(schema) => pretty_json(&schema.value),
            None => String::new(),
        };
        self.viewport.set_content(&content);
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => return emit(Action::LoadSubjectsPage),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.schemas.len().saturating_sub(1));
            }
            KeyCode::Enter if !self.schemas.is_empty() => self.show(self.cursor),
            KeyCode::Up => self.viewport.scroll_up(1),
            KeyCode::Down => self.viewport.scroll_down(1),
            KeyCode::PageUp => self.viewport.scroll_up(10),
            KeyCode::PageDown => self.viewport.scroll_down(10),
            _ => {}
        }
        Vec::new()
    }
}

impl Page for SchemaDetailsPage {
    fn init(&mut self) -> Vec<Command> {
        self.loading = true;
        vec![
            admin::list_versions(
                Arc::clone(&self.lister),
                self.subject.name.clone(),
                self.subject.versions.clone(),
            )
            .keyed(self.scope),
        ]
    }

    fn update(&mut self, action: &Action) -> Vec<Command> {
        match action {
            Action::SchemasListed { subject, schemas } if *subject == self.subject.name => {
                let mut schemas = schemas.clone();
                schemas.sort_by_key(|s| s.version);
                self.schemas = schemas;
                self.loading = false;
                self.show(self.schemas.len().saturating_sub(1));
                Vec::new()
            }
            Action::Error(envelope) if envelope.operation == Operation::ListVersions => {
                self.loading = false;
                Vec::new()
            }
            Action::Key(key) if !self.loading => self.handle_key(key),
            _ => Vec::new(),
        }
    }

    fn on_tick(&mut self) {
        if self.loading {
            self.throbber_state.calc_next();
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        if self.loading {
            render_loading(frame, area, "Loading schema", &self.throbber_state);
            return;
        }

        let [versions_area, id_area, body_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .areas(area);

        let labels: Vec<String> = self.schemas.iter().map(|s| s.version.to_string()).collect();
        let mut bar = vec![Span::styled(" Versions: ", theme::key_hint())];
        bar.extend(render_sub_tabs(&labels, self.cursor, Some(self.shown)).spans);
        frame.render_widget(Paragraph::new(Line::from(bar)), versions_area);

        let id_line = match self.shown_schema() {
            Some(Schema { err: Some(_), .. }) => {
                Line::styled(" version unavailable", theme::error_text())
            }
            Some(schema) => Line::from(vec![
                Span::styled(" ID : ", theme::key_hint()),
                Span::styled(schema.id.as_str(), theme::table_row()),
            ]),
            None => Line::styled(" no versions", theme::key_hint()),
        };
        frame.render_widget(Paragraph::new(id_line), id_area);

        let block = Block::default()
            .title(format!(" {} ", self.subject.name))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(body_area);
        frame.render_widget(block, body_area);
        self.viewport.render(frame, inner);
    }

    /// Empty until a version is on screen.
    fn title(&self) -> String {
        self.shown_schema()
            .map(|schema| {
                format!(
                    "Subjects / {} / Versions / {}",
                    self.subject.name, schema.version
                )
            })
            .unwrap_or_default()
    }

    fn shortcuts(&self) -> Vec<Shortcut> {
        vec![
            Shortcut::new("←/→", "Version"),
            Shortcut::new("⏎", "Show"),
            Shortcut::new("↑/↓", "Scroll"),
            Shortcut::new("Esc", "Back"),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use kestrel_core::SandboxCluster;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    fn schema(id: &str, version: u32, fields: usize) -> Schema {
        let fields: Vec<String> = (0..fields)
            .map(|i| format!(r#"{{"name":"f{i}","type":"string"}}"#))
            .collect();
        Schema {
            id: id.into(),
            value: format!(
                r#"{{"type":"record","name":"v{version}","fields":[{}]}}"#,
                fields.join(",")
            ),
            version,
            err: None,
        }
    }

    fn loaded() -> SchemaDetailsPage {
        let subject = Subject {
            name: "orders-value".into(),
            versions: vec![1, 2, 3],
        };
        let mut page = SchemaDetailsPage::new(subject, Arc::new(SandboxCluster::new()));
        assert_eq!(page.init().len(), 1);
        page.update(&Action::SchemasListed {
            subject: "orders-value".into(),
            schemas: vec![schema("113", 3, 8), schema("111", 1, 1), schema("112", 2, 2)],
        });
        page
    }

    fn press(page: &mut SchemaDetailsPage, code: KeyCode) {
        page.update(&Action::Key(KeyEvent::from(code)));
    }

    fn screen(page: &SchemaDetailsPage, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(50, height)).unwrap();
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
    fn shows_loading_until_versions_arrive() {
        let subject = Subject {
            name: "orders-value".into(),
            versions: vec![1],
        };
        let mut page = SchemaDetailsPage::new(subject, Arc::new(SandboxCluster::new()));
        page.init();
        assert!(screen(&page, 6).contains("Loading schema"));
        assert_eq!(page.title(), "");
    }

    #[test]
    fn latest_version_is_shown_first() {
        let page = loaded();
        assert_eq!(page.title(), "Subjects / orders-value / Versions / 3");
        let screen = screen(&page, 8);
        assert!(screen.contains("1  2  «3»"), "{screen}");
        assert!(screen.contains("ID : 113"));
    }

    #[test]
    fn paging_left_and_selecting_swaps_content_and_scroll() {
        let mut page = loaded();
        press(&mut page, KeyCode::Down);
        press(&mut page, KeyCode::Down);
        assert_eq!(page.viewport().offset(), 2);

        press(&mut page, KeyCode::Left);
        press(&mut page, KeyCode::Left);
        assert_eq!(page.shown_schema().unwrap().version, 3);
        press(&mut page, KeyCode::Enter);

        assert_eq!(page.shown_schema().unwrap().id, "111");
        assert_eq!(page.viewport().offset(), 0);
        assert_eq!(page.title(), "Subjects / orders-value / Versions / 1");
        assert!(screen(&page, 8).contains("«1»  2  3"));
    }

    #[test]
    fn long_schema_is_clipped_not_wrapped() {
        let page = loaded();
        let screen = screen(&page, 8);
        // 2 header rows + 2 border rows leave 4 content rows.
        assert!(screen.contains("\"fields\": ["), "{screen}");
        assert!(!screen.contains("f7"));
        assert!(page.viewport().line_count() > 4);
    }

    #[test]
    fn missing_version_shows_its_error() {
        let subject = Subject {
            name: "s".into(),
            versions: vec![9],
        };
        let mut page = SchemaDetailsPage::new(subject, Arc::new(SandboxCluster::new()));
        page.update(&Action::SchemasListed {
            subject: "s".into(),
            schemas: vec![Schema {
                id: String::new(),
                value: String::new(),
                version: 9,
                err: Some("version 9 not found".into()),
            }],
        });
        assert_eq!(page.viewport().visible(1), ["version 9 not found"]);
    }

    #[test]
    fn esc_goes_back_to_subjects() {
        let mut page = loaded();
        let commands = page.update(&Action::Key(KeyEvent::from(KeyCode::Esc)));
        assert_eq!(commands.len(), 1);
    }
}

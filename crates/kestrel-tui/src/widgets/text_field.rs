//! Minimal line-input forms for the create and publish pages.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::theme;

/// One labelled single-line input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub label: &'static str,
    pub value: String,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Apply an editing key. Returns `false` if the key is not an edit.
    pub fn edit(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Backspace => {
                self.value.pop();
                true
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.push(c);
                true
            }
            _ => false,
        }
    }

    /// Label line plus a rounded box holding the value.
    pub fn render(&self, frame: &mut Frame, area: Rect, active: bool) {
        if area.height < 3 {
            return;
        }
        let label_area = Rect::new(area.x, area.y, area.width, 1);
        frame.render_widget(
            Paragraph::new(Span::styled(self.label, theme::input_label(active))),
            label_area,
        );

        let border = if active {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let mut spans = vec![Span::styled(self.value.as_str(), theme::table_row())];
        if active {
            spans.push(Span::styled("█", theme::key_hint_key()));
        }
        let input_area = Rect::new(area.x, area.y + 1, area.width, 3.min(area.height - 1));
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), input_area);
    }
}

/// A vertical stack of fields with one focused at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    fields: Vec<TextField>,
    active: usize,
}

impl Form {
    pub fn new(fields: Vec<TextField>) -> Self {
        Self { fields, active: 0 }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", |f| f.value.as_str())
    }

    pub fn clear(&mut self, index: usize) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value.clear();
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Focus movement and editing. Enter and Esc are left to the page.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.active = (self.active + 1) % self.fields.len().max(1);
                true
            }
            KeyCode::BackTab | KeyCode::Up => {
                let len = self.fields.len().max(1);
                self.active = (self.active + len - 1) % len;
                true
            }
            _ => self
                .fields
                .get_mut(self.active)
                .is_some_and(|field| field.edit(key)),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical(
            self.fields
                .iter()
                .map(|_| Constraint::Length(4))
                .chain(std::iter::once(Constraint::Min(0))),
        )
        .split(area);
        for (i, (field, row)) in self.fields.iter().zip(rows.iter()).enumerate() {
            field.render(frame, *row, i == self.active);
        }
    }
}

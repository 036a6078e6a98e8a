//! Sortable, filterable list shared by every list page.
//!
//! The displayed rows are always a function of the raw items, the filter
//! text and the sort state; they are recomputed on every change rather than
//! patched. Selection is `None` exactly when nothing is displayed.
//!
//! Sorting: the default is ascending by the item's default (name) column.
//! Sorting by a column other than the current one always starts descending;
//! sorting by the current column flips the direction. The sort is stable, so
//! equal keys keep the order in which items were received.
//!
//! Filtering is a case-sensitive literal substring match on the primary
//! text. Every filter change moves the selection back to the first row.

use std::cmp::Ordering;
use std::fmt::Display;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use strum::IntoEnumIterator;

use crate::theme;

/// A row type displayable in a [`ListView`].
pub trait ListItem {
    /// Sortable columns, in display order. `Default` is the name column.
    type Column: Copy + Eq + Default + IntoEnumIterator + Display;

    /// Text the filter matches against.
    fn primary_text(&self) -> &str;

    fn compare(&self, other: &Self, column: Self::Column) -> Ordering;

    fn cell(&self, column: Self::Column) -> String;

    fn width(_column: Self::Column) -> Constraint {
        Constraint::Fill(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<C> {
    pub column: C,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Filtering,
    /// Choosing a sort column; holds the cursor's column index.
    PickingColumn(usize),
}

pub struct ListView<T: ListItem> {
    items: Vec<T>,
    displayed: Vec<usize>,
    sort: Sort<T::Column>,
    filter: String,
    selected: Option<usize>,
    mode: Mode,
}

impl<T: ListItem> Default for ListView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ListItem> ListView<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            displayed: Vec::new(),
            sort: Sort {
                column: T::Column::default(),
                direction: SortDirection::Ascending,
            },
            filter: String::new(),
            selected: None,
            mode: Mode::Browse,
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn displayed(&self) -> impl Iterator<Item = &T> {
        self.displayed.iter().filter_map(|&i| self.items.get(i))
    }

    pub fn displayed_len(&self) -> usize {
        self.displayed.len()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.selected
            .and_then(|row| self.displayed.get(row))
            .and_then(|&i| self.items.get(i))
    }

    pub fn sort(&self) -> Sort<T::Column> {
        self.sort
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn is_filtering(&self) -> bool {
        self.mode == Mode::Filtering
    }

    pub fn is_picking_column(&self) -> bool {
        matches!(self.mode, Mode::PickingColumn(_))
    }

    /// Column labels, the sorted one prefixed with its direction marker.
    pub fn header(&self) -> Vec<String> {
        T::Column::iter()
            .map(|column| {
                if column == self.sort.column {
                    format!("{} {column}", self.sort.direction.marker())
                } else {
                    column.to_string()
                }
            })
            .collect()
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Replace the raw collection. Clears the filter, keeps the sort.
    pub fn set_items(&mut self, items: Vec<T>) {
        let had_filter = !self.filter.is_empty();
        self.items = items;
        self.filter.clear();
        if self.mode == Mode::Filtering {
            self.mode = Mode::Browse;
        }
        self.recompute();
        if had_filter {
            self.reset_selection();
        } else {
            self.clamp_selection();
        }
    }

    /// Append one item, keeping filter and sort.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.recompute();
        self.clamp_selection();
    }

    /// The sort command: a new column starts descending, the current column
    /// flips direction.
    pub fn sort_by(&mut self, column: T::Column) {
        self.sort = if column == self.sort.column {
            Sort {
                column,
                direction: self.sort.direction.toggled(),
            }
        } else {
            Sort {
                column,
                direction: SortDirection::Descending,
            }
        };
        self.recompute();
        self.clamp_selection();
    }

    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
        self.recompute();
        self.reset_selection();
    }

    pub fn move_selection(&mut self, delta: isize) {
        let Some(current) = self.selected else {
            return;
        };
        let last = self.displayed.len().saturating_sub(1);
        let next = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta.unsigned_abs()).min(last)
        };
        self.selected = Some(next);
    }

    pub fn select_first(&mut self) {
        self.reset_selection();
    }

    pub fn select_last(&mut self) {
        self.selected = self.displayed.len().checked_sub(1);
    }

    /// Handle list navigation, filter input and column picking.
    ///
    /// Returns `false` for keys the list does not use, so the page can act
    /// on them.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match self.mode {
            Mode::Filtering => self.handle_filter_key(key),
            Mode::PickingColumn(cursor) => self.handle_picker_key(key, cursor),
            Mode::Browse => self.handle_browse_key(key),
        }
    }

    fn handle_filter_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                self.set_filter(String::new());
            }
            KeyCode::Enter => self.mode = Mode::Browse,
            KeyCode::Backspace => {
                let mut text = self.filter.clone();
                text.pop();
                self.set_filter(text);
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut text = self.filter.clone();
                text.push(c);
                self.set_filter(text);
            }
            _ => return false,
        }
        true
    }

    fn handle_picker_key(&mut self, key: &KeyEvent, cursor: usize) -> bool {
        let count = T::Column::iter().count();
        match key.code {
            KeyCode::Left => self.mode = Mode::PickingColumn(cursor.saturating_sub(1)),
            KeyCode::Right => {
                self.mode = Mode::PickingColumn((cursor + 1).min(count.saturating_sub(1)));
            }
            KeyCode::Enter => {
                if let Some(column) = T::Column::iter().nth(cursor) {
                    self.sort_by(column);
                }
            }
            KeyCode::Esc | KeyCode::F(3) => self.mode = Mode::Browse,
            _ => return false,
        }
        true
    }

    fn handle_browse_key(&mut self, key: &KeyEvent) -> bool {
        let plain = key.modifiers.difference(KeyModifiers::SHIFT).is_empty();
        match key.code {
            KeyCode::Char('/') if plain => self.mode = Mode::Filtering,
            KeyCode::F(3) => {
                let cursor = T::Column::iter()
                    .position(|c| c == self.sort.column)
                    .unwrap_or(0);
                self.mode = Mode::PickingColumn(cursor);
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('k') if plain => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Char('j') if plain => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-10),
            KeyCode::PageDown => self.move_selection(10),
            KeyCode::Home => self.select_first(),
            KeyCode::End => self.select_last(),
            _ => return false,
        }
        true
    }

    fn recompute(&mut self) {
        let filter = self.filter.as_str();
        let mut displayed: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.primary_text().contains(filter))
            .map(|(i, _)| i)
            .collect();

        let Sort { column, direction } = self.sort;
        let items = &self.items;
        displayed.sort_by(|&a, &b| {
            let (a, b) = (&items[a], &items[b]);
            match direction {
                SortDirection::Ascending => a.compare(b, column),
                SortDirection::Descending => b.compare(a, column),
            }
        });
        self.displayed = displayed;
    }

    fn reset_selection(&mut self) {
        self.selected = if self.displayed.is_empty() {
            None
        } else {
            Some(0)
        };
    }

    fn clamp_selection(&mut self) {
        self.selected = match (self.selected, self.displayed.len()) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(row), len) => Some(row.min(len - 1)),
        };
    }

    // ── Rendering ───────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, title: &str) {
        self.draw(frame, area, title, theme::border_default());
    }

    /// [`ListView::render`] for pages holding more than one list; the
    /// focused one gets the highlighted border.
    pub fn render_focused(&self, frame: &mut Frame, area: Rect, title: &str, focused: bool) {
        let border = if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        self.draw(frame, area, title, border);
    }

    fn draw(&self, frame: &mut Frame, area: Rect, title: &str, border: Style) {
        let block = Block::default()
            .title(format!(
                " {title} ({}/{}) ",
                self.displayed.len(),
                self.items.len()
            ))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let show_filter = self.mode == Mode::Filtering || !self.filter.is_empty();
        let table_area = if show_filter {
            let [filter_area, table_area] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(inner);
            let mut spans = vec![
                Span::styled(" / ", theme::key_hint_key()),
                Span::styled(self.filter.as_str(), theme::table_row()),
            ];
            if self.mode == Mode::Filtering {
                spans.push(Span::styled("█", theme::key_hint_key()));
            }
            frame.render_widget(Paragraph::new(Line::from(spans)), filter_area);
            table_area
        } else {
            inner
        };

        let cursor = match self.mode {
            Mode::PickingColumn(cursor) => Some(cursor),
            _ => None,
        };
        let header = Row::new(self.header().into_iter().enumerate().map(|(i, label)| {
            let style = if cursor == Some(i) {
                theme::table_header_picking()
            } else {
                theme::table_header()
            };
            Cell::from(label).style(style)
        }));

        let rows: Vec<Row> = self
            .displayed()
            .map(|item| {
                Row::new(T::Column::iter().map(|column| Cell::from(item.cell(column))))
                    .style(theme::table_row())
            })
            .collect();
        let widths: Vec<Constraint> = T::Column::iter().map(T::width).collect();

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = TableState::default().with_selected(self.selected);
        frame.render_stateful_widget(table, table_area, &mut state);
    }
}

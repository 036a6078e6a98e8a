//! Scrollable, clipped text area used by detail pages.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::theme;

/// Lines of text plus a vertical scroll offset.
///
/// Content wider or taller than the area is clipped, never wrapped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    lines: Vec<String>,
    offset: usize,
}

impl Viewport {
    pub fn new(text: &str) -> Self {
        let mut viewport = Self::default();
        viewport.set_content(text);
        viewport
    }

    /// Swap the content and scroll back to the top.
    pub fn set_content(&mut self, text: &str) {
        self.lines = text.lines().map(str::to_owned).collect();
        self.offset = 0;
    }

    pub fn scroll_down(&mut self, by: usize) {
        let last = self.lines.len().saturating_sub(1);
        self.offset = self.offset.saturating_add(by).min(last);
    }

    pub fn scroll_up(&mut self, by: usize) {
        self.offset = self.offset.saturating_sub(by);
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The lines visible in a window `height` rows tall.
    pub fn visible(&self, height: usize) -> &[String] {
        let start = self.offset.min(self.lines.len());
        let end = start.saturating_add(height).min(self.lines.len());
        &self.lines[start..end]
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .visible(usize::from(area.height))
            .iter()
            .map(|l| Line::styled(l.as_str(), theme::table_row()))
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }
}

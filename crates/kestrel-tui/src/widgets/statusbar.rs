//! Bottom status line, derived from the active page on every render.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::page::Page;
use crate::tabs::TabId;
use crate::theme;

/// The status line for `page` inside `tab`. Pure: nothing is cached.
pub fn status_line(tab: TabId, page: &dyn Page) -> Line<'static> {
    let mut spans = vec![
        Span::styled(format!(" {} ", tab.label()), theme::tab_active()),
        Span::styled("│ ", theme::key_hint()),
        Span::styled(page.title(), theme::title_style()),
    ];

    for shortcut in page.shortcuts() {
        spans.push(Span::styled("  ", theme::key_hint()));
        spans.push(Span::styled(shortcut.key, theme::key_hint_key()));
        spans.push(Span::styled(format!(" {}", shortcut.name), theme::key_hint()));
    }

    Line::from(spans)
}

pub fn render(frame: &mut Frame, area: Rect, tab: TabId, page: &dyn Page) {
    frame.render_widget(Paragraph::new(status_line(tab, page)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::command::Command;
    use crate::page::Shortcut;

    struct Fixed(&'static str);

    impl Page for Fixed {
        fn update(&mut self, _action: &Action) -> Vec<Command> {
            Vec::new()
        }

        fn render(&self, _frame: &mut Frame, _area: Rect) {}

        fn title(&self) -> String {
            self.0.to_string()
        }

        fn shortcuts(&self) -> Vec<Shortcut> {
            vec![Shortcut::new("F5", "Refresh")]
        }
    }

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn line_follows_page_title_and_shortcuts() {
        let line = status_line(TabId::Topics, &Fixed("Topics"));
        insta::assert_snapshot!(plain(&line).trim(), @"Topics │ Topics  F5 Refresh");

        let line = status_line(TabId::SchemaRegistry, &Fixed("Subjects / orders-value"));
        assert!(plain(&line).contains("Subjects / orders-value"));
    }
}

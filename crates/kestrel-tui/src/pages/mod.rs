//! Page implementations, grouped by tab.

pub mod cgroup_topics;
pub mod cgroups;
pub mod create_topic;
pub mod publish;
pub mod records;
pub mod schema_details;
pub mod subjects;
pub mod topic_configs;
pub mod topics;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::action::Action;
use crate::command::Command;
use crate::theme;

pub use cgroup_topics::CGroupTopicsPage;
pub use cgroups::CGroupsPage;
pub use create_topic::CreateTopicPage;
pub use publish::PublishPage;
pub use records::RecordsPage;
pub use schema_details::SchemaDetailsPage;
pub use subjects::SubjectsPage;
pub use topic_configs::TopicConfigsPage;
pub use topics::TopicsPage;

/// `Ctrl+<c>`.
pub(crate) fn ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

/// A single command that emits `action` back into the loop.
pub(crate) fn emit(action: Action) -> Vec<Command> {
    vec![Command::perform(action)]
}

/// Centered spinner with a label.
pub(crate) fn render_loading(frame: &mut Frame, area: Rect, label: &str, state: &ThrobberState) {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);

    let throbber = Throbber::default()
        .label(format!(" {label}"))
        .style(Style::default().fg(theme::SKY))
        .throbber_style(Style::default().fg(theme::AMBER));

    frame.render_stateful_widget(throbber, row, &mut state.clone());
}

/// Pretty-print `raw` if it parses as JSON, else return it unchanged.
pub(crate) fn pretty_json(raw: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| raw.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_is_pretty_printed_and_text_passes_through() {
        assert_eq!(pretty_json(r#"{"a":1}"#), "{\n  \"a\": 1\n}");
        assert_eq!(pretty_json("plain text"), "plain text");
    }
}

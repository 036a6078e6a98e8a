//! Horizontal label bar used for the tab strip and the schema version pager.

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use crate::theme;

/// Renders `labels` inline. The `active` label is bracketed and highlighted;
/// the `marked` label (if any) is wrapped in `«»`.
pub fn render_sub_tabs<'a>(labels: &[String], active: usize, marked: Option<usize>) -> Line<'a> {
    let mut spans = Vec::with_capacity(labels.len() * 2);

    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", theme::key_hint()));
        }

        let text = if marked == Some(i) {
            format!("«{label}»")
        } else {
            label.clone()
        };

        if i == active {
            spans.push(Span::styled(
                text,
                theme::tab_active().add_modifier(Modifier::UNDERLINED),
            ));
        } else {
            spans.push(Span::styled(text, theme::tab_inactive()));
        }
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn marked_label_gets_guillemets() {
        let labels = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        let line = render_sub_tabs(&labels, 0, Some(2));
        assert_eq!(plain(&line), "1  2  «3»");
    }

    #[test]
    fn active_label_is_highlighted() {
        let labels = vec!["Topics".to_string(), "Groups".to_string()];
        let line = render_sub_tabs(&labels, 1, None);
        assert!(line.spans[2].style.add_modifier.contains(Modifier::UNDERLINED));
        assert!(!line.spans[0].style.add_modifier.contains(Modifier::UNDERLINED));
    }
}

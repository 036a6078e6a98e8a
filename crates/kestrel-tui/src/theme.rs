//! Kestrel palette and semantic styles.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

pub const AMBER: Color = Color::Rgb(255, 183, 77); // #ffb74d
pub const SKY: Color = Color::Rgb(110, 200, 255); // #6ec8ff
pub const MINT: Color = Color::Rgb(105, 240, 174); // #69f0ae
pub const ROSE: Color = Color::Rgb(255, 110, 110); // #ff6e6e
pub const SAND: Color = Color::Rgb(214, 208, 196); // #d6d0c4
pub const SLATE: Color = Color::Rgb(112, 120, 140); // #70788c
pub const BG_PANEL: Color = Color::Rgb(28, 30, 36); // #1c1e24
pub const BG_SELECTED: Color = Color::Rgb(48, 52, 64); // #303440

// ── Semantic Styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

pub fn border_default() -> Style {
    Style::default().fg(SLATE)
}

pub fn border_focused() -> Style {
    Style::default().fg(AMBER)
}

pub fn table_header() -> Style {
    Style::default().fg(SKY).add_modifier(Modifier::BOLD)
}

/// Header cell under the column-picker cursor.
pub fn table_header_picking() -> Style {
    Style::default()
        .fg(BG_PANEL)
        .bg(SKY)
        .add_modifier(Modifier::BOLD)
}

pub fn table_row() -> Style {
    Style::default().fg(SAND)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(AMBER)
        .bg(BG_SELECTED)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(SAND)
}

pub fn key_hint() -> Style {
    Style::default().fg(SLATE)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(SKY).add_modifier(Modifier::BOLD)
}

pub fn input_label(active: bool) -> Style {
    if active {
        Style::default().fg(SKY)
    } else {
        Style::default().fg(SAND)
    }
}

pub fn error_text() -> Style {
    Style::default().fg(ROSE)
}

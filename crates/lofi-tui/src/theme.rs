//! Color palette and style constants for lofichill.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(18, 16, 24);
pub const C_ACCENT: Color = Color::Rgb(186, 140, 255);
pub const C_PLAYING: Color = Color::Rgb(120, 210, 170);
pub const C_PAUSED: Color = Color::Rgb(255, 190, 110);
pub const C_LIKED: Color = Color::Rgb(255, 110, 150);
pub const C_MUTED: Color = Color::Rgb(76, 72, 92);
pub const C_SECONDARY: Color = Color::Rgb(128, 122, 150);
pub const C_PRIMARY: Color = Color::Rgb(218, 212, 232);
pub const C_SELECTION_BG: Color = Color::Rgb(34, 30, 46);
pub const C_PANEL_BORDER: Color = Color::Rgb(44, 40, 58);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(150, 110, 230);
pub const C_NUMBER_HINT: Color = Color::Rgb(96, 90, 120);
pub const C_FILTER_BG: Color = Color::Rgb(24, 22, 34);
pub const C_FILTER_FG: Color = Color::Rgb(255, 214, 120);
pub const C_OVERLAY_BG: Color = Color::Rgb(22, 20, 30);
pub const C_TOAST_INFO: Color = Color::Rgb(120, 170, 240);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(120, 210, 170);
pub const C_TOAST_WARNING: Color = Color::Rgb(255, 190, 110);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 105, 120);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_accent() -> Style {
    Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

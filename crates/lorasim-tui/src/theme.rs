//! Palette and semantic styles for the dashboard.

use ratatui::style::{Color, Modifier, Style};

use lorasim_core::GatewayStatus;

use crate::action::NotificationLevel;

// ── Palette ───────────────────────────────────────────────────────────

pub const ACCENT: Color = Color::Rgb(94, 200, 255); // #5ec8ff
pub const HIGHLIGHT: Color = Color::Rgb(190, 132, 255); // #be84ff
pub const OK_GREEN: Color = Color::Rgb(95, 230, 140); // #5fe68c
pub const WARN_AMBER: Color = Color::Rgb(255, 196, 87); // #ffc457
pub const FAIL_RED: Color = Color::Rgb(255, 104, 104); // #ff6868

pub const TEXT: Color = Color::Rgb(200, 204, 214); // #c8ccd6
pub const MUTED: Color = Color::Rgb(110, 120, 150); // #6e7896
pub const BG_SELECTED: Color = Color::Rgb(38, 42, 58); // #262a3a
pub const BG_OVERLAY: Color = Color::Rgb(24, 26, 36); // #181a24

// ── Semantic Styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(HIGHLIGHT)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

/// Placeholder rows and disabled actions.
pub fn muted() -> Style {
    Style::default().fg(MUTED).add_modifier(Modifier::ITALIC)
}

pub fn server_name() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn group_label() -> Style {
    Style::default().fg(ACCENT)
}

pub fn selected() -> Style {
    Style::default()
        .bg(BG_SELECTED)
        .fg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn gateway_status(status: GatewayStatus) -> Style {
    let color = match status {
        GatewayStatus::Connected => OK_GREEN,
        GatewayStatus::Disconnected => FAIL_RED,
        GatewayStatus::Pending => WARN_AMBER,
    };
    Style::default().fg(color)
}

pub fn notification(level: NotificationLevel) -> (Color, &'static str) {
    match level {
        NotificationLevel::Success => (OK_GREEN, "✓"),
        NotificationLevel::Error => (FAIL_RED, "✗"),
        NotificationLevel::Warning => (WARN_AMBER, "!"),
        NotificationLevel::Info => (ACCENT, "·"),
    }
}

pub fn key_hint() -> Style {
    Style::default().fg(MUTED)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

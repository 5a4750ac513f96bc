use ratatui::style::{Color, Modifier, Style};

use crate::control::LoopTone;

pub(super) const UI_MARGIN: u16 = 1;
pub(super) const INPUT_HEIGHT: u16 = 3;
pub(super) const BUTTON_HEIGHT: u16 = 3;
pub(super) const STATUS_HEIGHT: u16 = 4;
pub(super) const INPUT_WIDTH: u16 = 14;
pub(super) const BG_RGB: (u8, u8, u8) = (0x0a, 0x0a, 0x0a);
pub(super) const PANEL_BORDER_RGB: (u8, u8, u8) = (0xe5, 0xe7, 0xeb);
pub(super) const PANEL_TEXT_RGB: (u8, u8, u8) = (0xff, 0xff, 0xff);
pub(super) const PANEL_MUTED_RGB: (u8, u8, u8) = (0xd1, 0xd5, 0xdb);
pub(super) const ACCENT_FOCUS_RGB: (u8, u8, u8) = (0x22, 0xd3, 0xee);
pub(super) const ACCENT_GREEN_RGB: (u8, u8, u8) = (0x22, 0xc5, 0x5e);
pub(super) const ACCENT_AMBER_RGB: (u8, u8, u8) = (0xf5, 0x9e, 0x0b);
pub(super) const ACCENT_RED_RGB: (u8, u8, u8) = (0xef, 0x44, 0x44);

pub(super) const fn rgb(rgb: (u8, u8, u8)) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub(super) fn style_color(no_color: bool, color: Color) -> Style {
    if no_color {
        Style::default()
    } else {
        Style::default().fg(color)
    }
}

pub(super) fn app_background_style(no_color: bool) -> Style {
    if no_color {
        Style::default()
    } else {
        Style::default().bg(rgb(BG_RGB)).fg(rgb(PANEL_TEXT_RGB))
    }
}

/// Focused widgets get the accent border (or bold without color); disabled
/// ones are muted.
pub(super) fn border_style(no_color: bool, focused: bool, enabled: bool) -> Style {
    match (no_color, focused, enabled) {
        (true, true, _) => Style::default().add_modifier(Modifier::BOLD),
        (true, false, _) => Style::default(),
        (false, true, true) => Style::default().fg(rgb(ACCENT_FOCUS_RGB)),
        (false, _, false) => Style::default().fg(rgb(PANEL_MUTED_RGB)),
        (false, false, true) => Style::default().fg(rgb(PANEL_BORDER_RGB)),
    }
}

pub(super) fn tone_style(no_color: bool, tone: LoopTone) -> Style {
    let color = match tone {
        LoopTone::Neutral => rgb(PANEL_MUTED_RGB),
        LoopTone::Active => rgb(ACCENT_GREEN_RGB),
        LoopTone::Inactive => rgb(ACCENT_AMBER_RGB),
        LoopTone::Error => rgb(ACCENT_RED_RGB),
    };
    style_color(no_color, color)
}

pub(super) fn alert_style(no_color: bool) -> Style {
    if no_color {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
            .fg(rgb(PANEL_TEXT_RGB))
            .bg(rgb(ACCENT_RED_RGB))
    }
}

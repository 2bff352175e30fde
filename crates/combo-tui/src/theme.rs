//! Color scheme and styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// The color palette for the combo box.
pub struct Theme;

impl Theme {
    // ── Base colors ─────────────────────────────────────────
    pub fn bg() -> Color {
        Color::Reset
    }

    pub fn fg() -> Color {
        Color::Rgb(200, 200, 200)
    }

    pub fn fg_dim() -> Color {
        Color::Rgb(100, 100, 100)
    }

    pub fn fg_muted() -> Color {
        Color::Rgb(140, 140, 140)
    }

    // ── Accent colors ───────────────────────────────────────
    pub fn accent() -> Color {
        Color::Rgb(110, 170, 255)
    }

    pub fn accent_secondary() -> Color {
        Color::Rgb(180, 130, 240)
    }

    pub fn success() -> Color {
        Color::Rgb(80, 200, 120)
    }

    // ── Structural colors ───────────────────────────────────
    pub fn border_color() -> Color {
        Color::Rgb(60, 60, 60)
    }

    pub fn selection_bg() -> Color {
        Color::Rgb(40, 40, 60)
    }

    pub fn pill_bg() -> Color {
        Color::Rgb(50, 60, 90)
    }

    // ── Composite styles ────────────────────────────────────

    pub fn title() -> Style {
        Style::default()
            .fg(Self::accent())
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .fg(Self::accent())
            .add_modifier(Modifier::BOLD)
    }

    pub fn normal() -> Style {
        Style::default().fg(Self::fg())
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::fg_dim())
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::fg_muted())
    }

    pub fn border() -> Style {
        Style::default().fg(Self::border_color())
    }

    pub fn focused_border() -> Style {
        Style::default().fg(Self::accent())
    }

    pub fn key_hint() -> Style {
        Style::default().fg(Self::accent())
    }

    pub fn highlight() -> Style {
        Style::default()
            .bg(Self::selection_bg())
            .add_modifier(Modifier::BOLD)
    }

    pub fn pill() -> Style {
        Style::default().fg(Self::fg()).bg(Self::pill_bg())
    }

    pub fn pill_counter() -> Style {
        Style::default().fg(Self::accent_secondary())
    }

    pub fn check() -> Style {
        Style::default().fg(Self::success())
    }

    pub fn cursor() -> Style {
        Style::default().fg(Self::bg()).bg(Self::accent())
    }

    pub fn disabled() -> Style {
        Style::default()
            .fg(Self::fg_dim())
            .add_modifier(Modifier::DIM)
    }
}

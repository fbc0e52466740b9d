use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Padding};

use taskdeck_core::Priority;

pub struct Theme;

impl Theme {
    // ── Border ───────────────────────────────────────────────────────
    pub const BORDER_DIM: Color = Color::DarkGray;
    pub const BORDER_NORMAL: Color = Color::Rgb(60, 65, 80);
    pub const BORDER_ACCENT: Color = Color::Rgb(100, 180, 240);

    // ── Text hierarchy ───────────────────────────────────────────────
    pub const TEXT_PRIMARY: Color = Color::White;
    pub const TEXT_SECONDARY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_MUTED: Color = Color::Rgb(80, 85, 100);
    pub const TEXT_HINT: Color = Color::Rgb(60, 65, 80);

    // ── Key style (for footer hints) ─────────────────────────────────
    pub const TEXT_KEY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_KEY_DESC: Color = Color::DarkGray;

    // ── Accent ───────────────────────────────────────────────────────
    pub const ACCENT_BLUE: Color = Color::Rgb(100, 180, 240);
    pub const ACCENT_GREEN: Color = Color::Rgb(80, 200, 120);
    pub const ACCENT_RED: Color = Color::Rgb(220, 80, 80);
    pub const ACCENT_YELLOW: Color = Color::Rgb(220, 180, 60);
    pub const ACCENT_PURPLE: Color = Color::Rgb(180, 140, 220);
    pub const ACCENT_ORANGE: Color = Color::Rgb(217, 119, 80);

    // ── Semantic ─────────────────────────────────────────────────────
    pub const DONE: Color = Color::Rgb(80, 200, 120);
    pub const OVERDUE: Color = Color::Rgb(220, 80, 80);
    pub const BADGE_LOCKED: Color = Color::Rgb(80, 85, 100);
    pub const BADGE_UNLOCKED: Color = Color::Rgb(220, 180, 60);

    // ── Tab style ────────────────────────────────────────────────────
    pub const TAB_INACTIVE: Color = Color::Rgb(120, 125, 140);
    pub const TAB_DIM: Color = Color::Rgb(70, 75, 90);

    // ── Settings ─────────────────────────────────────────────────────
    pub const FIELD_VALUE: Color = Color::Rgb(100, 105, 120);

    // ── Padding ──────────────────────────────────────────────────────
    pub const PADDING_CARD: Padding = Padding::new(2, 2, 1, 1);

    // ── Block helpers ────────────────────────────────────────────────

    pub fn block() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_NORMAL))
    }

    pub fn block_dim() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_DIM))
    }

    pub fn block_accent() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_ACCENT))
    }
}

// ── Priority color / marker ──────────────────────────────────────────

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Theme::ACCENT_RED,
        Priority::Medium => Theme::ACCENT_YELLOW,
        Priority::Low => Theme::ACCENT_GREEN,
    }
}

pub fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "!!!",
        Priority::Medium => " !!",
        Priority::Low => "  !",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_colors_are_distinct() {
        let high = priority_color(Priority::High);
        let medium = priority_color(Priority::Medium);
        let low = priority_color(Priority::Low);
        assert!(high != medium && medium != low && high != low);
    }

    #[test]
    fn priority_markers_share_a_width() {
        assert_eq!(priority_marker(Priority::High).len(), 3);
        assert_eq!(priority_marker(Priority::Medium).len(), 3);
        assert_eq!(priority_marker(Priority::Low).len(), 3);
    }
}

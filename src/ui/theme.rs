//! Binj theme
//!
//! Dark palette with a red brand accent, plus style helpers for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Binj color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #141414 (near black)
    pub const BACKGROUND: Color = Color::Rgb(0x14, 0x14, 0x14);

    /// Primary: #e50914 (brand red)
    pub const PRIMARY: Color = Color::Rgb(0xe5, 0x09, 0x14);

    /// Secondary: #b3b3b3 (light grey)
    pub const SECONDARY: Color = Color::Rgb(0xb3, 0xb3, 0xb3);

    /// Accent: #f5c518 (rating gold)
    pub const ACCENT: Color = Color::Rgb(0xf5, 0xc5, 0x18);

    /// Highlight: #ff3d47 (light red, selection)
    pub const HIGHLIGHT: Color = Color::Rgb(0xff, 0x3d, 0x47);

    /// Text: #f5f5f1 (off white)
    pub const TEXT: Color = Color::Rgb(0xf5, 0xf5, 0xf1);

    /// Dim: #6d6d6e (muted)
    pub const DIM: Color = Color::Rgb(0x6d, 0x6d, 0x6e);

    /// Success: #46d369 (green)
    pub const SUCCESS: Color = Color::Rgb(0x46, 0xd3, 0x69);

    /// Warning: #ffa00a (orange)
    pub const WARNING: Color = Color::Rgb(0xff, 0xa0, 0x0a);

    /// Error: #ff4d4d (red)
    pub const ERROR: Color = Color::Rgb(0xff, 0x4d, 0x4d);

    // ═══════════════════════════════════════════════════════════════════════
    // DERIVED COLORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Panels and cards
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x22, 0x22, 0x22);

    /// Hovered card
    pub const BACKGROUND_HOVER: Color = Color::Rgb(0x33, 0x33, 0x33);

    pub const BORDER: Color = Color::Rgb(0x40, 0x40, 0x40);

    pub const BORDER_FOCUSED: Color = Self::PRIMARY;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// Inverted brand style (logo, buttons)
    pub fn highlighted() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    /// Section titles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// Ratings
    pub fn accent() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::BORDER_FOCUSED)
            .add_modifier(Modifier::BOLD)
    }

    /// Logo text
    pub fn logo() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMPONENT STYLES
    // ═══════════════════════════════════════════════════════════════════════

    pub fn list_item() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn list_item_selected() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .bg(Self::BACKGROUND_HOVER)
            .add_modifier(Modifier::BOLD)
    }

    /// Input fields
    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn keybind_desc() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Loading/spinner indicator
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::SECONDARY)
            .add_modifier(Modifier::ITALIC)
    }

    /// Avatar badge in the header
    pub fn avatar() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Year/date metadata
    pub fn year() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// Rating color by score out of 10
    pub fn rating(score: Option<f64>) -> Style {
        match score {
            Some(s) if s >= 7.5 => Theme::success(),
            Some(s) if s >= 6.0 => Theme::accent(),
            Some(_) => Theme::warning(),
            None => Theme::dimmed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // WCAG contrast helpers

    /// Relative luminance of a color
    /// Formula: https://www.w3.org/TR/WCAG20/#relativeluminancedef
    fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
        fn channel_luminance(c: u8) -> f64 {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }

        0.2126 * channel_luminance(r) + 0.7152 * channel_luminance(g) + 0.0722 * channel_luminance(b)
    }

    /// Contrast ratio between two colors, from 1 (same) to 21 (black/white).
    /// WCAG AA requires >= 4.5:1 for normal text, >= 3:1 for large text.
    fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
        let l1 = relative_luminance(fg.0, fg.1, fg.2);
        let l2 = relative_luminance(bg.0, bg.1, bg.2);

        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };

        (lighter + 0.05) / (darker + 0.05)
    }

    fn meets_wcag_aa(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
        contrast_ratio(fg, bg) >= 4.5
    }

    fn meets_wcag_aa_large(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
        contrast_ratio(fg, bg) >= 3.0
    }

    /// RGB tuple of a ratatui Color (Rgb variant only)
    fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
        match color {
            Color::Rgb(r, g, b) => Some((r, g, b)),
            _ => None,
        }
    }

    fn rgb(color: Color) -> (u8, u8, u8) {
        color_to_rgb(color).expect("Theme colors should all be RGB")
    }

    #[test]
    fn test_all_theme_colors_are_rgb() {
        for color in [
            Theme::BACKGROUND,
            Theme::PRIMARY,
            Theme::SECONDARY,
            Theme::ACCENT,
            Theme::HIGHLIGHT,
            Theme::TEXT,
            Theme::DIM,
            Theme::SUCCESS,
            Theme::WARNING,
            Theme::ERROR,
            Theme::BACKGROUND_LIGHT,
            Theme::BACKGROUND_HOVER,
            Theme::BORDER,
        ] {
            assert!(color_to_rgb(color).is_some());
        }
    }

    #[test]
    fn test_text_contrast_against_background() {
        let bg = rgb(Theme::BACKGROUND);
        for color in [Theme::TEXT, Theme::SECONDARY, Theme::ACCENT, Theme::SUCCESS] {
            let ratio = contrast_ratio(rgb(color), bg);
            assert!(meets_wcag_aa(rgb(color), bg), "contrast {:.2}:1", ratio);
        }
    }

    #[test]
    fn test_brand_red_readable_as_large_text() {
        let bg = rgb(Theme::BACKGROUND);
        assert!(meets_wcag_aa_large(rgb(Theme::PRIMARY), bg));
        // White on red buttons
        assert!(meets_wcag_aa_large(rgb(Theme::TEXT), rgb(Theme::PRIMARY)));
    }

    #[test]
    fn test_contrast_ratio_bounds() {
        let black = (0, 0, 0);
        let white = (255, 255, 255);
        assert!((contrast_ratio(white, black) - 21.0).abs() < 0.01);
        assert!((contrast_ratio(black, black) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_rating_styles() {
        assert_eq!(Theme::rating(Some(8.1)), Theme::success());
        assert_eq!(Theme::rating(Some(6.5)), Theme::accent());
        assert_eq!(Theme::rating(Some(3.0)), Theme::warning());
        assert_eq!(Theme::rating(None), Theme::dimmed());
    }
}

//! The fixed text styles used by every document.
//!
//! None of the styles names a font family: documents are created with the run's
//! [`FontChoice`](crate::fonts::FontChoice) as their default family, so every style
//! renders in it.

use genpdf::style::Style;

/// Point sizes of the four content styles and the footer.
pub const TITLE_SIZE: u8 = 16;
pub const HEADING_SIZE: u8 = 12;
pub const BODY_SIZE: u8 = 9;
pub const CODE_SIZE: u8 = 7;
pub const FOOTER_SIZE: u8 = 8;

/// Named styles for the blocks of a chunk document.
#[derive(Clone, Copy, Debug)]
pub struct StyleSheet {
    pub title: Style,
    pub heading: Style,
    pub body: Style,
    pub code: Style,
    pub footer: Style,
}

impl StyleSheet {
    pub fn new() -> Self {
        let base = Style::new();
        Self {
            title: base.with_font_size(TITLE_SIZE).bold(),
            heading: base.with_font_size(HEADING_SIZE).bold(),
            body: base.with_font_size(BODY_SIZE),
            code: base.with_font_size(CODE_SIZE),
            footer: base.with_font_size(FOOTER_SIZE),
        }
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_hierarchy() {
        let styles = StyleSheet::new();
        assert_eq!(styles.title.font_size(), 16);
        assert_eq!(styles.heading.font_size(), 12);
        assert_eq!(styles.body.font_size(), 9);
        assert_eq!(styles.code.font_size(), 7);
        assert!(styles.title.is_bold());
        assert!(styles.heading.is_bold());
        assert!(!styles.code.is_bold());
    }
}

//! Layout elements that `genpdf` does not ship with.
//!
//! [`VerbatimText`] prints text line by line exactly as given, which is what file dumps,
//! paths and the footer need: whitespace is kept, nothing is re-flowed, and lines wider
//! than the page are broken at character boundaries instead of running off the edge.
//! With a built-in PDF font, characters outside Windows-1252 are printed as `?`.
//! [`FileMarker`] is an invisible element that records the page a file block starts on.

use genpdf::elements::Text;
use genpdf::error::Error;
use genpdf::fonts::FontCache;
use genpdf::style::{Style, StyledString};
use genpdf::{render, Alignment, Element, Mm, Position, RenderResult, Size};

use crate::builder::PageTracker;

/// Columns between tab stops when expanding tabs.
pub const TAB_WIDTH: usize = 4;

/// Preformatted text rendered one physical line at a time.
///
/// Lines are laid out on the first render call, once the available width is known, and the
/// element resumes from the first unprinted line when it continues on a new page.
pub struct VerbatimText {
    text: String,
    style: Style,
    alignment: Alignment,
    lines: Option<Vec<String>>,
    next_line: usize,
}

impl VerbatimText {
    /// Creates a left-aligned element for `text` in `style`.
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
            alignment: Alignment::Left,
            lines: None,
            next_line: 0,
        }
    }

    /// Sets the horizontal alignment of every line and returns the updated element.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

impl Element for VerbatimText {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let style = style.and(self.style);
        let font_cache = &context.font_cache;
        let available_width = area.size().width;
        let text = &self.text;
        let lines = self
            .lines
            .get_or_insert_with(|| layout_lines(text, available_width, style, font_cache));

        let line_height = style.line_height(font_cache);
        let mut result = RenderResult::default();

        while self.next_line < lines.len() {
            if line_height > area.size().height {
                result.has_more = true;
                return Ok(result);
            }

            let line = &lines[self.next_line];
            let mut line_width = Mm::default();
            if !line.is_empty() {
                let string = StyledString::new(line.clone(), style);
                line_width = string.width(font_cache);
                let x_offset = match self.alignment {
                    _ if line_width >= available_width => Mm::default(),
                    Alignment::Left => Mm::default(),
                    Alignment::Center => (available_width - line_width) / 2.0,
                    Alignment::Right => available_width - line_width,
                };
                let mut line_area = area.clone();
                line_area.add_offset(Position::new(x_offset, 0));
                Text::new(string).render(context, line_area, style)?;
            }

            area.add_offset(Position::new(0, line_height));
            result.size = result.size.stack_vertical(Size::new(line_width, line_height));
            self.next_line += 1;
        }

        Ok(result)
    }
}

/// Invisible, zero-sized element recording the page on which file `index` starts.
pub struct FileMarker {
    index: usize,
    tracker: PageTracker,
}

impl FileMarker {
    pub fn new(index: usize, tracker: PageTracker) -> Self {
        Self { index, tracker }
    }
}

impl Element for FileMarker {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        _area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        self.tracker.mark_file_start(self.index);
        Ok(RenderResult::default())
    }
}

fn layout_lines(text: &str, max_width: Mm, style: Style, font_cache: &FontCache) -> Vec<String> {
    let builtin = style.font(font_cache).is_builtin();
    let width_of = |s: &str| StyledString::new(s.to_owned(), style).width(font_cache);
    text.lines()
        .map(expand_tabs)
        .map(|line| if builtin { to_win_ansi(&line) } else { line })
        .flat_map(|line| split_to_width(&line, max_width, &width_of))
        .collect()
}

/// Replaces every character that has no Windows-1252 code with `?`.
///
/// Built-in PDF fonts can only print Windows-1252 text.
pub fn to_win_ansi(line: &str) -> String {
    let mut buffer = [0u8; 4];
    line.chars()
        .map(|ch| {
            let encoded =
                lopdf::Document::encode_text(Some("WinAnsiEncoding"), ch.encode_utf8(&mut buffer));
            if encoded.len() == 1 {
                ch
            } else {
                '?'
            }
        })
        .collect()
}

/// Replaces tabs with spaces up to the next multiple of [`TAB_WIDTH`] columns.
pub fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_owned();
    }

    let mut expanded = String::with_capacity(line.len() + TAB_WIDTH);
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let spaces = TAB_WIDTH - column % TAB_WIDTH;
            expanded.extend(std::iter::repeat(' ').take(spaces));
            column += spaces;
        } else {
            expanded.push(ch);
            column += 1;
        }
    }
    expanded
}

/// Breaks `line` into pieces no wider than `max_width` according to `width_of`.
///
/// Every piece holds at least one character, so a glyph wider than the page still
/// makes progress. An empty line stays a single empty piece.
pub fn split_to_width<F>(line: &str, max_width: Mm, width_of: F) -> Vec<String>
where
    F: Fn(&str) -> Mm,
{
    if line.is_empty() || width_of(line) <= max_width {
        return vec![line.to_owned()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_width = Mm::default();
    let mut buffer = [0u8; 4];

    for ch in line.chars() {
        let ch_width = width_of(ch.encode_utf8(&mut buffer));
        if !current.is_empty() && current_width + ch_width > max_width {
            pieces.push(std::mem::take(&mut current));
            current_width = Mm::default();
        }
        current.push(ch);
        current_width += ch_width;
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

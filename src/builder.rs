//! Document construction: paper, margins, metadata and the page-number footer.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use genpdf::error::{Error, ErrorKind};
use genpdf::style;
use genpdf::{self, Alignment, Element, Margins, Mm, PageDecorator, PaperSize, Position, Size};

use crate::elements::VerbatimText;
use crate::fonts::FontChoice;

/// Side margins of every page, in millimetres.
pub const PAGE_MARGIN_MM: i32 = 20;

/// Height of the band between the body and the bottom margin that holds the footer.
pub const FOOTER_BAND_MM: i32 = 10;

/// Footer label for a 1-based page number.
pub fn footer_text(page: usize) -> String {
    format!("Page {page}")
}

/// Right-aligned page-number footer element for `page`.
pub fn page_number_footer(page: usize, style: style::Style) -> VerbatimText {
    VerbatimText::new(footer_text(page), style).with_alignment(Alignment::Right)
}

/// Counts pages while a document is laid out and remembers where each file starts.
///
/// Cloning yields a handle to the same counters, so the page decorator and the
/// [`FileMarker`](crate::elements::FileMarker) elements of one document share state.
#[derive(Clone, Debug, Default)]
pub struct PageTracker {
    current: Rc<Cell<usize>>,
    file_starts: Rc<RefCell<Vec<Option<usize>>>>,
}

impl PageTracker {
    /// Creates a tracker for a document holding `files` file blocks.
    pub fn new(files: usize) -> Self {
        Self {
            current: Rc::new(Cell::new(0)),
            file_starts: Rc::new(RefCell::new(vec![None; files])),
        }
    }

    /// Advances to the next page and returns its 1-based number.
    pub fn next_page(&self) -> usize {
        let page = self.current.get() + 1;
        self.current.set(page);
        page
    }

    /// Number of pages started so far.
    pub fn page_count(&self) -> usize {
        self.current.get()
    }

    /// Records the current page as the start of file `index` unless already recorded.
    pub fn mark_file_start(&self, index: usize) {
        let page = self.current.get();
        let mut starts = self.file_starts.borrow_mut();
        if let Some(slot) = starts.get_mut(index) {
            slot.get_or_insert(page);
        }
    }

    /// Start page of every file block, in chunk order.
    pub fn file_starts(&self) -> Vec<Option<usize>> {
        self.file_starts.borrow().clone()
    }
}

type FooterFactory = dyn Fn(usize) -> Box<dyn Element>;

/// Definition of a footer rendered through the page decorator.
pub struct FooterSpec {
    height: Mm,
    factory: Box<FooterFactory>,
}

impl FooterSpec {
    /// Creates a footer of fixed `height` whose content is produced from the page number.
    pub fn new<F, E>(height: impl Into<Mm>, factory: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        Self {
            height: height.into(),
            factory: Box::new(move |page| Box::new(factory(page)) as Box<dyn Element>),
        }
    }
}

/// Builder for `genpdf::Document` instances pre-configured for chunk documents.
pub struct DocumentBuilder {
    paper_size: Size,
    margins: Margins,
    title: Option<String>,
    footer: Option<FooterSpec>,
    tracker: PageTracker,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4.into(),
            margins: Margins::trbl(
                PAGE_MARGIN_MM,
                PAGE_MARGIN_MM,
                PAGE_MARGIN_MM - FOOTER_BAND_MM,
                PAGE_MARGIN_MM,
            ),
            title: None,
            footer: None,
            tracker: PageTracker::default(),
        }
    }
}

impl DocumentBuilder {
    /// Creates a builder with A4 paper and 20mm margins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Configures a footer callback with a fixed height that is invoked for every page.
    pub fn with_footer<F, E>(mut self, height: impl Into<Mm>, footer: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        self.footer = Some(FooterSpec::new(height, footer));
        self
    }

    /// Uses `tracker` to count the pages of the built document.
    pub fn with_page_tracker(mut self, tracker: PageTracker) -> Self {
        self.tracker = tracker;
        self
    }

    /// Builds a document whose default font family is the run's font choice.
    pub fn build(self, font: &FontChoice) -> genpdf::Document {
        let mut document = genpdf::Document::new(font.family());
        document.set_paper_size(self.paper_size);
        document.set_minimal_conformance();
        if let Some(title) = self.title {
            document.set_title(title);
        }

        let decorator = FooterDecorator {
            tracker: self.tracker,
            margins: self.margins,
            footer: self.footer,
        };
        document.set_page_decorator(decorator);

        document
    }
}

struct FooterDecorator {
    tracker: PageTracker,
    margins: Margins,
    footer: Option<FooterSpec>,
}

impl PageDecorator for FooterDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        let page = self.tracker.next_page();
        area.add_margins(self.margins);

        if let Some(footer) = &self.footer {
            let available = area.size().height;
            if footer.height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - footer.height));
            let mut element = (footer.factory)(page);
            let result = element.render(context, footer_area, style)?;
            if result.has_more {
                return Err(Error::new(
                    "Footer element does not fit into the reserved space",
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - footer.height);
        }

        Ok(area)
    }
}

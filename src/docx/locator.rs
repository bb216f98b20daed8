//! Section boundary detection in WordprocessingML body markup.
//!
//! The locator walks the body with an XML event reader and records the byte
//! span of every outermost `w:sectPr` element, the span of its opening tag
//! and the spans of its direct `w:cols` children. Spans index into the
//! original string so callers can splice without re-serializing anything.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::ops::Range;

/// Qualified name of the section properties element.
pub const SECTION_TAG: &str = "w:sectPr";

/// Qualified name of the column configuration element.
pub const COLUMNS_TAG: &str = "w:cols";

/// One located section (`w:sectPr`) element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBlock<'a> {
    /// Byte offset of the opening `<` in the body markup
    pub start: usize,

    /// Byte offset one past the closing `>` in the body markup
    pub end: usize,

    /// Raw text of the whole element
    pub raw: &'a str,

    /// Length of the opening tag; equals `raw.len()` when self-closing
    pub open_tag_len: usize,

    /// Whether the element was written as `<w:sectPr/>`
    pub self_closing: bool,

    /// Spans of direct `w:cols` children, relative to `start`
    pub columns: Vec<Range<usize>>,

    /// `w:num` of the first `w:cols` child (1 when the attribute is absent)
    pub declared_columns: Option<u32>,
}

impl<'a> SectionBlock<'a> {
    /// Byte range of the block in the body markup.
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether the block already carries a column configuration.
    pub fn has_columns(&self) -> bool {
        !self.columns.is_empty()
    }

    /// The opening tag text.
    pub fn open_tag(&self) -> &'a str {
        &self.raw[..self.open_tag_len]
    }
}

/// Section being collected while the reader is inside it.
struct OpenSection {
    start: usize,
    open_tag_end: usize,
    depth: usize,
    columns: Vec<Range<usize>>,
    pending_columns: Option<usize>,
    declared_columns: Option<u32>,
}

impl OpenSection {
    fn new(start: usize, open_tag_end: usize) -> Self {
        Self {
            start,
            open_tag_end,
            depth: 0,
            columns: Vec::new(),
            pending_columns: None,
            declared_columns: None,
        }
    }

    fn note_declared(&mut self, tag: &BytesStart<'_>) {
        self.declared_columns
            .get_or_insert_with(|| attr_u32(tag, b"w:num").unwrap_or(1));
    }

    fn record_columns(&mut self, span: Range<usize>, tag: &BytesStart<'_>) {
        self.note_declared(tag);
        self.columns.push(span.start - self.start..span.end - self.start);
    }
}

/// Lazy iterator over the section blocks of a body markup string.
///
/// Yields blocks in document order. Nested `w:sectPr` elements (such as the
/// previous properties kept in `w:sectPrChange`) belong to their enclosing
/// block. Unbalanced markers end the iteration with [`Error::Structural`].
///
/// # Example
///
/// ```
/// use twocol::docx::SectionLocator;
///
/// let body = r#"<w:body><w:p/><w:sectPr w:rsidR="00A1"><w:pgSz w:w="12240"/></w:sectPr></w:body>"#;
/// let blocks: Vec<_> = SectionLocator::new(body).collect::<Result<_, _>>().unwrap();
/// assert_eq!(blocks.len(), 1);
/// assert!(!blocks[0].has_columns());
/// ```
pub struct SectionLocator<'a> {
    markup: &'a str,
    reader: Reader<&'a [u8]>,
    finished: bool,
}

impl<'a> SectionLocator<'a> {
    /// Create a locator over body markup.
    pub fn new(markup: &'a str) -> Self {
        let reader = Reader::from_str(markup);
        Self {
            markup,
            reader,
            finished: false,
        }
    }

    /// Offset of the `<` that starts the tag ending at `tag_end`.
    ///
    /// `<` cannot appear unescaped inside a tag, so the nearest one before
    /// the end is the tag start.
    fn tag_start(&self, tag_end: usize) -> usize {
        self.markup[..tag_end].rfind('<').unwrap_or(0)
    }

    fn block(&self, open: OpenSection, end: usize, self_closing: bool) -> SectionBlock<'a> {
        SectionBlock {
            start: open.start,
            end,
            raw: &self.markup[open.start..end],
            open_tag_len: open.open_tag_end - open.start,
            self_closing,
            columns: open.columns,
            declared_columns: open.declared_columns,
        }
    }

    fn next_block(&mut self) -> Result<Option<SectionBlock<'a>>> {
        let mut open: Option<OpenSection> = None;

        loop {
            let event = self.reader.read_event()?;
            let pos = self.reader.buffer_position();

            match event {
                Event::Start(e) => {
                    let name = e.name();
                    match open.as_mut() {
                        None if name.as_ref() == SECTION_TAG.as_bytes() => {
                            open = Some(OpenSection::new(self.tag_start(pos), pos));
                        }
                        None => {}
                        Some(section) => {
                            if section.depth == 0 && name.as_ref() == COLUMNS_TAG.as_bytes() {
                                section.pending_columns = Some(self.tag_start(pos));
                                section.note_declared(&e);
                            }
                            section.depth += 1;
                        }
                    }
                }
                Event::Empty(e) => {
                    let name = e.name();
                    match open.as_mut() {
                        None if name.as_ref() == SECTION_TAG.as_bytes() => {
                            let start = self.tag_start(pos);
                            return Ok(Some(self.block(OpenSection::new(start, pos), pos, true)));
                        }
                        None => {}
                        Some(section) => {
                            if section.depth == 0 && name.as_ref() == COLUMNS_TAG.as_bytes() {
                                let start = self.tag_start(pos);
                                section.record_columns(start..pos, &e);
                            }
                        }
                    }
                }
                Event::End(e) => {
                    let name = e.name();
                    match open.take() {
                        None if name.as_ref() == SECTION_TAG.as_bytes() => {
                            return Err(Error::Structural(format!(
                                "closing </{}> at byte {} without a matching opening tag",
                                SECTION_TAG,
                                self.tag_start(pos)
                            )));
                        }
                        None => {}
                        // The reader rejects mismatched end names, so depth 0
                        // can only be closed by the section's own end tag.
                        Some(section) if section.depth == 0 => {
                            return Ok(Some(self.block(section, pos, false)));
                        }
                        Some(mut section) => {
                            section.depth -= 1;
                            if section.depth == 0 && name.as_ref() == COLUMNS_TAG.as_bytes() {
                                if let Some(start) = section.pending_columns.take() {
                                    section.columns.push(start - section.start..pos - section.start);
                                }
                            }
                            open = Some(section);
                        }
                    }
                }
                Event::Eof => {
                    return match open {
                        Some(section) => Err(Error::Structural(format!(
                            "<{}> opened at byte {} is never closed",
                            SECTION_TAG, section.start
                        ))),
                        None => Ok(None),
                    };
                }
                _ => {}
            }
        }
    }
}

impl<'a> Iterator for SectionLocator<'a> {
    type Item = Result<SectionBlock<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_block() {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Locate every section block, failing on the first structural error.
pub fn locate_sections(markup: &str) -> Result<Vec<SectionBlock<'_>>> {
    SectionLocator::new(markup).collect()
}

fn attr_u32(e: &BytesStart<'_>, key: &[u8]) -> Option<u32> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| std::str::from_utf8(&a.value).ok()?.trim().parse().ok())
}

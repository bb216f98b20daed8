//! Flattens `.docx` body content into simple HTML.

use super::{DocumentLoader, FlattenedDocument};
use crate::docx::DocumentArchive;
use crate::error::Result;
use crate::html::escape_text;
use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const CORE_PROPS_PART: &str = "docProps/core.xml";

/// Alternate rendering of drawing content, duplicating `mc:Choice`.
const FALLBACK_TAG: &[u8] = b"mc:Fallback";

/// Converts a `.docx` package into paragraphs and headings.
///
/// Paragraph styles `Title` and `Heading1`–`Heading6` become `<h1>`–`<h6>`;
/// bold and italic runs become `<strong>` and `<em>`. Tables, images and
/// other content are reduced to their text.
#[derive(Debug, Clone, Default)]
pub struct DocxFlattener {
    _private: (),
}

/// Paragraph being collected.
#[derive(Default)]
struct ParagraphState {
    heading: Option<u8>,
    content: String,
}

/// Formatting of the current run.
#[derive(Default)]
struct RunState {
    bold: bool,
    italic: bool,
}

impl DocxFlattener {
    /// Create a new DOCX flattener.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Flatten body markup (`word/document.xml`) into HTML.
    ///
    /// Paragraphs nested inside a run (text boxes) are emitted on their own
    /// and the enclosing paragraph keeps collecting once they close. Only the
    /// `mc:Choice` branch of alternate content is read.
    pub fn flatten_body(&self, body: &str) -> Result<String> {
        let mut reader = Reader::from_str(body);
        let mut html = String::with_capacity(body.len() / 4);
        let mut paragraphs: Vec<ParagraphState> = Vec::new();
        let mut runs: Vec<RunState> = Vec::new();
        let mut in_text = false;
        let mut skip_depth = 0usize;

        loop {
            let event = reader.read_event()?;
            if skip_depth > 0 {
                match event {
                    Event::Start(_) => skip_depth += 1,
                    Event::End(_) => skip_depth -= 1,
                    Event::Eof => break,
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(e) => match e.name().as_ref() {
                    FALLBACK_TAG => skip_depth = 1,
                    b"w:p" => paragraphs.push(ParagraphState::default()),
                    b"w:r" => runs.push(RunState::default()),
                    b"w:t" => in_text = true,
                    _ => apply_property(&e, paragraphs.last_mut(), runs.last_mut()),
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"w:br" | b"w:cr" => {
                        if let Some(p) = paragraphs.last_mut() {
                            p.content.push_str("<br>");
                        }
                    }
                    b"w:tab" => {
                        if let Some(p) = paragraphs.last_mut() {
                            p.content.push(' ');
                        }
                    }
                    _ => apply_property(&e, paragraphs.last_mut(), runs.last_mut()),
                },
                Event::Text(e) if in_text => {
                    let text = e.unescape()?;
                    if let Some(p) = paragraphs.last_mut() {
                        let escaped = escape_text(&text);
                        let (bold, italic) = runs
                            .last()
                            .map(|r| (r.bold, r.italic))
                            .unwrap_or_default();
                        match (bold, italic) {
                            (true, true) => {
                                p.content.push_str(&format!("<strong><em>{}</em></strong>", escaped))
                            }
                            (true, false) => {
                                p.content.push_str(&format!("<strong>{}</strong>", escaped))
                            }
                            (false, true) => p.content.push_str(&format!("<em>{}</em>", escaped)),
                            (false, false) => p.content.push_str(&escaped),
                        }
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"w:t" => in_text = false,
                    b"w:r" => {
                        runs.pop();
                    }
                    b"w:p" => {
                        if let Some(p) = paragraphs.pop() {
                            push_paragraph(&mut html, p);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(html)
    }

    fn title(&self, archive: &DocumentArchive) -> Option<String> {
        let core = std::str::from_utf8(archive.get(CORE_PROPS_PART)?).ok()?;
        let mut reader = Reader::from_str(core);
        let mut in_title = false;
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if e.name().as_ref() == b"dc:title" => in_title = true,
                Ok(Event::Text(e)) if in_title => {
                    let title = e.unescape().ok()?.trim().to_string();
                    return (!title.is_empty()).then_some(title);
                }
                Ok(Event::End(e)) if e.name().as_ref() == b"dc:title" => return None,
                Ok(Event::Eof) | Err(_) => return None,
                _ => {}
            }
        }
    }
}

fn push_paragraph(html: &mut String, p: ParagraphState) {
    if p.content.trim().is_empty() {
        return;
    }
    match p.heading {
        Some(level) => html.push_str(&format!("<h{0}>{1}</h{0}>\n", level, p.content)),
        None => html.push_str(&format!("<p>{}</p>\n", p.content)),
    }
}

/// Record paragraph style or run formatting carried by a property element.
fn apply_property(
    e: &BytesStart<'_>,
    paragraph: Option<&mut ParagraphState>,
    run: Option<&mut RunState>,
) {
    match e.name().as_ref() {
        b"w:pStyle" => {
            if let (Some(p), Some(style)) = (paragraph, attr(e, b"w:val")) {
                p.heading = heading_level(&style);
            }
        }
        b"w:b" => {
            if let Some(r) = run {
                r.bold = is_on(e);
            }
        }
        b"w:i" => {
            if let Some(r) = run {
                r.italic = is_on(e);
            }
        }
        _ => {}
    }
}

/// Heading level for a paragraph style id.
fn heading_level(style: &str) -> Option<u8> {
    let lower = style.to_ascii_lowercase();
    match lower.as_str() {
        "title" => Some(1),
        "subtitle" => Some(2),
        _ => lower
            .strip_prefix("heading")
            .and_then(|n| n.trim().parse::<u8>().ok())
            .filter(|n| (1..=6).contains(n)),
    }
}

/// Toggle properties are on unless `w:val` says otherwise.
fn is_on(e: &BytesStart<'_>) -> bool {
    !matches!(attr(e, b"w:val").as_deref(), Some("0" | "false" | "off"))
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| String::from_utf8(a.value.to_vec()).ok())
}

#[async_trait]
impl DocumentLoader for DocxFlattener {
    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn name(&self) -> &str {
        "docx"
    }

    async fn flatten(&self, data: &[u8]) -> Result<FlattenedDocument> {
        let archive = DocumentArchive::from_bytes(data)?;
        archive.validate()?;
        let markup = self.flatten_body(&archive.body()?)?;

        let mut doc = FlattenedDocument::new(markup);
        if let Some(title) = self.title(&archive) {
            doc = doc.with_title(title);
        }
        Ok(doc)
    }
}

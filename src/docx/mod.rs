//! Structured-markup path: column directives inside `.docx` packages.
//!
//! The body part (`word/document.xml`) is scanned for section properties
//! (`w:sectPr`). Each one receives a single `w:cols` element describing the
//! configured column layout; everything else in the package is left as is.
//!
//! # Example
//!
//! ```no_run
//! use twocol::docx::ContainerRewriter;
//! use twocol::ColumnLayout;
//!
//! fn main() -> twocol::Result<()> {
//!     let data = std::fs::read("book.docx")?;
//!     let (output, report) = ContainerRewriter::new(&ColumnLayout::default()).rewrite_bytes(&data)?;
//!     std::fs::write("book-2columns.docx", output)?;
//!     println!("{} sections", report.sections);
//!     Ok(())
//! }
//! ```

mod archive;
mod directive;
mod injector;
mod locator;
mod rewriter;

pub use archive::{
    DocumentArchive, BODY_PART, CONTENT_TYPES_PART, DOCUMENT_RELS_PART, REQUIRED_PARTS,
};
pub use directive::ColumnDirective;
pub use injector::{ColumnDirectiveInjector, Injection, InjectionReport};
pub use locator::{locate_sections, SectionBlock, SectionLocator, COLUMNS_TAG, SECTION_TAG};
pub use rewriter::ContainerRewriter;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Read-only description of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSummary {
    /// 1-based position in the document
    pub index: usize,

    /// Byte offset of the section in the body part
    pub start: usize,

    /// Byte offset one past the end of the section
    pub end: usize,

    /// Number of columns currently declared (1 when unspecified)
    pub columns: u32,

    /// Number of `w:cols` elements in the section
    pub column_elements: usize,
}

/// Describe the sections of a package without modifying it.
pub fn inspect(data: &[u8]) -> Result<Vec<SectionSummary>> {
    let archive = DocumentArchive::from_bytes(data)?;
    archive.validate()?;
    let body = archive.body()?;
    inspect_markup(&body)
}

/// Describe the sections of body markup.
pub fn inspect_markup(markup: &str) -> Result<Vec<SectionSummary>> {
    SectionLocator::new(markup)
        .enumerate()
        .map(|(i, block)| {
            let block = block?;
            Ok(SectionSummary {
                index: i + 1,
                start: block.start,
                end: block.end,
                columns: block.declared_columns.unwrap_or(1),
                column_elements: block.columns.len(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_markup() {
        let body = concat!(
            "<w:body>",
            "<w:p><w:pPr><w:sectPr><w:cols w:num=\"3\"/></w:sectPr></w:pPr></w:p>",
            "<w:sectPr><w:pgSz/></w:sectPr>",
            "</w:body>"
        );
        let sections = inspect_markup(body).unwrap();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].index, 1);
        assert_eq!(sections[0].columns, 3);
        assert_eq!(sections[0].column_elements, 1);
        assert_eq!(sections[1].columns, 1);
        assert_eq!(sections[1].column_elements, 0);
    }

    #[test]
    fn test_inspect_markup_malformed() {
        let result = inspect_markup("<w:body><w:sectPr></w:body>");
        assert!(result.is_err());
    }
}

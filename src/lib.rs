//! # twocol
//!
//! Reflow word-processing documents into a two-column page layout.
//!
//! Two paths are available:
//!
//! - **Document package** (`.docx` → `.docx`): every section of the body
//!   receives a column directive (`w:cols`). Existing column settings are
//!   replaced, all other content is kept byte-for-byte.
//! - **Rendered markup** (`.docx`/`.html` → `.html`/`.pdf`): the content is
//!   flattened and wrapped in a template that declares a two-column flow.
//!
//! ## Quick Start
//!
//! ```no_run
//! use twocol::{apply_columns, ColumnLayout};
//!
//! fn main() -> twocol::Result<()> {
//!     let data = std::fs::read("book.docx")?;
//!     let (output, report) = apply_columns(&data, &ColumnLayout::default())?;
//!     std::fs::write("book-2columns.docx", output)?;
//!     println!("Sections modified: {}", report.sections);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Section-aware rewriting**: replaces or inserts `w:cols` per section
//! - **Idempotent**: converting twice gives the same body markup
//! - **HTML and PDF output**: two-column print stylesheet, headless browser
//! - **Pluggable loaders and renderers**: async traits for other formats

pub mod convert;
pub mod detect;
pub mod docx;
pub mod error;
pub mod html;
pub mod load;
pub mod options;
pub mod render;

// Re-export commonly used types
pub use convert::{ConvertOptions, ConvertReport, Converter, OutputFormat};
pub use detect::{detect_format_from_bytes, detect_format_from_path, InputFormat};
pub use docx::{
    ColumnDirective, ColumnDirectiveInjector, ContainerRewriter, DocumentArchive,
    InjectionReport, SectionBlock, SectionLocator, SectionSummary,
};
pub use error::{Error, Result};
pub use html::ColumnStyleTemplate;
pub use load::{DocumentLoader, FlattenedDocument, LoaderRegistry};
pub use options::{ColumnLayout, LayoutOptions, PageStyle};
pub use render::{ChromiumRenderer, PassThroughRenderer, RenderOutput, Renderer};

use std::path::Path;

/// Apply a column layout to `.docx` package bytes.
///
/// # Example
///
/// ```no_run
/// use twocol::{apply_columns, ColumnLayout};
///
/// let data = std::fs::read("book.docx").unwrap();
/// let (output, report) = apply_columns(&data, &ColumnLayout::default()).unwrap();
/// assert!(report.sections >= 1);
/// ```
pub fn apply_columns(data: &[u8], layout: &ColumnLayout) -> Result<(Vec<u8>, InjectionReport)> {
    ContainerRewriter::new(layout).rewrite_bytes(data)
}

/// Apply a column layout to body markup (`word/document.xml`).
pub fn apply_columns_to_markup(markup: &str, layout: &ColumnLayout) -> Result<docx::Injection> {
    ColumnDirectiveInjector::new(layout).inject(markup)
}

/// Wrap flattened content in the default two-column HTML document.
///
/// # Example
///
/// ```
/// let html = twocol::to_two_column_html("<p>Hello</p>");
/// assert!(html.contains("<p>Hello</p>"));
/// ```
pub fn to_two_column_html(content: &str) -> String {
    ColumnStyleTemplate::default().wrap(content)
}

/// Describe the sections of a `.docx` file.
pub fn inspect_file<P: AsRef<Path>>(path: P) -> Result<Vec<SectionSummary>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }
    let data = std::fs::read(path)?;
    if data.is_empty() {
        return Err(Error::EmptyInput(path.to_path_buf()));
    }
    docx::inspect(&data)
}

/// Convert a file with the given options.
///
/// # Example
///
/// ```no_run
/// use twocol::{convert_file, ConvertOptions, OutputFormat};
///
/// # async fn run() -> twocol::Result<()> {
/// let report = convert_file("book.docx", ConvertOptions::new().with_format(OutputFormat::Html)).await?;
/// println!("{} bytes written", report.output_size);
/// # Ok(())
/// # }
/// ```
pub async fn convert_file<P: AsRef<Path>>(path: P, options: ConvertOptions) -> Result<ConvertReport> {
    Converter::new(options).convert(path).await
}

//! Conversion pipeline: read, transform, render, write.
//!
//! A [`Converter`] runs the stages one after another for a single input
//! file. The transformation itself is synchronous; only reading, external
//! rendering and writing are awaited.
//!
//! # Example
//!
//! ```no_run
//! use twocol::convert::{ConvertOptions, Converter, OutputFormat};
//!
//! # async fn run() -> twocol::Result<()> {
//! let converter = Converter::new(ConvertOptions::new().with_format(OutputFormat::Docx));
//! let report = converter.convert("book.docx").await?;
//! println!("{} -> {}", report.input.display(), report.output.display());
//! # Ok(())
//! # }
//! ```

mod pipeline;

pub use pipeline::{default_output_path, Converter};

use crate::docx::InjectionReport;
use crate::options::LayoutOptions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output format for conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Rewritten document package
    #[default]
    Docx,

    /// Standalone two-column HTML document
    Html,

    /// PDF rendered from the HTML document
    Pdf,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Html => "html",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "docx" => Some(OutputFormat::Docx),
            "html" | "htm" => Some(OutputFormat::Html),
            "pdf" => Some(OutputFormat::Pdf),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Column and page layout
    pub layout: LayoutOptions,

    /// Output format
    pub output_format: OutputFormat,

    /// Output path (derived from the input when unset)
    pub output_path: Option<PathBuf>,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the output path.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }
}

/// Summary of a finished conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertReport {
    /// Input file
    pub input: PathBuf,

    /// Output file
    pub output: PathBuf,

    /// Output format
    pub format: OutputFormat,

    /// Input size in bytes
    pub input_size: u64,

    /// Output size in bytes
    pub output_size: u64,

    /// Section statistics (document package output only)
    pub sections: Option<InjectionReport>,

    /// Completion time
    pub finished_at: DateTime<Utc>,
}

impl ConvertReport {
    /// Number of sections carrying the column directive, if applicable.
    pub fn section_count(&self) -> Option<usize> {
        self.sections.as_ref().map(|s| s.sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_format(OutputFormat::Pdf)
            .with_output("out.pdf");

        assert_eq!(options.output_format, OutputFormat::Pdf);
        assert_eq!(options.output_path, Some(PathBuf::from("out.pdf")));
        assert_eq!(options.layout.columns.count, 2);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            OutputFormat::from_path(Path::new("a/b.DOCX")),
            Some(OutputFormat::Docx)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("b.htm")),
            Some(OutputFormat::Html)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("b.pdf")),
            Some(OutputFormat::Pdf)
        );
        assert_eq!(OutputFormat::from_path(Path::new("b.txt")), None);
        assert_eq!(OutputFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_format_serializes_lowercase() {
        let json = serde_json::to_string(&OutputFormat::Html).unwrap();
        assert_eq!(json, "\"html\"");
    }
}

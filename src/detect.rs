//! Input format detection.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Recognized input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// ZIP-based word-processing package (`.docx`)
    Docx,
    /// Legacy binary Word document (OLE2 compound file)
    LegacyDoc,
    /// HTML or other flattened markup
    Html,
}

impl InputFormat {
    /// Whether the structured (section-aware) path can handle this format.
    pub fn is_structured(&self) -> bool {
        matches!(self, InputFormat::Docx)
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InputFormat::Docx => "DOCX",
            InputFormat::LegacyDoc => "DOC (legacy)",
            InputFormat::Html => "HTML",
        };
        f.write_str(name)
    }
}

/// ZIP local file header: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// OLE2 compound file header
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const HEADER_LEN: usize = 512;

/// Detect the format of a file.
///
/// # Example
/// ```no_run
/// use twocol::detect::{detect_format_from_path, InputFormat};
///
/// let format = detect_format_from_path("book.docx").unwrap();
/// assert_eq!(format, InputFormat::Docx);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<InputFormat> {
    let mut file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_LEN);
    file.by_ref().take(HEADER_LEN as u64).read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the format from the leading bytes of a file.
///
/// # Returns
/// * `Ok(InputFormat)` for packages, legacy documents and markup
/// * `Err(Error::Conversion)` for anything else
pub fn detect_format_from_bytes(data: &[u8]) -> Result<InputFormat> {
    if data.starts_with(ZIP_MAGIC) {
        return Ok(InputFormat::Docx);
    }
    if data.starts_with(OLE_MAGIC) {
        return Ok(InputFormat::LegacyDoc);
    }
    if looks_like_markup(data) {
        return Ok(InputFormat::Html);
    }
    Err(Error::Conversion("unsupported input format".to_string()))
}

/// Check whether bytes start with a markup tag, ignoring a BOM and whitespace.
fn looks_like_markup(data: &[u8]) -> bool {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    data.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'<')
}

/// Check if bytes look like a `.docx` package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    matches!(detect_format_from_bytes(data), Ok(InputFormat::Docx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_zip() {
        let data = b"PK\x03\x04\x14\x00\x06\x00";
        assert_eq!(detect_format_from_bytes(data).unwrap(), InputFormat::Docx);
        assert!(is_docx_bytes(data));
    }

    #[test]
    fn test_detect_legacy_doc() {
        let data = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00];
        let format = detect_format_from_bytes(&data).unwrap();
        assert_eq!(format, InputFormat::LegacyDoc);
        assert!(!format.is_structured());
    }

    #[test]
    fn test_detect_html() {
        assert_eq!(
            detect_format_from_bytes(b"\xEF\xBB\xBF  <!DOCTYPE html>").unwrap(),
            InputFormat::Html
        );
        assert_eq!(
            detect_format_from_bytes(b"<p>Hello</p>").unwrap(),
            InputFormat::Html
        );
    }

    #[test]
    fn test_detect_unknown() {
        assert!(matches!(
            detect_format_from_bytes(b"%PDF-1.7"),
            Err(Error::Conversion(_))
        ));
        assert!(detect_format_from_bytes(b"").is_err());
    }
}

//! Error types for twocol library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for twocol operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// The input path does not exist.
    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// The input file exists but has zero length.
    #[error("Input file is empty: {}", .0.display())]
    EmptyInput(PathBuf),

    /// The document package or its body markup is not structurally valid.
    #[error("Invalid document structure: {0}")]
    Structural(String),

    /// Decoding the input or rendering the output failed.
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// The output file was not created.
    #[error("Output file was not written: {}", .0.display())]
    OutputWrite(PathBuf),

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Stable category name, used in user-facing reports.
    pub fn category(&self) -> &'static str {
        match self {
            Error::MissingInput(_) => "MissingInputError",
            Error::EmptyInput(_) => "EmptyInputError",
            Error::Structural(_) => "StructuralError",
            Error::Conversion(_) => "ConversionError",
            Error::OutputWrite(_) => "OutputWriteError",
            Error::Io(_) => "IoError",
        }
    }

    /// Suggested steps for the user to resolve the failure.
    pub fn remediation(&self) -> &'static [&'static str] {
        match self {
            Error::MissingInput(_) => &[
                "Check that the file name is spelled exactly right",
                "Check that the file is in the directory you are running from",
                "Pass an absolute path if the file lives elsewhere",
            ],
            Error::EmptyInput(_) => &[
                "Re-export the document from your word processor",
                "Check that the file was fully copied or downloaded",
            ],
            Error::Structural(_) => &[
                "Make sure the input is a valid .docx document",
                "Open it in your word processor and save it again as .docx",
                "Check that the file is not corrupted",
            ],
            Error::Conversion(_) => &[
                "Legacy .doc files must be saved as .docx first",
                "Remove password protection before converting",
                "For PDF output, check that Chrome or Chromium is installed",
            ],
            Error::OutputWrite(_) => &[
                "Check that the output directory exists and is writable",
                "Close the output file if it is open in another program",
            ],
            Error::Io(_) => &[
                "Check file permissions",
                "Check that the file is not open in another program",
            ],
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::UnsupportedArchive(msg) => {
                Error::Conversion(format!("unsupported package: {}", msg))
            }
            _ => Error::Structural(format!("not a valid document package: {}", err)),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Structural(format!("malformed body markup: {}", err))
    }
}

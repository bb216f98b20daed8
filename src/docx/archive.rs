//! In-memory document package.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Body part holding the document content.
pub const BODY_PART: &str = "word/document.xml";

/// Package content-types manifest.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Relationship manifest of the body part.
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Entries a package must contain before it is rewritten.
pub const REQUIRED_PARTS: [&str; 3] = [BODY_PART, CONTENT_TYPES_PART, DOCUMENT_RELS_PART];

/// A word-processing package held in memory as part name → payload.
///
/// Directory entries keep their trailing `/` and an empty payload. Entries
/// are written back in the order they were read.
#[derive(Debug, Clone, Default)]
pub struct DocumentArchive {
    entries: IndexMap<String, Vec<u8>>,
}

impl DocumentArchive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a package from its compressed bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut zip = ZipArchive::new(Cursor::new(data))?;
        let mut entries = IndexMap::with_capacity(zip.len());

        for i in 0..zip.len() {
            let mut file = zip.by_index(i)?;
            if file.encrypted() {
                return Err(Error::Conversion(
                    "document is password protected".to_string(),
                ));
            }

            let name = file.name().to_string();
            // Declared sizes are not trusted for allocation.
            let mut payload = Vec::new();
            if !file.is_dir() {
                file.read_to_end(&mut payload)?;
            }
            entries.insert(name, payload);
        }

        log::debug!("Loaded package with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Number of entries, directories included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Payload of an entry.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(|v| v.as_slice())
    }

    /// Entry names in package order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    /// Add or replace an entry. Replacing keeps the entry's position.
    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.entries.insert(name.into(), data.into());
    }

    /// Names of required parts that are missing.
    pub fn missing_parts(&self) -> Vec<&'static str> {
        REQUIRED_PARTS
            .iter()
            .copied()
            .filter(|part| !self.contains(part))
            .collect()
    }

    /// Check that every required part is present.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_parts();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Structural(format!(
                "not a valid Word document, missing: {}",
                missing.join(", ")
            )))
        }
    }

    /// The body markup as text.
    pub fn body(&self) -> Result<String> {
        let data = self
            .get(BODY_PART)
            .ok_or_else(|| Error::Structural(format!("missing {}", BODY_PART)))?;
        String::from_utf8(data.to_vec())
            .map_err(|e| Error::Structural(format!("{} is not valid UTF-8: {}", BODY_PART, e)))
    }

    /// Serialize the package with DEFLATE compression.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, data) in &self.entries {
            if name.ends_with('/') {
                writer.add_directory(name.as_str(), options)?;
            } else {
                writer.start_file(name.as_str(), options)?;
                writer.write_all(data)?;
            }
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentArchive {
        let mut archive = DocumentArchive::new();
        archive.insert(CONTENT_TYPES_PART, b"<Types/>".to_vec());
        archive.insert("word/", Vec::new());
        archive.insert(BODY_PART, b"<w:document><w:body/></w:document>".to_vec());
        archive.insert(DOCUMENT_RELS_PART, b"<Relationships/>".to_vec());
        archive
    }

    #[test]
    fn test_bytes_round_trip_keeps_entries() {
        let archive = sample();
        let bytes = archive.to_bytes().unwrap();
        let decoded = DocumentArchive::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.len(), 4);
        assert!(decoded.contains("word/"));
        assert_eq!(decoded.get(CONTENT_TYPES_PART), Some(&b"<Types/>"[..]));
        let names: Vec<_> = decoded.names().collect();
        assert_eq!(names[0], CONTENT_TYPES_PART);
    }

    #[test]
    fn test_validate_reports_missing_parts() {
        let mut archive = DocumentArchive::new();
        archive.insert(BODY_PART, Vec::new());

        let missing = archive.missing_parts();
        assert_eq!(missing, vec![CONTENT_TYPES_PART, DOCUMENT_RELS_PART]);
        assert!(matches!(archive.validate(), Err(Error::Structural(_))));
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut archive = sample();
        archive.insert(BODY_PART, b"new".to_vec());
        let names: Vec<_> = archive.names().collect();
        assert_eq!(names[2], BODY_PART);
        assert_eq!(archive.get(BODY_PART), Some(&b"new"[..]));
    }

    #[test]
    fn test_body_must_be_utf8() {
        let mut archive = sample();
        archive.insert(BODY_PART, vec![0xff, 0xfe]);
        assert!(matches!(archive.body(), Err(Error::Structural(_))));
    }

    #[test]
    fn test_oversized_declared_length_is_not_preallocated() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(b"hi").unwrap();
        let mut data = zip.finish().unwrap().into_inner();

        // Claim an uncompressed size of ~2 GiB in both headers.
        let huge = 0x7FFF_FFF0u32.to_le_bytes();
        data[22..26].copy_from_slice(&huge);
        let central = data
            .windows(4)
            .position(|w| w == b"PK\x01\x02")
            .unwrap();
        data[central + 24..central + 28].copy_from_slice(&huge);

        if let Ok(archive) = DocumentArchive::from_bytes(&data) {
            assert_eq!(archive.get(BODY_PART), Some(&b"hi"[..]));
        }
    }

    #[test]
    fn test_garbage_is_not_a_package() {
        let result = DocumentArchive::from_bytes(b"definitely not a zip file");
        assert!(matches!(result, Err(Error::Structural(_))));
    }
}

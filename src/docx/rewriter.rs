//! Package-level rewrite: validate, transform the body, serialize.

use super::archive::{DocumentArchive, BODY_PART};
use super::injector::{ColumnDirectiveInjector, InjectionReport};
use crate::error::Result;
use crate::options::ColumnLayout;

/// Applies a column layout to a whole document package.
///
/// Only the body part changes; every other entry is written back with the
/// same payload.
#[derive(Debug, Clone, Default)]
pub struct ContainerRewriter {
    injector: ColumnDirectiveInjector,
}

impl ContainerRewriter {
    /// Create a rewriter for a column layout.
    pub fn new(layout: &ColumnLayout) -> Self {
        Self {
            injector: ColumnDirectiveInjector::new(layout),
        }
    }

    /// Create a rewriter around an existing injector.
    pub fn with_injector(injector: ColumnDirectiveInjector) -> Self {
        Self { injector }
    }

    /// Replace the body part of a validated archive.
    pub fn replace_body(&self, archive: &mut DocumentArchive, body: String) -> Result<()> {
        archive.validate()?;
        archive.insert(BODY_PART, body.into_bytes());
        Ok(())
    }

    /// Inject the column directive into the archive's body in place.
    pub fn apply(&self, archive: &mut DocumentArchive) -> Result<InjectionReport> {
        archive.validate()?;
        log::info!("Document structure verified");

        let body = archive.body()?;
        let injection = self.injector.inject(&body)?;
        self.replace_body(archive, injection.markup)?;
        Ok(injection.report)
    }

    /// Decode a package, apply the layout and serialize it again.
    pub fn rewrite_bytes(&self, data: &[u8]) -> Result<(Vec<u8>, InjectionReport)> {
        let mut archive = DocumentArchive::from_bytes(data)?;
        let report = self.apply(&mut archive)?;
        let bytes = archive.to_bytes()?;
        Ok((bytes, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::archive::{CONTENT_TYPES_PART, DOCUMENT_RELS_PART};
    use crate::error::Error;

    fn archive_with_body(body: &str) -> DocumentArchive {
        let mut archive = DocumentArchive::new();
        archive.insert(CONTENT_TYPES_PART, b"<Types/>".to_vec());
        archive.insert(DOCUMENT_RELS_PART, b"<Relationships/>".to_vec());
        archive.insert("word/styles.xml", b"<w:styles/>".to_vec());
        archive.insert(BODY_PART, body.as_bytes().to_vec());
        archive
    }

    #[test]
    fn test_apply_only_touches_body() {
        let mut archive = archive_with_body("<w:body><w:sectPr/></w:body>");
        let report = ContainerRewriter::default().apply(&mut archive).unwrap();

        assert_eq!(report.sections, 1);
        assert_eq!(archive.get("word/styles.xml"), Some(&b"<w:styles/>"[..]));
        assert_eq!(archive.get(CONTENT_TYPES_PART), Some(&b"<Types/>"[..]));
        assert!(archive.body().unwrap().contains("w:num=\"2\""));
    }

    #[test]
    fn test_missing_manifest_fails_before_rewrite() {
        let mut archive = DocumentArchive::new();
        archive.insert(BODY_PART, b"<w:body><w:sectPr/></w:body>".to_vec());

        let result = ContainerRewriter::default().apply(&mut archive);
        assert!(matches!(result, Err(Error::Structural(_))));
        assert_eq!(
            archive.get(BODY_PART),
            Some(&b"<w:body><w:sectPr/></w:body>"[..])
        );
    }

    #[test]
    fn test_rewrite_bytes() {
        let source = archive_with_body("<w:body><w:p/></w:body>").to_bytes().unwrap();
        let (bytes, report) = ContainerRewriter::default().rewrite_bytes(&source).unwrap();

        assert!(report.implicit_section);
        let decoded = DocumentArchive::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.len(), 4);
        assert!(decoded.body().unwrap().contains("<w:cols "));
    }
}

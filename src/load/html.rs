//! Loader for markup that is already flattened.

use super::{DocumentLoader, FlattenedDocument};
use crate::error::{Error, Result};
use async_trait::async_trait;
use regex::Regex;

/// Uses the `<body>` content of an HTML file, or the whole file when it has
/// no body element.
pub struct HtmlLoader {
    body_regex: Regex,
    title_regex: Regex,
}

impl HtmlLoader {
    /// Create a new HTML loader.
    pub fn new() -> Self {
        Self {
            body_regex: Regex::new(r"(?is)<body[^>]*>(.*)</body\s*>").unwrap(),
            title_regex: Regex::new(r"(?is)<title[^>]*>(.*?)</title\s*>").unwrap(),
        }
    }

    /// Extract content markup and title from an HTML string.
    pub fn extract(&self, html: &str) -> FlattenedDocument {
        let markup = self
            .body_regex
            .captures(html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .unwrap_or_else(|| html.trim());

        let mut doc = FlattenedDocument::new(markup);
        if let Some(title) = self
            .title_regex
            .captures(html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|t| !t.is_empty())
        {
            doc = doc.with_title(title);
        }
        doc
    }
}

impl Default for HtmlLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentLoader for HtmlLoader {
    fn supported_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn name(&self) -> &str {
        "html"
    }

    async fn flatten(&self, data: &[u8]) -> Result<FlattenedDocument> {
        let html = std::str::from_utf8(data)
            .map_err(|e| Error::Conversion(format!("HTML input is not valid UTF-8: {}", e)))?;
        Ok(self.extract(html))
    }
}

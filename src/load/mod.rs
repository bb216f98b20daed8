//! Document loaders producing flattened markup.
//!
//! The rendered-markup path needs the document as plain content markup
//! (paragraphs and headings, no page or section model). Loaders are
//! registered by file extension and by name, so callers can plug in their
//! own converter for other formats.
//!
//! # Example
//!
//! ```no_run
//! use twocol::load::LoaderRegistry;
//!
//! # async fn run() -> twocol::Result<()> {
//! let registry = LoaderRegistry::with_defaults();
//! let loader = registry.get_by_extension("docx").unwrap();
//! let data = std::fs::read("book.docx")?;
//! let flat = loader.flatten(&data).await?;
//! println!("{}", flat.markup);
//! # Ok(())
//! # }
//! ```

mod docx;
mod html;

pub use docx::DocxFlattener;
pub use html::HtmlLoader;

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Content markup extracted from a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedDocument {
    /// Document title, if the source declares one
    pub title: Option<String>,

    /// Flattened content markup (no `<html>`/`<body>` wrapper)
    pub markup: String,
}

impl FlattenedDocument {
    /// Create a document from markup.
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            title: None,
            markup: markup.into(),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Trait for document loaders.
///
/// Implement this trait to flatten another input format into markup.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// File extensions handled, lowercase without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Name of this loader.
    fn name(&self) -> &str;

    /// Convert raw file bytes into flattened markup.
    async fn flatten(&self, data: &[u8]) -> Result<FlattenedDocument>;

    /// Check if this loader supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry of document loaders.
pub struct LoaderRegistry {
    loaders: HashMap<String, Arc<dyn DocumentLoader>>,
    by_name: HashMap<String, Arc<dyn DocumentLoader>>,
}

impl LoaderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            loaders: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the built-in loaders (DOCX, HTML).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DocxFlattener::new()));
        registry.register(Arc::new(HtmlLoader::new()));
        registry
    }

    /// Register a loader for all its supported extensions.
    pub fn register(&mut self, loader: Arc<dyn DocumentLoader>) {
        for ext in loader.supported_extensions() {
            self.loaders.insert(ext.to_lowercase(), loader.clone());
        }
        self.by_name.insert(loader.name().to_lowercase(), loader);
    }

    /// Get a loader by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentLoader>> {
        self.loaders.get(&ext.to_lowercase()).cloned()
    }

    /// Get a loader by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentLoader>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.loaders.contains_key(&ext.to_lowercase())
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

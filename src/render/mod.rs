//! Output renderers for the rendered-markup path.
//!
//! A renderer receives the standalone document built by
//! [`ColumnStyleTemplate`](crate::html::ColumnStyleTemplate) and either hands
//! it back unchanged or turns it into a paged binary such as PDF. Page
//! geometry comes from the template's `@page` rule.

mod chromium;

pub use chromium::ChromiumRenderer;

use crate::error::Result;
use async_trait::async_trait;

/// What a renderer produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutput {
    /// Markup, passed through as text
    Markup(String),
    /// PDF document bytes
    Pdf(Vec<u8>),
}

impl RenderOutput {
    /// Output as bytes ready to be written.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            RenderOutput::Markup(s) => s.into_bytes(),
            RenderOutput::Pdf(b) => b,
        }
    }

    /// Output size in bytes.
    pub fn len(&self) -> usize {
        match self {
            RenderOutput::Markup(s) => s.len(),
            RenderOutput::Pdf(b) => b.len(),
        }
    }

    /// Whether the output is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// MIME type of the output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            RenderOutput::Markup(_) => "text/html",
            RenderOutput::Pdf(_) => "application/pdf",
        }
    }
}

/// Trait for output renderers.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Name of this renderer.
    fn name(&self) -> &str;

    /// Render a standalone HTML document.
    async fn render(&self, markup: &str) -> Result<RenderOutput>;
}

/// Returns the markup unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughRenderer;

#[async_trait]
impl Renderer for PassThroughRenderer {
    fn name(&self) -> &str {
        "html"
    }

    async fn render(&self, markup: &str) -> Result<RenderOutput> {
        Ok(RenderOutput::Markup(markup.to_string()))
    }
}

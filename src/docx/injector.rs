//! Column directive injection into located sections.

use super::directive::ColumnDirective;
use super::locator::{SectionBlock, SectionLocator, SECTION_TAG};
use crate::error::{Error, Result};
use crate::options::ColumnLayout;
use serde::{Deserialize, Serialize};

const BODY_END_TAG: &str = "</w:body>";

/// Counts collected while injecting directives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionReport {
    /// Number of sections that now carry the directive
    pub sections: usize,

    /// Sections whose existing `w:cols` was replaced
    pub replaced: usize,

    /// Sections that had no `w:cols` and received one
    pub inserted: usize,

    /// Whether a body-level section was added because none existed
    pub implicit_section: bool,
}

/// Rewritten body markup plus what was changed.
#[derive(Debug, Clone)]
pub struct Injection {
    /// The new body markup
    pub markup: String,

    /// Injection statistics
    pub report: InjectionReport,
}

/// Places exactly one column directive in every section of a body.
///
/// Existing `w:cols` elements are replaced, never merged. Sections without
/// one get the directive right after their opening tag. Markup outside the
/// replaced element is copied unchanged, so injecting twice gives the same
/// bytes as injecting once.
#[derive(Debug, Clone, Default)]
pub struct ColumnDirectiveInjector {
    directive: ColumnDirective,
}

impl ColumnDirectiveInjector {
    /// Create an injector for a column layout.
    pub fn new(layout: &ColumnLayout) -> Self {
        Self {
            directive: ColumnDirective::new(layout),
        }
    }

    /// Create an injector from a prepared directive.
    pub fn with_directive(directive: ColumnDirective) -> Self {
        Self { directive }
    }

    /// The directive this injector writes.
    pub fn directive(&self) -> &ColumnDirective {
        &self.directive
    }

    /// Rewrite a single located block.
    pub fn rewrite_block(&self, block: &SectionBlock<'_>) -> String {
        let raw = block.raw;
        let directive = self.directive.markup();

        if block.self_closing {
            // `<w:sectPr .../>` becomes `<w:sectPr ...>DIRECTIVE</w:sectPr>`
            let open = raw.strip_suffix("/>").unwrap_or(raw);
            return format!("{}>{}</{}>", open, directive, SECTION_TAG);
        }

        match block.columns.split_first() {
            Some((first, rest)) => {
                let mut out = String::with_capacity(raw.len() + directive.len());
                out.push_str(&raw[..first.start]);
                out.push_str(directive);
                let mut cursor = first.end;
                for extra in rest {
                    log::debug!(
                        "Dropping duplicate column element at byte {}",
                        block.start + extra.start
                    );
                    out.push_str(&raw[cursor..extra.start]);
                    cursor = extra.end;
                }
                out.push_str(&raw[cursor..]);
                out
            }
            None => {
                let mut out = String::with_capacity(raw.len() + directive.len());
                out.push_str(&raw[..block.open_tag_len]);
                out.push_str(directive);
                out.push_str(&raw[block.open_tag_len..]);
                out
            }
        }
    }

    /// Rewrite the raw text of one section element.
    ///
    /// The text must contain exactly one section block.
    pub fn rewrite_section(&self, raw: &str) -> Result<String> {
        let mut blocks = SectionLocator::new(raw);
        let block = blocks
            .next()
            .transpose()?
            .ok_or_else(|| Error::Structural(format!("no <{}> element found", SECTION_TAG)))?;
        if blocks.next().transpose()?.is_some() {
            return Err(Error::Structural(format!(
                "expected a single <{}> element",
                SECTION_TAG
            )));
        }

        let mut out = String::with_capacity(raw.len() + self.directive.markup().len());
        out.push_str(&raw[..block.start]);
        out.push_str(&self.rewrite_block(&block));
        out.push_str(&raw[block.end..]);
        Ok(out)
    }

    /// Inject the directive into every section of a body markup string.
    ///
    /// A body with no sections gets one body-level section holding the
    /// directive, placed as the last child of `w:body`.
    pub fn inject(&self, markup: &str) -> Result<Injection> {
        let mut out = String::with_capacity(markup.len() + self.directive.markup().len() * 4);
        let mut report = InjectionReport::default();
        let mut cursor = 0;

        for block in SectionLocator::new(markup) {
            let block = block?;
            out.push_str(&markup[cursor..block.start]);
            out.push_str(&self.rewrite_block(&block));
            cursor = block.end;

            report.sections += 1;
            if block.has_columns() {
                report.replaced += 1;
            } else {
                report.inserted += 1;
            }
        }
        out.push_str(&markup[cursor..]);

        if report.sections == 0 {
            let body_end = out.rfind(BODY_END_TAG).ok_or_else(|| {
                Error::Structural(format!(
                    "document has no sections and no {} to append one to",
                    BODY_END_TAG
                ))
            })?;
            log::warn!("No section properties found; adding a body-level section");
            out.insert_str(
                body_end,
                &format!("<{0}>{1}</{0}>", SECTION_TAG, self.directive.markup()),
            );
            report.sections = 1;
            report.inserted = 1;
            report.implicit_section = true;
        }

        log::info!(
            "Sections modified: {} ({} replaced, {} inserted)",
            report.sections,
            report.replaced,
            report.inserted
        );

        Ok(Injection {
            markup: out,
            report,
        })
    }
}

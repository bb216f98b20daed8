//! Column configuration markup.

use crate::options::ColumnLayout;
use std::fmt;

/// A `w:cols` element declaring equal-width columns.
///
/// ```
/// use twocol::docx::ColumnDirective;
/// use twocol::ColumnLayout;
///
/// let directive = ColumnDirective::new(&ColumnLayout::default());
/// assert_eq!(
///     directive.markup(),
///     r#"<w:cols w:space="720" w:num="2" w:equalWidth="1"><w:col w:w="4680" w:space="720"/><w:col w:w="4680" w:space="0"/></w:cols>"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDirective {
    count: u32,
    gap: u32,
    column_width: u32,
    markup: String,
}

impl ColumnDirective {
    /// Build the directive for a column layout.
    pub fn new(layout: &ColumnLayout) -> Self {
        let count = layout.count.max(1);
        let gap = layout.gap_twips;
        let column_width = layout.column_width();

        let mut markup = format!(
            r#"<w:cols w:space="{}" w:num="{}" w:equalWidth="1">"#,
            gap, count
        );
        for i in 0..count {
            // The last column has nothing to its right.
            let space = if i + 1 == count { 0 } else { gap };
            markup.push_str(&format!(
                r#"<w:col w:w="{}" w:space="{}"/>"#,
                column_width, space
            ));
        }
        markup.push_str("</w:cols>");

        Self {
            count,
            gap,
            column_width,
            markup,
        }
    }

    /// Number of columns declared.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Space between columns in twips.
    pub fn gap(&self) -> u32 {
        self.gap
    }

    /// Width of each column in twips.
    pub fn column_width(&self) -> u32 {
        self.column_width
    }

    /// The serialized `w:cols` element.
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

impl Default for ColumnDirective {
    fn default() -> Self {
        Self::new(&ColumnLayout::default())
    }
}

impl fmt::Display for ColumnDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.markup)
    }
}

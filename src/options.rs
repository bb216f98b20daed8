//! Layout options and configuration.

use serde::{Deserialize, Serialize};

/// Default inter-column gap: 720 twips (0.5 inch).
pub const DEFAULT_GAP_TWIPS: u32 = 720;

/// Default usable text width: 9360 twips (US Letter minus 1 inch margins).
pub const DEFAULT_USABLE_WIDTH_TWIPS: u32 = 9360;

/// Column geometry for the structured (`.docx`) path.
///
/// All widths are in twips (1/20 of a point), the unit WordprocessingML
/// uses for `w:cols` and `w:col`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    /// Number of columns (at least 1)
    pub count: u32,

    /// Space between adjacent columns
    pub gap_twips: u32,

    /// Total usable width shared evenly between the columns
    pub usable_width_twips: u32,
}

impl ColumnLayout {
    /// Create the default two-column layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of columns.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count.max(1);
        self
    }

    /// Set the gap between columns.
    pub fn with_gap(mut self, twips: u32) -> Self {
        self.gap_twips = twips;
        self
    }

    /// Set the usable width split between the columns.
    pub fn with_usable_width(mut self, twips: u32) -> Self {
        self.usable_width_twips = twips;
        self
    }

    /// Width of one column.
    ///
    /// Columns are equal width; the usable width is split evenly.
    pub fn column_width(&self) -> u32 {
        self.usable_width_twips / self.count.max(1)
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            count: 2,
            gap_twips: DEFAULT_GAP_TWIPS,
            usable_width_twips: DEFAULT_USABLE_WIDTH_TWIPS,
        }
    }
}

/// Page presentation for the rendered (HTML/PDF) path.
///
/// Values are CSS lengths and are emitted verbatim into the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStyle {
    /// CSS `@page` size (e.g. `A4`, `letter`)
    pub page_size: String,

    /// Width of the on-screen page container
    pub page_width: String,

    /// Page margin
    pub margin: String,

    /// Gap between columns
    pub column_gap: String,

    /// Draw a rule between columns
    pub column_rule: bool,

    /// Base font size
    pub font_size: String,
}

impl PageStyle {
    /// Create the default A4 page style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size and matching container width.
    pub fn with_page_size(mut self, size: impl Into<String>, width: impl Into<String>) -> Self {
        self.page_size = size.into();
        self.page_width = width.into();
        self
    }

    /// Set the page margin.
    pub fn with_margin(mut self, margin: impl Into<String>) -> Self {
        self.margin = margin.into();
        self
    }

    /// Set the column gap.
    pub fn with_column_gap(mut self, gap: impl Into<String>) -> Self {
        self.column_gap = gap.into();
        self
    }

    /// Set the column gap from a length in twips, emitted as points.
    pub fn with_column_gap_twips(self, twips: u32) -> Self {
        self.with_column_gap(format!("{}pt", f64::from(twips) / 20.0))
    }

    /// Show or hide the rule between columns.
    pub fn with_column_rule(mut self, visible: bool) -> Self {
        self.column_rule = visible;
        self
    }
}

impl Default for PageStyle {
    fn default() -> Self {
        Self {
            page_size: "A4".to_string(),
            page_width: "210mm".to_string(),
            margin: "2cm".to_string(),
            column_gap: "1cm".to_string(),
            column_rule: true,
            font_size: "11pt".to_string(),
        }
    }
}

/// Complete layout configuration passed to a conversion pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Column geometry for document packages
    pub columns: ColumnLayout,

    /// Page presentation for HTML and PDF output
    pub page: PageStyle,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column geometry.
    pub fn with_columns(mut self, columns: ColumnLayout) -> Self {
        self.columns = columns;
        self
    }

    /// Set the page style.
    pub fn with_page(mut self, page: PageStyle) -> Self {
        self.page = page;
        self
    }
}

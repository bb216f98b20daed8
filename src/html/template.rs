//! Two-column presentation template for flattened markup.

use super::escape_text;
use crate::options::PageStyle;

const DEFAULT_TITLE: &str = "Document";

/// Wraps flattened content in a standalone two-column HTML document.
///
/// Flattened markup has no section model, so the column flow is declared
/// once on the page container instead of per section. Renderers decide how
/// columns break across pages; the result is not guaranteed to match the
/// layout of a rewritten `.docx`.
///
/// ```
/// use twocol::html::ColumnStyleTemplate;
///
/// let html = ColumnStyleTemplate::default().wrap("<p>Hello</p>");
/// assert!(html.contains("column-count: 2"));
/// assert!(html.contains("<p>Hello</p>"));
/// ```
#[derive(Debug, Clone)]
pub struct ColumnStyleTemplate {
    page: PageStyle,
    columns: u32,
}

impl ColumnStyleTemplate {
    /// Create a template for a page style and column count.
    pub fn new(page: PageStyle, columns: u32) -> Self {
        Self {
            page,
            columns: columns.max(1),
        }
    }

    /// The page style in use.
    pub fn page(&self) -> &PageStyle {
        &self.page
    }

    /// Wrap content with the default document title.
    pub fn wrap(&self, content: &str) -> String {
        self.wrap_titled(content, DEFAULT_TITLE)
    }

    /// Wrap content, setting the document title.
    pub fn wrap_titled(&self, content: &str, title: &str) -> String {
        let mut html = String::with_capacity(content.len() + 2048);
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape_text(title)));
        html.push_str("<style>\n");
        html.push_str(&self.stylesheet());
        html.push_str("</style>\n</head>\n<body>\n<div class=\"page\">\n");
        html.push_str(content);
        html.push_str("\n</div>\n</body>\n</html>\n");
        html
    }

    /// The stylesheet embedded in every wrapped document.
    pub fn stylesheet(&self) -> String {
        let page = &self.page;
        let rule = if page.column_rule {
            "1px solid #ccc"
        } else {
            "none"
        };

        format!(
            r#"@page {{
  size: {size};
  margin: {margin};
}}
body {{
  margin: 0;
  font-family: "Times New Roman", Georgia, serif;
  font-size: {font_size};
  line-height: 1.4;
  -webkit-print-color-adjust: exact;
  print-color-adjust: exact;
}}
.page {{
  width: {width};
  box-sizing: border-box;
  padding: {margin};
  margin: 0 auto;
  column-count: {columns};
  column-gap: {gap};
  column-rule: {rule};
  column-fill: balance;
  text-align: justify;
}}
h1, h2, h3 {{
  column-span: all;
  text-align: left;
  break-after: avoid;
}}
p {{
  margin: 0 0 0.6em 0;
  orphans: 2;
  widows: 2;
}}
img, table {{
  max-width: 100%;
  break-inside: avoid;
}}
@media print {{
  .page {{
    width: auto;
    padding: 0;
    margin: 0;
  }}
}}
"#,
            size = page.page_size,
            margin = page.margin,
            font_size = page.font_size,
            width = page.page_width,
            columns = self.columns,
            gap = page.column_gap,
            rule = rule,
        )
    }
}

impl Default for ColumnStyleTemplate {
    fn default() -> Self {
        Self::new(PageStyle::default(), 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_keeps_content_unmodified() {
        let content = "<p>Hello</p>";
        let html = ColumnStyleTemplate::default().wrap(content);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<div class=\"page\">\n<p>Hello</p>\n</div>"));
    }

    #[test]
    fn test_stylesheet_declares_layout() {
        let css = ColumnStyleTemplate::default().stylesheet();

        assert!(css.contains("column-count: 2;"));
        assert!(css.contains("column-gap: 1cm;"));
        assert!(css.contains("column-rule: 1px solid #ccc;"));
        assert!(css.contains("size: A4;"));
        assert!(css.contains("column-span: all;"));
        assert!(css.contains("@media print"));
    }

    #[test]
    fn test_rule_can_be_hidden() {
        let page = PageStyle::new().with_column_rule(false);
        let css = ColumnStyleTemplate::new(page, 3).stylesheet();
        assert!(css.contains("column-rule: none;"));
        assert!(css.contains("column-count: 3;"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = ColumnStyleTemplate::default().wrap_titled("", "Tom & Jerry <1>");
        assert!(html.contains("<title>Tom &amp; Jerry &lt;1&gt;</title>"));
    }

    #[test]
    fn test_wrap_is_deterministic() {
        let template = ColumnStyleTemplate::default();
        assert_eq!(template.wrap("<p>a</p>"), template.wrap("<p>a</p>"));
    }
}

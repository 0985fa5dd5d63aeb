//! Report assembly and rendering.

use std::fmt::Write;

use chrono::Local;

use crate::convert::{CmarkConverter, ConvertError, MarkdownConverter};
use crate::report::ReportData;

/// Fixed title heading placed at the top of every published report.
pub const REPORT_TITLE: &str = "AI Code Review Report";

/// Format for the optional review-time line, local time with UTC offset.
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S %:z";

/// Rendering options.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Include a review-time line in the metadata summary block.
    pub include_timestamp: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_timestamp: true,
        }
    }
}

/// Renders a [`ReportData`] into a single HTML document.
///
/// Pure with respect to I/O: the only collaborator is the
/// [`MarkdownConverter`]. One renderer instance serves arbitrarily many
/// `render` calls.
pub struct ReportRenderer {
    converter: Box<dyn MarkdownConverter>,
    options: RenderOptions,
}

impl ReportRenderer {
    /// Create a renderer using the default pulldown-cmark converter.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self::with_converter(Box::new(CmarkConverter::new()), options)
    }

    /// Create a renderer with a custom conversion engine.
    #[must_use]
    pub fn with_converter(converter: Box<dyn MarkdownConverter>, options: RenderOptions) -> Self {
        Self { converter, options }
    }

    /// Render the report to a fully assembled HTML document.
    ///
    /// The output is complete before the first byte is consumed, so backends
    /// that need an exact `Content-Length` can take it from the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if the conversion engine fails.
    pub fn render(&self, data: &ReportData) -> Result<Vec<u8>, ConvertError> {
        let timestamp = self
            .options
            .include_timestamp
            .then(|| Local::now().format(TIMESTAMP_FORMAT).to_string());
        let document = assemble(data, timestamp.as_deref());

        // The title is already embedded as the leading heading, so the
        // explicit document title stays empty.
        self.converter.run("", document.as_bytes())
    }
}

impl std::fmt::Debug for ReportRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportRenderer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Assemble the Markdown document: title heading, metadata summary block,
/// separator, verbatim review body.
fn assemble(data: &ReportData, timestamp: Option<&str>) -> String {
    let meta = &data.metadata;
    let mut summary = format!(
        "Reviewed repository: `{}`\n\nBranch diff: `{}` ← `{}`\n\n",
        meta.repo_url, meta.base_branch, meta.feature_branch
    );
    if let Some(ts) = timestamp {
        let _ = write!(summary, "Reviewed at: *{ts}*\n\n");
    }

    format!(
        "# {REPORT_TITLE}\n\n{summary}\n\n{}",
        data.review_markdown
    )
}

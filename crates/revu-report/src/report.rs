//! Value types describing one review report.

/// Provenance of a review run.
///
/// Constructed once by the caller before publishing and never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportMetadata {
    /// Repository the review ran against (e.g. a clone URL or `org/repo`).
    pub repo_url: String,
    /// Branch the diff was taken against.
    pub base_branch: String,
    /// Branch under review.
    pub feature_branch: String,
}

impl ReportMetadata {
    /// Create metadata for a review run.
    #[must_use]
    pub fn new(
        repo_url: impl Into<String>,
        base_branch: impl Into<String>,
        feature_branch: impl Into<String>,
    ) -> Self {
        Self {
            repo_url: repo_url.into(),
            base_branch: base_branch.into(),
            feature_branch: feature_branch.into(),
        }
    }
}

/// Everything needed to render and publish one report: provenance metadata
/// plus the raw Markdown review body.
///
/// This is the unit of work passed by value into `publish`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportData {
    /// Provenance of the review.
    pub metadata: ReportMetadata,
    /// Raw Markdown review body, reproduced verbatim in the report.
    pub review_markdown: String,
}

impl ReportData {
    /// Combine metadata and review body into a report.
    #[must_use]
    pub fn new(metadata: ReportMetadata, review_markdown: impl Into<String>) -> Self {
        Self {
            metadata,
            review_markdown: review_markdown.into(),
        }
    }
}

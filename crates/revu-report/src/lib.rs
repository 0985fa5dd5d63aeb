//! Review report data model and HTML rendering for revu.
//!
//! This crate provides the caller-owned value types describing one review
//! report ([`ReportMetadata`], [`ReportData`]) and the [`ReportRenderer`]
//! that turns them into a single self-contained HTML document ready for
//! upload.
//!
//! Markdown-to-HTML conversion sits behind the [`MarkdownConverter`] trait
//! so the engine can be swapped (or spied on in tests). The default
//! implementation, [`CmarkConverter`], drives pulldown-cmark with GFM
//! extensions and raw-HTML passthrough.

mod convert;
mod renderer;
mod report;

pub use convert::{CmarkConverter, ConvertError, MarkdownConverter};
pub use renderer::{REPORT_TITLE, RenderOptions, ReportRenderer};
pub use report::{ReportData, ReportMetadata};

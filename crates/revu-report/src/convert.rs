//! Markdown-to-HTML conversion boundary.
//!
//! The conversion engine is a collaborator behind the [`MarkdownConverter`]
//! trait; the renderer never talks to pulldown-cmark directly. This keeps
//! the engine swappable and lets tests substitute a spy.

use std::fmt::Write;

use pulldown_cmark::{Options, Parser, html};

/// Error raised by a [`MarkdownConverter`] implementation.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ConvertError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ConvertError {
    /// Create a conversion error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

/// Converts a complete Markdown document into a complete HTML document.
///
/// `title_override` sets the HTML `<title>`; callers that embed their title
/// as a Markdown heading pass an empty string.
pub trait MarkdownConverter: Send + Sync {
    /// Convert `markdown` to a fully assembled HTML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if the engine cannot process the input.
    fn run(&self, title_override: &str, markdown: &[u8]) -> Result<Vec<u8>, ConvertError>;
}

/// Default converter built on pulldown-cmark.
///
/// Raw HTML in the source is passed through unescaped: review bodies may
/// legitimately contain HTML fragments such as diff tables.
#[derive(Debug)]
pub struct CmarkConverter {
    gfm: bool,
}

impl CmarkConverter {
    /// Create a converter with GFM extensions enabled.
    #[must_use]
    pub fn new() -> Self {
        Self { gfm: true }
    }

    /// Enable or disable GitHub Flavored Markdown extensions
    /// (tables, strikethrough, task lists).
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
        } else {
            Options::empty()
        }
    }
}

impl Default for CmarkConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownConverter for CmarkConverter {
    fn run(&self, title_override: &str, markdown: &[u8]) -> Result<Vec<u8>, ConvertError> {
        let source = std::str::from_utf8(markdown)
            .map_err(|e| ConvertError::new("markdown source is not valid UTF-8").with_source(e))?;

        let parser = Parser::new_ext(source, self.parser_options());
        let mut body = String::with_capacity(source.len() * 2);
        html::push_html(&mut body, parser);

        Ok(wrap_document(title_override, &body).into_bytes())
    }
}

/// Embedded stylesheet for published reports.
const STYLE: &str = "\
body{max-width:56rem;margin:2rem auto;padding:0 1rem;\
font-family:-apple-system,'Segoe UI',sans-serif;line-height:1.6;color:#1f2328}\
code{background:#f6f8fa;padding:.15em .35em;border-radius:4px;\
font-family:ui-monospace,'SF Mono',monospace;font-size:.92em}\
pre{background:#f6f8fa;padding:1rem;border-radius:6px;overflow-x:auto}\
pre code{background:none;padding:0}\
table{border-collapse:collapse}\
th,td{border:1px solid #d1d9e0;padding:.4em .8em}\
blockquote{border-left:4px solid #d1d9e0;margin-left:0;padding-left:1em;color:#59636e}";

/// Wrap rendered body HTML into a self-contained HTML5 document.
fn wrap_document(title: &str, body: &str) -> String {
    let mut out = String::with_capacity(body.len() + STYLE.len() + 256);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    writeln!(out, "<title>{}</title>", escape_html(title)).unwrap();
    writeln!(out, "<style>{STYLE}</style>").unwrap();
    out.push_str("</head>\n<body>\n");
    out.push_str(body);
    out.push_str("</body>\n</html>\n");
    out
}

/// Minimal HTML escaping for text placed in element content.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

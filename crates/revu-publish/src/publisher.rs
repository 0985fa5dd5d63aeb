//! Backend-bound publishers.
//!
//! One publisher per storage backend, each composing an already-constructed
//! writer with a renderer. The variants differ only in their destination
//! parser; the publish chain itself is shared.

use async_trait::async_trait;

use revu_report::{ConvertError, ReportData, ReportRenderer};
use revu_storage::{ObjectWriter, StorageError};

use crate::destination::{Destination, DestinationError};

/// Content type for every published document.
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

/// Error surfaced by [`Publisher::publish`].
///
/// Causes are wrapped, not replaced, so callers can tell bad input from a
/// backend outage.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("invalid destination URI")]
    InvalidDestination(#[from] DestinationError),

    #[error("rendering report to HTML failed")]
    Render(#[source] ConvertError),

    #[error("uploading report failed")]
    Write(#[source] StorageError),
}

/// Publishes review reports to a destination URI.
///
/// Implementations hold no per-call mutable state; one instance serves
/// arbitrarily many concurrent `publish` calls.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Render `data` and upload it to `destination`.
    ///
    /// Exactly one write attempt is made; nothing is retried internally.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] if the URI is invalid for this publisher's
    /// backend, rendering fails, or the upload fails.
    async fn publish(&self, destination: &str, data: &ReportData) -> Result<(), PublishError>;
}

/// Publishes reports to Google Cloud Storage destinations.
pub struct GcsPublisher {
    writer: Box<dyn ObjectWriter>,
    renderer: ReportRenderer,
}

impl GcsPublisher {
    /// Create a publisher around an already-constructed writer.
    #[must_use]
    pub fn new(writer: Box<dyn ObjectWriter>, renderer: ReportRenderer) -> Self {
        Self { writer, renderer }
    }
}

#[async_trait]
impl Publisher for GcsPublisher {
    async fn publish(&self, destination: &str, data: &ReportData) -> Result<(), PublishError> {
        let dest = Destination::parse_gs(destination)?;
        publish_to(self.writer.as_ref(), &self.renderer, &dest, data).await
    }
}

/// Publishes reports to S3 destinations.
pub struct S3Publisher {
    writer: Box<dyn ObjectWriter>,
    renderer: ReportRenderer,
}

impl S3Publisher {
    /// Create a publisher around an already-constructed writer.
    #[must_use]
    pub fn new(writer: Box<dyn ObjectWriter>, renderer: ReportRenderer) -> Self {
        Self { writer, renderer }
    }
}

#[async_trait]
impl Publisher for S3Publisher {
    async fn publish(&self, destination: &str, data: &ReportData) -> Result<(), PublishError> {
        let dest = Destination::parse_s3(destination)?;
        publish_to(self.writer.as_ref(), &self.renderer, &dest, data).await
    }
}

/// Shared publish chain: render, announce, one write attempt.
async fn publish_to(
    writer: &dyn ObjectWriter,
    renderer: &ReportRenderer,
    dest: &Destination,
    data: &ReportData,
) -> Result<(), PublishError> {
    let html = renderer.render(data).map_err(PublishError::Render)?;

    tracing::info!(bucket = %dest.bucket, object = %dest.object, "Uploading rendered report");

    writer
        .write(&dest.bucket, &dest.object, html, CONTENT_TYPE_HTML)
        .await
        .map_err(PublishError::Write)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;
    use revu_report::{MarkdownConverter, RenderOptions, ReportMetadata};
    use revu_storage::MockWriter;

    use super::*;

    /// Counts conversions; output is the assembled markdown itself so tests
    /// can assert on document structure without HTML noise.
    struct CountingConverter {
        calls: Arc<AtomicUsize>,
    }

    impl MarkdownConverter for CountingConverter {
        fn run(&self, _title: &str, markdown: &[u8]) -> Result<Vec<u8>, ConvertError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(markdown.to_vec())
        }
    }

    fn counting_renderer() -> (ReportRenderer, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let renderer = ReportRenderer::with_converter(
            Box::new(CountingConverter {
                calls: Arc::clone(&calls),
            }),
            RenderOptions {
                include_timestamp: false,
            },
        );
        (renderer, calls)
    }

    fn sample_data() -> ReportData {
        ReportData::new(ReportMetadata::new("r", "main", "feat"), "body text")
    }

    #[tokio::test]
    async fn test_gcs_publish_writes_to_parsed_target() {
        let writer = MockWriter::new();
        let (renderer, _) = counting_renderer();
        let publisher = GcsPublisher::new(Box::new(writer.clone()), renderer);

        publisher
            .publish("gs://bucket/reports/a.html", &sample_data())
            .await
            .unwrap();

        let writes = writer.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].bucket, "bucket");
        assert_eq!(writes[0].object, "reports/a.html");
        assert_eq!(writes[0].content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_s3_publish_writes_to_parsed_target() {
        let writer = MockWriter::new();
        let (renderer, _) = counting_renderer();
        let publisher = S3Publisher::new(Box::new(writer.clone()), renderer);

        publisher
            .publish("s3://other-bucket/deep/path.html", &sample_data())
            .await
            .unwrap();

        let writes = writer.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].bucket, "other-bucket");
        assert_eq!(writes[0].object, "deep/path.html");
    }

    #[tokio::test]
    async fn test_published_document_contains_metadata_and_body() {
        let writer = MockWriter::new();
        let (renderer, _) = counting_renderer();
        let publisher = GcsPublisher::new(Box::new(writer.clone()), renderer);

        publisher
            .publish("gs://b/o.html", &sample_data())
            .await
            .unwrap();

        let document = String::from_utf8(writer.writes()[0].content.clone()).unwrap();
        assert!(document.contains("# AI Code Review Report"));
        assert!(document.contains("`r`"));
        assert!(document.contains("`main`"));
        assert!(document.contains("`feat`"));
        assert!(document.contains("body text"));
    }

    #[tokio::test]
    async fn test_empty_uri_fails_before_any_collaborator_call() {
        let writer = MockWriter::new();
        let (renderer, calls) = counting_renderer();
        let publisher = GcsPublisher::new(Box::new(writer.clone()), renderer);

        let err = publisher.publish("", &sample_data()).await.unwrap_err();

        assert!(matches!(
            err,
            PublishError::InvalidDestination(DestinationError::Empty)
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(writer.write_count(), 0);
    }

    #[tokio::test]
    async fn test_wrong_scheme_fails_before_any_collaborator_call() {
        let writer = MockWriter::new();
        let (renderer, calls) = counting_renderer();
        let publisher = GcsPublisher::new(Box::new(writer.clone()), renderer);

        let err = publisher
            .publish("s3://bucket/path", &sample_data())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PublishError::InvalidDestination(DestinationError::WrongScheme { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(writer.write_count(), 0);
    }

    #[tokio::test]
    async fn test_failing_write_is_not_retried() {
        let writer = MockWriter::new().failing();
        let (renderer, calls) = counting_renderer();
        let publisher = S3Publisher::new(Box::new(writer.clone()), renderer);

        let err = publisher
            .publish("s3://b/o.html", &sample_data())
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Write(_)));
        // One render, one write attempt, nothing retried.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(writer.write_count(), 1);
    }

    #[tokio::test]
    async fn test_render_failure_skips_the_write() {
        struct FailingConverter;
        impl MarkdownConverter for FailingConverter {
            fn run(&self, _title: &str, _markdown: &[u8]) -> Result<Vec<u8>, ConvertError> {
                Err(ConvertError::new("engine down"))
            }
        }

        let writer = MockWriter::new();
        let publisher = GcsPublisher::new(
            Box::new(writer.clone()),
            ReportRenderer::with_converter(Box::new(FailingConverter), RenderOptions::default()),
        );

        let err = publisher
            .publish("gs://b/o.html", &sample_data())
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Render(_)));
        assert_eq!(writer.write_count(), 0);
    }

    #[tokio::test]
    async fn test_publisher_is_reusable_across_calls() {
        let writer = MockWriter::new();
        let (renderer, _) = counting_renderer();
        let publisher = GcsPublisher::new(Box::new(writer.clone()), renderer);

        publisher
            .publish("gs://b/first.html", &sample_data())
            .await
            .unwrap();
        publisher
            .publish("gs://b/second.html", &sample_data())
            .await
            .unwrap();

        let writes = writer.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].object, "first.html");
        assert_eq!(writes[1].object, "second.html");
    }
}

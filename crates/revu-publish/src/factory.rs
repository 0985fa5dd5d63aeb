//! URI-scheme-driven publisher construction.
//!
//! Backends live in a fixed, ordered dispatch table: each entry pairs a
//! scheme predicate with the registry slot and publisher constructor for one
//! backend. Adding a backend is a table addition, not a control-flow change.

use std::sync::Arc;

use revu_report::{RenderOptions, ReportRenderer};
use revu_storage::{ObjectWriter, StorageError, UrlSigner, WriterFactory};

use crate::destination::{self, Destination, DestinationError};
use crate::publisher::{GcsPublisher, Publisher, S3Publisher};

/// The backend dependencies a caller makes available for resolution.
///
/// A `None` slot means the backend is unavailable: URIs addressing it fail
/// with [`ResolveError::MissingDependency`] instead of silently falling back
/// to another backend.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    gcs: Option<Arc<dyn WriterFactory>>,
    s3: Option<Arc<dyn WriterFactory>>,
}

impl BackendRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply the GCS client factory.
    #[must_use]
    pub fn with_gcs(mut self, factory: Arc<dyn WriterFactory>) -> Self {
        self.gcs = Some(factory);
        self
    }

    /// Supply the S3 client factory.
    #[must_use]
    pub fn with_s3(mut self, factory: Arc<dyn WriterFactory>) -> Self {
        self.s3 = Some(factory);
        self
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("gcs", &self.gcs.is_some())
            .field("s3", &self.s3.is_some())
            .finish()
    }
}

/// Error surfaced by [`resolve`] and [`resolve_with_signer`].
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid destination URI")]
    InvalidDestination(#[from] DestinationError),

    #[error("unsupported URI scheme `{scheme}` (supported: {SUPPORTED_SCHEMES})")]
    UnsupportedScheme { scheme: String },

    #[error(
        "destination requires the {backend} backend, but no {backend} client factory was supplied"
    )]
    MissingDependency { backend: &'static str },

    #[error("constructing the {backend} client failed")]
    Adapter {
        backend: &'static str,
        #[source]
        source: StorageError,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BackendKind {
    Gcs,
    S3,
}

struct BackendEntry {
    kind: BackendKind,
    name: &'static str,
    matches: fn(&str) -> bool,
    parse: fn(&str) -> Result<Destination, DestinationError>,
}

/// Dispatch table, evaluated in order: GCS first, then S3. Predicates are
/// anchored on disjoint schemes, so at most one entry matches a given URI.
const BACKENDS: &[BackendEntry] = &[
    BackendEntry {
        kind: BackendKind::Gcs,
        name: "GCS",
        matches: destination::is_gs_uri,
        parse: Destination::parse_gs,
    },
    BackendEntry {
        kind: BackendKind::S3,
        name: "S3",
        matches: destination::is_s3_uri,
        parse: Destination::parse_s3,
    },
];

const SUPPORTED_SCHEMES: &str = "gs://, s3://";

/// Construct the publisher matching `uri`'s scheme.
///
/// The backend's client factory is invoked exactly once here, so client
/// initialization problems surface before any report is rendered.
///
/// # Errors
///
/// Returns [`ResolveError`] if no backend recognizes the scheme, the
/// matching backend's factory is absent from `registry`, or the factory
/// fails to produce a writer.
pub async fn resolve(
    uri: &str,
    registry: &BackendRegistry,
    options: RenderOptions,
) -> Result<Box<dyn Publisher>, ResolveError> {
    let (entry, factory) = select_backend(uri, registry)?;
    let writer = new_writer(entry, factory.as_ref()).await?;

    Ok(make_publisher(entry, writer, options))
}

/// Construct the publisher matching `uri`'s scheme together with a
/// pre-signed-URL signer for the same backend.
///
/// Both come from the same factory selection, so the publisher and signer
/// can never disagree about the backend.
///
/// # Errors
///
/// Returns [`ResolveError`] under the same conditions as [`resolve`], plus
/// when signer construction fails.
pub async fn resolve_with_signer(
    uri: &str,
    registry: &BackendRegistry,
    options: RenderOptions,
) -> Result<(Box<dyn Publisher>, Box<dyn UrlSigner>), ResolveError> {
    let (entry, factory) = select_backend(uri, registry)?;
    let writer = new_writer(entry, factory.as_ref()).await?;
    let signer = factory
        .new_signer()
        .await
        .map_err(|source| ResolveError::Adapter {
            backend: entry.name,
            source,
        })?;

    Ok((make_publisher(entry, writer, options), signer))
}

/// Parse a destination URI with the scheme-appropriate parser, using the
/// same dispatch order as [`resolve`].
///
/// # Errors
///
/// Returns [`ResolveError::UnsupportedScheme`] if no backend recognizes the
/// scheme, or [`ResolveError::InvalidDestination`] if the matching parser
/// rejects the URI.
pub fn parse_destination(uri: &str) -> Result<Destination, ResolveError> {
    let entry = find_entry(uri)?;
    Ok((entry.parse)(uri)?)
}

fn find_entry(uri: &str) -> Result<&'static BackendEntry, ResolveError> {
    if uri.is_empty() {
        return Err(DestinationError::Empty.into());
    }
    BACKENDS
        .iter()
        .find(|entry| (entry.matches)(uri))
        .ok_or_else(|| ResolveError::UnsupportedScheme {
            scheme: destination::uri_scheme(uri).unwrap_or(uri).to_owned(),
        })
}

fn select_backend<'r>(
    uri: &str,
    registry: &'r BackendRegistry,
) -> Result<(&'static BackendEntry, &'r Arc<dyn WriterFactory>), ResolveError> {
    let entry = find_entry(uri)?;

    let slot = match entry.kind {
        BackendKind::Gcs => &registry.gcs,
        BackendKind::S3 => &registry.s3,
    };
    let factory = slot
        .as_ref()
        .ok_or(ResolveError::MissingDependency { backend: entry.name })?;

    Ok((entry, factory))
}

async fn new_writer(
    entry: &BackendEntry,
    factory: &dyn WriterFactory,
) -> Result<Box<dyn ObjectWriter>, ResolveError> {
    factory
        .new_writer()
        .await
        .map_err(|source| ResolveError::Adapter {
            backend: entry.name,
            source,
        })
}

fn make_publisher(
    entry: &BackendEntry,
    writer: Box<dyn ObjectWriter>,
    options: RenderOptions,
) -> Box<dyn Publisher> {
    let renderer = ReportRenderer::new(options);
    match entry.kind {
        BackendKind::Gcs => Box::new(GcsPublisher::new(writer, renderer)),
        BackendKind::S3 => Box::new(S3Publisher::new(writer, renderer)),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use revu_report::{ReportData, ReportMetadata};
    use revu_storage::{MockFactory, MockWriter, StorageErrorKind};

    use super::*;

    fn options() -> RenderOptions {
        RenderOptions {
            include_timestamp: false,
        }
    }

    fn sample_data() -> ReportData {
        ReportData::new(ReportMetadata::new("r", "main", "feat"), "body text")
    }

    /// Registry with independent mock factories for both backends; returns
    /// the writer handles for post-hoc assertions.
    fn full_registry() -> (BackendRegistry, MockWriter, MockWriter) {
        let gcs = MockFactory::new();
        let s3 = MockFactory::new();
        let (gcs_writer, s3_writer) = (gcs.writer(), s3.writer());
        let registry = BackendRegistry::new()
            .with_gcs(Arc::new(gcs))
            .with_s3(Arc::new(s3));
        (registry, gcs_writer, s3_writer)
    }

    #[tokio::test]
    async fn test_gs_uri_routes_to_gcs_backend() {
        let (registry, gcs_writer, s3_writer) = full_registry();

        let publisher = resolve("gs://bucket/path.html", &registry, options())
            .await
            .unwrap();
        publisher
            .publish("gs://bucket/path.html", &sample_data())
            .await
            .unwrap();

        let writes = gcs_writer.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].bucket, "bucket");
        assert_eq!(writes[0].object, "path.html");
        assert_eq!(s3_writer.write_count(), 0);
    }

    #[tokio::test]
    async fn test_s3_uri_routes_to_s3_backend() {
        let (registry, gcs_writer, s3_writer) = full_registry();

        let publisher = resolve("s3://bucket/path.html", &registry, options())
            .await
            .unwrap();
        publisher
            .publish("s3://bucket/path.html", &sample_data())
            .await
            .unwrap();

        assert_eq!(s3_writer.write_count(), 1);
        assert_eq!(gcs_writer.write_count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_scheme_regardless_of_registry() {
        let (full, _, _) = full_registry();
        for registry in [&full, &BackendRegistry::new()] {
            let err = resolve("ftp://bucket/path", registry, options())
                .await
                .err()
                .unwrap();

            match &err {
                ResolveError::UnsupportedScheme { scheme } => assert_eq!(scheme, "ftp"),
                other => panic!("expected UnsupportedScheme, got {other:?}"),
            }
            assert!(err.to_string().contains("gs://, s3://"));
        }
    }

    #[tokio::test]
    async fn test_missing_dependency_never_falls_back() {
        // S3 factory present, GCS absent: a gs:// URI must fail, not reach S3.
        let s3 = MockFactory::new();
        let s3_writer = s3.writer();
        let registry = BackendRegistry::new().with_s3(Arc::new(s3));

        let err = resolve("gs://bucket/path", &registry, options())
            .await
            .err()
            .unwrap();

        assert!(matches!(
            err,
            ResolveError::MissingDependency { backend: "GCS" }
        ));
        assert_eq!(s3_writer.write_count(), 0);
    }

    #[tokio::test]
    async fn test_adapter_construction_failure_is_distinct() {
        let registry =
            BackendRegistry::new().with_gcs(Arc::new(MockFactory::new().failing_construction()));

        let err = resolve("gs://bucket/path", &registry, options())
            .await
            .err()
            .unwrap();

        match err {
            ResolveError::Adapter { backend, source } => {
                assert_eq!(backend, "GCS");
                assert_eq!(source.kind, StorageErrorKind::Construction);
            }
            other => panic!("expected Adapter, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_gcs_spelling_resolves_like_gs() {
        let (registry, gcs_writer, _) = full_registry();

        let publisher = resolve("gcs://bucket/path.html", &registry, options())
            .await
            .unwrap();
        publisher
            .publish("gcs://bucket/path.html", &sample_data())
            .await
            .unwrap();

        assert_eq!(gcs_writer.write_count(), 1);
    }

    #[tokio::test]
    async fn test_resolve_with_signer_keeps_backend_consistent() {
        // The S3 factory cannot construct anything: if the signer came from
        // a different backend than the publisher, this would fail.
        let gcs = MockFactory::new();
        let gcs_writer = gcs.writer();
        let registry = BackendRegistry::new()
            .with_gcs(Arc::new(gcs))
            .with_s3(Arc::new(MockFactory::new().failing_construction()));

        let (publisher, signer) = resolve_with_signer("gs://b/o.html", &registry, options())
            .await
            .unwrap();

        publisher
            .publish("gs://b/o.html", &sample_data())
            .await
            .unwrap();
        let url = signer
            .signed_get_url("b", "o.html", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(gcs_writer.write_count(), 1);
        assert_eq!(url, "https://signed.invalid/b/o.html?expires=60");
    }

    #[tokio::test]
    async fn test_resolve_with_signer_surfaces_signer_failure() {
        let registry =
            BackendRegistry::new().with_s3(Arc::new(MockFactory::new().failing_construction()));

        let err = resolve_with_signer("s3://b/o", &registry, options())
            .await
            .err()
            .unwrap();

        assert!(matches!(err, ResolveError::Adapter { backend: "S3", .. }));
    }

    #[test]
    fn test_parse_destination_dispatches_by_scheme() {
        let gs = parse_destination("gs://b/reports/a.html").unwrap();
        assert_eq!(gs.bucket, "b");
        assert_eq!(gs.object, "reports/a.html");

        let s3 = parse_destination("s3://c/x").unwrap();
        assert_eq!(s3.bucket, "c");
        assert_eq!(s3.object, "x");
    }

    #[tokio::test]
    async fn test_empty_uri_is_rejected_before_dispatch() {
        let (registry, _, _) = full_registry();

        let err = resolve("", &registry, options()).await.err().unwrap();

        assert!(matches!(
            err,
            ResolveError::InvalidDestination(DestinationError::Empty)
        ));
    }

    #[test]
    fn test_parse_destination_unknown_scheme() {
        assert!(matches!(
            parse_destination("azure://b/o"),
            Err(ResolveError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn test_parse_destination_malformed() {
        assert!(matches!(
            parse_destination("gs://bucket"),
            Err(ResolveError::InvalidDestination(
                DestinationError::MissingObject { .. }
            ))
        ));
    }
}

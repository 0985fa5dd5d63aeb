//! Writer traits and error types.
//!
//! All traits are `Send + Sync` and async: cancellation is the caller
//! dropping the future, and one instance may serve concurrent calls.

use std::time::Duration;

use async_trait::async_trait;

/// Semantic error categories for storage operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Building the backend client failed.
    Construction,
    /// The object write failed.
    Write,
    /// Producing a signed URL failed.
    Sign,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Backend identifier (e.g. "GCS", "S3", "Mock").
    pub backend: Option<&'static str>,
    /// Object location context as `bucket/object`, if applicable.
    pub location: Option<String>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            backend: None,
            location: None,
            source: None,
        }
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach object location context.
    #[must_use]
    pub fn with_location(mut self, bucket: &str, object: &str) -> Self {
        self.location = Some(format!("{bucket}/{object}"));
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] kind: source (object: bucket/path)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::Construction => "client construction failed",
            StorageErrorKind::Write => "write failed",
            StorageErrorKind::Sign => "signing failed",
        };
        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(location) = &self.location {
            write!(f, " (object: {location})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Write capability against one object-storage backend.
///
/// Implementations must be safe for concurrent use; the publisher performs
/// exactly one `write` call per published report and never retries.
#[async_trait]
pub trait ObjectWriter: Send + Sync {
    /// Write `content` to `bucket`/`object` with the given content type.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] with kind [`StorageErrorKind::Write`] if the
    /// backend rejects or fails the upload.
    async fn write(
        &self,
        bucket: &str,
        object: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

/// Produces pre-signed read links for already-written objects.
#[async_trait]
pub trait UrlSigner: Send + Sync {
    /// Produce a URL granting read access to `bucket`/`object` until
    /// `expires_in` elapses.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] with kind [`StorageErrorKind::Sign`] if the
    /// backend cannot sign the request.
    async fn signed_get_url(
        &self,
        bucket: &str,
        object: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError>;
}

/// Backend client factory.
///
/// `new_writer` is invoked exactly once at publisher construction so client
/// initialization problems surface fail-fast, never per request.
#[async_trait]
pub trait WriterFactory: Send + Sync {
    /// Construct the backend writer.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] with kind [`StorageErrorKind::Construction`]
    /// if the underlying client cannot be produced.
    async fn new_writer(&self) -> Result<Box<dyn ObjectWriter>, StorageError>;

    /// Construct a signer for the same backend.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] with kind [`StorageErrorKind::Construction`]
    /// if the underlying client cannot be produced.
    async fn new_signer(&self) -> Result<Box<dyn UrlSigner>, StorageError>;

    /// Short backend name used in logs and error context.
    fn backend_name(&self) -> &'static str;
}

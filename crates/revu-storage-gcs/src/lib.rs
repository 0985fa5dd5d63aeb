//! Google Cloud Storage backend for revu.
//!
//! Implements the `revu-storage` writer traits on top of the `object_store`
//! GCS client. Credentials come from the environment (service account file
//! or application default credentials).

use std::time::Duration;

use async_trait::async_trait;
use object_store::gcp::{GoogleCloudStorage, GoogleCloudStorageBuilder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions};

use revu_storage::{
    ObjectWriter, StorageError, StorageErrorKind, UrlSigner, WriterFactory,
};

const BACKEND: &str = "GCS";

/// Build a store bound to `bucket`.
///
/// The `object_store` GCS client binds its bucket at construction, so each
/// call targeting a new bucket builds a fresh store.
fn build_store(bucket: &str) -> Result<GoogleCloudStorage, object_store::Error> {
    GoogleCloudStorageBuilder::from_env()
        .with_bucket_name(bucket)
        .build()
}

/// Client factory for the GCS backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct GcsClientFactory;

impl GcsClientFactory {
    /// Create a factory reading credentials from the environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WriterFactory for GcsClientFactory {
    async fn new_writer(&self) -> Result<Box<dyn ObjectWriter>, StorageError> {
        Ok(Box::new(GcsWriter::default()))
    }

    async fn new_signer(&self) -> Result<Box<dyn UrlSigner>, StorageError> {
        Ok(Box::new(GcsUrlSigner::default()))
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}

/// Writes objects to GCS buckets.
#[derive(Clone, Copy, Debug, Default)]
pub struct GcsWriter;

#[async_trait]
impl ObjectWriter for GcsWriter {
    async fn write(
        &self,
        bucket: &str,
        object: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let write_error = |e: object_store::Error| {
            StorageError::new(StorageErrorKind::Write)
                .with_backend(BACKEND)
                .with_location(bucket, object)
                .with_source(e)
        };

        let store = build_store(bucket).map_err(write_error)?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_owned().into());

        store
            .put_opts(
                &Path::from(object),
                content.into(),
                PutOptions::from(attributes),
            )
            .await
            .map_err(write_error)?;

        tracing::debug!(bucket = %bucket, object = %object, "Uploaded");
        Ok(())
    }
}

/// Produces V4 signed GET URLs for GCS objects.
#[derive(Clone, Copy, Debug, Default)]
pub struct GcsUrlSigner;

#[async_trait]
impl UrlSigner for GcsUrlSigner {
    async fn signed_get_url(
        &self,
        bucket: &str,
        object: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let sign_error = |e: object_store::Error| {
            StorageError::new(StorageErrorKind::Sign)
                .with_backend(BACKEND)
                .with_location(bucket, object)
                .with_source(e)
        };

        let store = build_store(bucket).map_err(sign_error)?;
        let url = store
            .signed_url(http::Method::GET, &Path::from(object), expires_in)
            .await
            .map_err(sign_error)?;

        Ok(url.to_string())
    }
}

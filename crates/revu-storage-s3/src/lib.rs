//! S3 storage backend for revu.
//!
//! Implements the `revu-storage` writer traits on top of the AWS SDK.
//! Credentials come from the default provider chain; a custom endpoint can
//! be configured for S3-compatible stores (MinIO, LocalStack).

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::presigning::PresigningConfig;

use revu_storage::{
    ObjectWriter, StorageError, StorageErrorKind, UrlSigner, WriterFactory,
};

const BACKEND: &str = "S3";

/// Configuration for the S3 backend.
#[derive(Clone, Debug)]
pub struct S3Config {
    /// AWS region.
    pub region: String,
    /// S3-compatible endpoint URL.
    pub endpoint: Option<String>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_owned(),
            endpoint: None,
        }
    }
}

/// Client factory for the S3 backend.
#[derive(Clone, Debug)]
pub struct S3ClientFactory {
    config: S3Config,
}

impl S3ClientFactory {
    /// Create a factory with the given configuration.
    #[must_use]
    pub fn new(config: S3Config) -> Self {
        Self { config }
    }

    async fn build_client(&self) -> Client {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(self.config.region.clone()));

        if let Some(endpoint) = &self.config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;

        // Custom endpoints (LocalStack, MinIO) require path-style addressing
        // (endpoint/bucket/key) instead of the default virtual-hosted-style
        // (bucket.endpoint/key).
        if self.config.endpoint.is_some() {
            let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                .force_path_style(true)
                .build();
            return Client::from_conf(s3_config);
        }

        Client::new(&sdk_config)
    }
}

#[async_trait]
impl WriterFactory for S3ClientFactory {
    async fn new_writer(&self) -> Result<Box<dyn ObjectWriter>, StorageError> {
        Ok(Box::new(S3Writer {
            client: self.build_client().await,
        }))
    }

    async fn new_signer(&self) -> Result<Box<dyn UrlSigner>, StorageError> {
        Ok(Box::new(S3UrlSigner {
            client: self.build_client().await,
        }))
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}

/// Writes objects through one shared S3 client.
#[derive(Clone, Debug)]
pub struct S3Writer {
    client: Client,
}

#[async_trait]
impl ObjectWriter for S3Writer {
    async fn write(
        &self,
        bucket: &str,
        object: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(object)
            .body(content.into())
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::Write)
                    .with_backend(BACKEND)
                    .with_location(bucket, object)
                    .with_source(e)
            })?;

        tracing::debug!(bucket = %bucket, object = %object, "Uploaded");
        Ok(())
    }
}

/// Produces presigned GET URLs through one shared S3 client.
#[derive(Clone, Debug)]
pub struct S3UrlSigner {
    client: Client,
}

#[async_trait]
impl UrlSigner for S3UrlSigner {
    async fn signed_get_url(
        &self,
        bucket: &str,
        object: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let sign_error = |e: StorageError| e.with_backend(BACKEND).with_location(bucket, object);

        let presigning = PresigningConfig::expires_in(expires_in).map_err(|e| {
            sign_error(StorageError::new(StorageErrorKind::Sign).with_source(e))
        })?;

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(object)
            .presigned(presigning)
            .await
            .map_err(|e| sign_error(StorageError::new(StorageErrorKind::Sign).with_source(e)))?;

        Ok(request.uri().to_owned())
    }
}

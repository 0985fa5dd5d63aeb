//! Mock writer implementations for testing.
//!
//! Provides [`MockWriter`], [`MockSigner`] and [`MockFactory`] for unit
//! testing publishers without network access. The writer records every call
//! so tests can assert on exact write targets and call counts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::writer::{
    ObjectWriter, StorageError, StorageErrorKind, UrlSigner, WriterFactory,
};

const BACKEND: &str = "Mock";

/// One recorded `write` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedWrite {
    /// Bucket the write targeted.
    pub bucket: String,
    /// Object path the write targeted.
    pub object: String,
    /// Bytes that would have been uploaded.
    pub content: Vec<u8>,
    /// Content type passed by the caller.
    pub content_type: String,
}

#[derive(Debug, Default)]
struct MockState {
    writes: Mutex<Vec<RecordedWrite>>,
    fail_writes: AtomicBool,
}

/// In-memory writer recording every call.
///
/// Clones share state, so a test can keep one handle while the publisher
/// owns another.
#[derive(Clone, Debug, Default)]
pub struct MockWriter {
    state: Arc<MockState>,
}

impl MockWriter {
    /// Create a new mock writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `write` call fail.
    #[must_use]
    pub fn failing(self) -> Self {
        self.state.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    /// Snapshot of all recorded writes, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.state.writes.lock().unwrap().clone()
    }

    /// Number of `write` calls received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.writes.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectWriter for MockWriter {
    async fn write(
        &self,
        bucket: &str,
        object: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.state.writes.lock().unwrap().push(RecordedWrite {
            bucket: bucket.to_owned(),
            object: object.to_owned(),
            content,
            content_type: content_type.to_owned(),
        });

        if self.state.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::new(StorageErrorKind::Write)
                .with_backend(BACKEND)
                .with_location(bucket, object)
                .with_source(std::io::Error::other("simulated write failure")));
        }
        Ok(())
    }
}

/// Signer returning deterministic fake URLs.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockSigner;

#[async_trait]
impl UrlSigner for MockSigner {
    async fn signed_get_url(
        &self,
        bucket: &str,
        object: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        Ok(format!(
            "https://signed.invalid/{bucket}/{object}?expires={}",
            expires_in.as_secs()
        ))
    }
}

/// Factory handing out clones of one shared [`MockWriter`].
#[derive(Clone, Debug, Default)]
pub struct MockFactory {
    writer: MockWriter,
    fail_construction: bool,
}

impl MockFactory {
    /// Create a factory around a fresh writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory around an existing writer handle.
    #[must_use]
    pub fn with_writer(writer: MockWriter) -> Self {
        Self {
            writer,
            fail_construction: false,
        }
    }

    /// Make `new_writer` and `new_signer` fail.
    #[must_use]
    pub fn failing_construction(mut self) -> Self {
        self.fail_construction = true;
        self
    }

    /// Handle to the shared writer for post-hoc assertions.
    #[must_use]
    pub fn writer(&self) -> MockWriter {
        self.writer.clone()
    }

    fn construction_error(&self) -> StorageError {
        StorageError::new(StorageErrorKind::Construction)
            .with_backend(BACKEND)
            .with_source(std::io::Error::other("simulated construction failure"))
    }
}

#[async_trait]
impl WriterFactory for MockFactory {
    async fn new_writer(&self) -> Result<Box<dyn ObjectWriter>, StorageError> {
        if self.fail_construction {
            return Err(self.construction_error());
        }
        Ok(Box::new(self.writer.clone()))
    }

    async fn new_signer(&self) -> Result<Box<dyn UrlSigner>, StorageError> {
        if self.fail_construction {
            return Err(self.construction_error());
        }
        Ok(Box::new(MockSigner))
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}

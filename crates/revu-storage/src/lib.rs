//! Object storage write abstraction for revu.
//!
//! This crate defines the narrow capabilities a publisher needs from an
//! object-storage backend, so publishing logic never depends on a concrete
//! vendor client:
//!
//! - [`ObjectWriter`]: write bytes to `(bucket, object)` with a content type
//! - [`UrlSigner`]: produce a pre-signed read link for a written object
//! - [`WriterFactory`]: construct the two above, once, fail-fast
//!
//! Backend crates (`revu-storage-s3`, `revu-storage-gcs`) implement these
//! traits; [`MockWriter`]/[`MockFactory`] (behind the `mock` feature)
//! implement them for tests without network access.

#[cfg(feature = "mock")]
mod mock;
mod writer;

#[cfg(feature = "mock")]
pub use mock::{MockFactory, MockSigner, MockWriter, RecordedWrite};
pub use writer::{ObjectWriter, StorageError, StorageErrorKind, UrlSigner, WriterFactory};

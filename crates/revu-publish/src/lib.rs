//! Destination resolution and report publishing for revu.
//!
//! The public surface is small:
//!
//! - [`resolve`] / [`resolve_with_signer`]: pick and construct the publisher
//!   (and optionally a URL signer) matching a destination URI's scheme,
//!   failing fast when the backend's client factory is absent or broken
//! - [`Publisher`]: the single `publish` operation, implemented per backend
//!   by [`GcsPublisher`] and [`S3Publisher`]
//! - [`Destination`]: `bucket` + `object` parsed from a `gs://` or `s3://`
//!   URI
//!
//! Every `publish` call is one synchronous chain (parse, render, one write
//! attempt) with no internal retries and no shared mutable state, so
//! publisher instances can be reused across concurrent calls.

mod destination;
mod factory;
mod publisher;

pub use destination::{Destination, DestinationError};
pub use factory::{
    BackendRegistry, ResolveError, parse_destination, resolve, resolve_with_signer,
};
pub use publisher::{CONTENT_TYPE_HTML, GcsPublisher, PublishError, Publisher, S3Publisher};

//! CLI error types.

use revu_publish::{PublishError, ResolveError};
use revu_storage::StorageError;

use crate::config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("{0}")]
    Publish(#[from] PublishError),

    #[error("{0}")]
    Sign(#[from] StorageError),
}

/// Walk the error source chain and join all messages.
///
/// Skips sources whose message merely repeats the previous level (variants
/// that forward their Display to the wrapped error).
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msgs = vec![err.to_string()];
    let mut source = err.source();
    while let Some(s) = source {
        let msg = s.to_string();
        if msgs.last() != Some(&msg) {
            msgs.push(msg);
        }
        source = s.source();
    }
    msgs.join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_chain_joins_causes() {
        let inner = std::io::Error::other("inner cause");
        let err = CliError::Io(inner);

        assert_eq!(error_chain(&err), "inner cause");
    }

    #[test]
    fn test_error_chain_includes_nested_sources() {
        let storage = revu_storage::StorageError::new(revu_storage::StorageErrorKind::Write)
            .with_backend("S3")
            .with_source(std::io::Error::other("connection reset"));
        let err = CliError::Publish(PublishError::Write(storage));

        let chain = error_chain(&err);
        assert!(chain.contains("uploading report failed"));
        assert!(chain.contains("connection reset"));
    }
}

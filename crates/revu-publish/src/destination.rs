//! Destination URI parsing.
//!
//! Destinations have the shape `scheme://bucket/object/path...`. Each
//! backend owns a dedicated scheme predicate and parser rather than a
//! generic URL grammar: predicates are deliberately lenient (ASCII case
//! insensitive, alternative spellings like `gcs://`) and the object path is
//! taken verbatim after the first `/`.

/// Invalid destination URI.
#[derive(Debug, thiserror::Error)]
pub enum DestinationError {
    #[error("destination URI is empty")]
    Empty,

    #[error("expected a {expected} URI, got `{uri}`")]
    WrongScheme { expected: &'static str, uri: String },

    #[error("destination URI `{uri}` has no bucket")]
    MissingBucket { uri: String },

    #[error("destination URI `{uri}` has no object path")]
    MissingObject { uri: String },
}

/// Parsed destination: bucket plus object path, derived from one URI.
///
/// Never mutated after parsing; components needing bucket and path re-derive
/// them from the URI instead of caching a copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Destination {
    /// Bucket name.
    pub bucket: String,
    /// Object path within the bucket.
    pub object: String,
}

/// Scheme spellings recognized per backend. Distinct across backends, so at
/// most one predicate matches any URI.
pub(crate) const GS_SCHEMES: &[&str] = &["gs", "gcs"];
pub(crate) const S3_SCHEMES: &[&str] = &["s3"];

impl Destination {
    /// Parse a GCS destination (`gs://bucket/object`, `gcs://` accepted).
    ///
    /// # Errors
    ///
    /// Returns [`DestinationError`] if the URI is empty, has a different
    /// scheme, or lacks a bucket or object path.
    pub fn parse_gs(uri: &str) -> Result<Self, DestinationError> {
        parse(uri, GS_SCHEMES, "`gs://`")
    }

    /// Parse an S3 destination (`s3://bucket/object`).
    ///
    /// # Errors
    ///
    /// Returns [`DestinationError`] if the URI is empty, has a different
    /// scheme, or lacks a bucket or object path.
    pub fn parse_s3(uri: &str) -> Result<Self, DestinationError> {
        parse(uri, S3_SCHEMES, "`s3://`")
    }
}

/// Lenient scheme predicate for GCS destinations.
pub(crate) fn is_gs_uri(uri: &str) -> bool {
    strip_scheme(uri, GS_SCHEMES).is_some()
}

/// Lenient scheme predicate for S3 destinations.
pub(crate) fn is_s3_uri(uri: &str) -> bool {
    strip_scheme(uri, S3_SCHEMES).is_some()
}

/// Scheme portion of a URI, for error reporting.
pub(crate) fn uri_scheme(uri: &str) -> Option<&str> {
    uri.split_once("://").map(|(scheme, _)| scheme)
}

fn parse(
    uri: &str,
    schemes: &[&str],
    expected: &'static str,
) -> Result<Destination, DestinationError> {
    if uri.is_empty() {
        return Err(DestinationError::Empty);
    }

    let rest = strip_scheme(uri, schemes).ok_or_else(|| DestinationError::WrongScheme {
        expected,
        uri: uri.to_owned(),
    })?;

    let (bucket, object) = match rest.split_once('/') {
        Some((bucket, object)) => (bucket, object),
        None => (rest, ""),
    };

    if bucket.is_empty() {
        return Err(DestinationError::MissingBucket {
            uri: uri.to_owned(),
        });
    }
    if object.is_empty() {
        return Err(DestinationError::MissingObject {
            uri: uri.to_owned(),
        });
    }

    Ok(Destination {
        bucket: bucket.to_owned(),
        object: object.to_owned(),
    })
}

fn strip_scheme<'a>(uri: &'a str, schemes: &[&str]) -> Option<&'a str> {
    schemes.iter().find_map(|scheme| {
        strip_prefix_ignore_ascii_case(uri, scheme).and_then(|rest| rest.strip_prefix("://"))
    })
}

fn strip_prefix_ignore_ascii_case<'a>(uri: &'a str, prefix: &str) -> Option<&'a str> {
    let (head, tail) = uri.split_at_checked(prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then_some(tail)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_gs_simple() {
        let dest = Destination::parse_gs("gs://bucket/reports/a.html").unwrap();

        assert_eq!(dest.bucket, "bucket");
        assert_eq!(dest.object, "reports/a.html");
    }

    #[test]
    fn test_parse_gs_accepts_gcs_spelling() {
        let dest = Destination::parse_gs("gcs://bucket/a.html").unwrap();

        assert_eq!(dest.bucket, "bucket");
        assert_eq!(dest.object, "a.html");
    }

    #[test]
    fn test_parse_is_case_insensitive_on_scheme() {
        let dest = Destination::parse_s3("S3://Bucket/Path").unwrap();

        assert_eq!(dest.bucket, "Bucket");
        assert_eq!(dest.object, "Path");
    }

    #[test]
    fn test_parse_empty_uri() {
        assert!(matches!(
            Destination::parse_gs(""),
            Err(DestinationError::Empty)
        ));
    }

    #[test]
    fn test_parse_wrong_scheme() {
        let err = Destination::parse_gs("s3://bucket/path").unwrap_err();

        assert!(matches!(err, DestinationError::WrongScheme { .. }));
        assert!(err.to_string().contains("gs://"));
        assert!(err.to_string().contains("s3://bucket/path"));
    }

    #[test]
    fn test_parse_missing_bucket() {
        assert!(matches!(
            Destination::parse_s3("s3:///path"),
            Err(DestinationError::MissingBucket { .. })
        ));
    }

    #[test]
    fn test_parse_missing_object() {
        assert!(matches!(
            Destination::parse_gs("gs://bucket"),
            Err(DestinationError::MissingObject { .. })
        ));
        assert!(matches!(
            Destination::parse_gs("gs://bucket/"),
            Err(DestinationError::MissingObject { .. })
        ));
    }

    #[test]
    fn test_object_path_taken_verbatim() {
        let dest = Destination::parse_gs("gs://b/deep/ly/nested/path.html").unwrap();

        assert_eq!(dest.object, "deep/ly/nested/path.html");
    }

    #[test]
    fn test_predicates_are_disjoint() {
        for uri in ["gs://b/o", "gcs://b/o", "GS://b/o"] {
            assert!(is_gs_uri(uri), "{uri}");
            assert!(!is_s3_uri(uri), "{uri}");
        }
        for uri in ["s3://b/o", "S3://b/o"] {
            assert!(is_s3_uri(uri), "{uri}");
            assert!(!is_gs_uri(uri), "{uri}");
        }
        for uri in ["", "http://b/o", "gs:/b/o", "file:///tmp/x"] {
            assert!(!is_gs_uri(uri), "{uri}");
            assert!(!is_s3_uri(uri), "{uri}");
        }
    }

    #[test]
    fn test_predicate_survives_non_ascii_input() {
        assert!(!is_gs_uri("géé://bucket/object"));
        assert!(!is_s3_uri("ß3://bucket/object"));
    }

    #[test]
    fn test_uri_scheme() {
        assert_eq!(uri_scheme("ftp://x/y"), Some("ftp"));
        assert_eq!(uri_scheme("no-scheme"), None);
    }
}

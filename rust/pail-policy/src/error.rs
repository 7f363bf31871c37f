//! Errors raised while preparing an upload policy.

use thiserror::Error;

/// Errors raised before any policy is issued.
///
/// Policy and signature construction themselves cannot fail; everything the
/// storage service would reject (expired policy, oversized file) surfaces in
/// the browser at upload time instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No bucket configured.
    #[error("a bucket, access key id and secret access key must be set: bucket is missing")]
    MissingBucket,
    /// No access key id configured.
    #[error(
        "a bucket, access key id and secret access key must be set: access key id is missing"
    )]
    MissingAccessKeyId,
    /// No secret access key configured.
    #[error(
        "a bucket, access key id and secret access key must be set: secret access key is missing"
    )]
    MissingSecretAccessKey,
    /// The storage endpoint is not an absolute URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// The bucket name cannot be used as a single path segment.
    #[error("invalid bucket name: {0:?}")]
    InvalidBucket(String),
}

#![warn(missing_docs)]

//! Signed POST policies for direct browser uploads.
//!
//! This crate builds the policy document an S3-compatible service checks when
//! a browser submits a multipart `POST` straight to a bucket, and signs it
//! with the account's secret key. The application server hands the encoded
//! policy and signature to the browser; upload bytes never pass through it.
//!
//! The storage service enforces every condition embedded in the policy
//! (bucket, ACL, size cap, expiration), so nothing here validates those values
//! beyond their types.
//!
//! # Example
//!
//! ```
//! use pail_policy::{Acl, UploadPolicy};
//!
//! let policy = UploadPolicy::new(
//!     "my-bucket",
//!     "2030-01-01T00:00:00Z",
//!     Acl::PublicRead,
//!     10 * 1024 * 1024,
//! );
//!
//! let signed = policy.sign("wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY");
//! assert!(!signed.policy.contains('\n'));
//! assert!(!signed.signature.contains('\n'));
//! ```

pub mod acl;
pub mod credentials;
pub mod error;
pub mod policy;
pub mod signature;

pub use acl::Acl;
pub use credentials::Credentials;
pub use error::ConfigurationError;
pub use policy::{SignedPolicy, UploadPolicy, build_policy, expiration_after};
pub use signature::sign;

/// Status code the storage service answers a successful upload with.
///
/// Fixed in both the policy and the form fields so the browser receives an
/// XML body describing the stored object.
pub const SUCCESS_ACTION_STATUS: &str = "201";

/// Removes line breaks from base64 output so it fits a single-line form
/// field or script literal.
pub(crate) fn single_line(mut encoded: String) -> String {
    encoded.retain(|c| c != '\n' && c != '\r');
    encoded
}

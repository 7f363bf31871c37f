//! POST policy documents.
//!
//! A policy is a JSON document with an `expiration` and a list of
//! `conditions` the submitted form must satisfy. The storage service decodes
//! the base64 `policy` field, verifies the `signature` field against it and
//! then checks every condition before accepting the upload.
//!
//! Condition shapes follow the provider's form contract:
//!
//! - exact match: `{"bucket": "my-bucket"}`
//! - size range: `["content-length-range", 0, 104857600]`
//! - prefix match: `["starts-with", "$key", ""]`

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{Duration, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, SerializeTuple, Serializer};

use crate::signature::SigningKey;
use crate::{SUCCESS_ACTION_STATUS, single_line};

/// Form fields the browser fills in itself, accepted with any value.
const OPEN_FIELDS: [&str; 4] = ["key", "Content-Type", "name", "Filename"];

/// Constraints for a single browser upload session.
///
/// Built fresh for every render and discarded afterwards. None of the values
/// are checked here: an expired timestamp or a zero size cap produce a valid
/// document that the storage service will simply refuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    expiration: String,
    bucket: String,
    acl: String,
    max_filesize: u64,
}

impl UploadPolicy {
    /// Create a policy.
    ///
    /// # Arguments
    ///
    /// * `bucket` - Bucket the upload must target
    /// * `expiration` - ISO-8601 UTC timestamp after which the policy is void
    /// * `acl` - ACL the form must request, e.g. `public-read`
    /// * `max_filesize` - Largest accepted object in bytes
    pub fn new(
        bucket: impl Into<String>,
        expiration: impl Into<String>,
        acl: impl Into<String>,
        max_filesize: u64,
    ) -> Self {
        Self {
            expiration: expiration.into(),
            bucket: bucket.into(),
            acl: acl.into(),
            max_filesize,
        }
    }

    /// Create a policy that expires `lifetime` from now.
    pub fn expiring_in(
        bucket: impl Into<String>,
        acl: impl Into<String>,
        max_filesize: u64,
        lifetime: Duration,
    ) -> Self {
        Self::new(bucket, expiration_after(lifetime), acl, max_filesize)
    }

    /// Get the expiration timestamp.
    pub fn expiration(&self) -> &str {
        &self.expiration
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Get the ACL.
    pub fn acl(&self) -> &str {
        &self.acl
    }

    /// Get the size cap in bytes.
    pub fn max_filesize(&self) -> u64 {
        self.max_filesize
    }

    /// The policy document as JSON text.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("policy document is always serializable")
    }

    /// The policy document as single-line base64, ready for the `policy`
    /// form field.
    pub fn encode(&self) -> String {
        single_line(STANDARD.encode(self.to_json()))
    }

    /// Encode the policy and sign the encoded text.
    pub fn sign(&self, secret_key: &str) -> SignedPolicy {
        let policy = self.encode();
        let signature = SigningKey::new(secret_key)
            .sign(policy.as_bytes())
            .encode();

        tracing::debug!(
            bucket = %self.bucket,
            acl = %self.acl,
            expiration = %self.expiration,
            max_filesize = self.max_filesize,
            "issued upload policy"
        );

        SignedPolicy { policy, signature }
    }

    fn conditions(&self) -> Vec<Condition<'_>> {
        let mut conditions = vec![
            Condition::Exact("bucket", &self.bucket),
            Condition::Exact("acl", &self.acl),
            Condition::Exact("success_action_status", SUCCESS_ACTION_STATUS),
            Condition::ContentLengthRange(0, self.max_filesize),
        ];
        conditions.extend(OPEN_FIELDS.iter().map(|&field| Condition::StartsWith(field, "")));
        conditions
    }
}

impl Serialize for UploadPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("expiration", &self.expiration)?;
        map.serialize_entry("conditions", &Conditions(self.conditions()))?;
        map.end()
    }
}

/// One policy condition.
#[derive(Debug, Clone, Copy)]
enum Condition<'a> {
    /// Form field must equal the value.
    Exact(&'a str, &'a str),
    /// Uploaded object size must fall within the inclusive byte range.
    ContentLengthRange(u64, u64),
    /// Form field must start with the prefix.
    StartsWith(&'a str, &'a str),
}

impl Serialize for Condition<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Condition::Exact(field, value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(field, value)?;
                map.end()
            }
            Condition::ContentLengthRange(min, max) => {
                let mut seq = serializer.serialize_tuple(3)?;
                seq.serialize_element("content-length-range")?;
                seq.serialize_element(&min)?;
                seq.serialize_element(&max)?;
                seq.end()
            }
            Condition::StartsWith(field, prefix) => {
                let mut seq = serializer.serialize_tuple(3)?;
                seq.serialize_element("starts-with")?;
                seq.serialize_element(&format!("${}", field))?;
                seq.serialize_element(prefix)?;
                seq.end()
            }
        }
    }
}

struct Conditions<'a>(Vec<Condition<'a>>);

impl Serialize for Conditions<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for condition in &self.0 {
            seq.serialize_element(condition)?;
        }
        seq.end()
    }
}

/// Encoded policy and its signature, both single-line base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPolicy {
    /// Value of the `policy` form field.
    pub policy: String,
    /// Value of the `signature` form field.
    pub signature: String,
}

/// Build and encode a policy document.
///
/// Shorthand for [`UploadPolicy::new`] followed by [`UploadPolicy::encode`].
pub fn build_policy(bucket: &str, expiration: &str, acl: &str, max_filesize: u64) -> String {
    UploadPolicy::new(bucket, expiration, acl, max_filesize).encode()
}

/// ISO-8601 UTC timestamp `lifetime` from now, with second precision.
pub fn expiration_after(lifetime: Duration) -> String {
    (Utc::now() + lifetime).to_rfc3339_opts(SecondsFormat::Secs, true)
}

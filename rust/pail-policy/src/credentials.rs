//! Storage credentials used to issue upload policies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ConfigurationError;

/// Environment variable holding the bucket name.
pub const BUCKET_VAR: &str = "S3_BUCKET";
/// Environment variable holding the access key id.
pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the secret access key.
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";

/// Bucket and key pair that uploads are authorized against.
///
/// This is a plain data type: emptiness is checked by [`Credentials::validate`]
/// right before a policy is issued. Only the access key id ever reaches the
/// browser; the secret is used to sign and nothing else. The `Debug` output
/// redacts it and serializing skips it, so it can be loaded from
/// configuration but never written back out.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    bucket: String,
    access_key_id: String,
    #[serde(skip_serializing, default)]
    secret_access_key: String,
}

impl Credentials {
    /// Create credentials for the given bucket and key pair.
    pub fn new(
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Read credentials from `S3_BUCKET`, `AWS_ACCESS_KEY_ID` and
    /// `AWS_SECRET_ACCESS_KEY`.
    ///
    /// Unset variables become empty strings so that [`Credentials::validate`]
    /// names the missing one.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).unwrap_or_default();
        Self::new(
            var(BUCKET_VAR),
            var(ACCESS_KEY_ID_VAR),
            var(SECRET_ACCESS_KEY_VAR),
        )
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Get the access key id.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Get the secret access key.
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// Check that every field is set.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigurationError`] for the first empty field, checked
    /// in the order bucket, access key id, secret access key.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.bucket.trim().is_empty() {
            return Err(ConfigurationError::MissingBucket);
        }
        if self.access_key_id.trim().is_empty() {
            return Err(ConfigurationError::MissingAccessKeyId);
        }
        if self.secret_access_key.is_empty() {
            return Err(ConfigurationError::MissingSecretAccessKey);
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("bucket", &self.bucket)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use testresult::TestResult;

    #[test]
    fn it_accepts_complete_credentials() {
        let credentials = Credentials::new("my-bucket", "AKIATEST", "secret123");
        assert_eq!(credentials.validate(), Ok(()));
        assert_eq!(credentials.bucket(), "my-bucket");
        assert_eq!(credentials.access_key_id(), "AKIATEST");
        assert_eq!(credentials.secret_access_key(), "secret123");
    }

    #[test]
    fn it_reports_missing_bucket_first() {
        let credentials = Credentials::new("", "", "");
        assert_eq!(
            credentials.validate(),
            Err(ConfigurationError::MissingBucket)
        );
    }

    #[test]
    fn it_reports_missing_access_key_id() {
        let credentials = Credentials::new("my-bucket", " ", "secret123");
        assert_eq!(
            credentials.validate(),
            Err(ConfigurationError::MissingAccessKeyId)
        );
    }

    #[test]
    fn it_reports_missing_secret_access_key() {
        let credentials = Credentials::new("my-bucket", "AKIATEST", "");
        assert_eq!(
            credentials.validate(),
            Err(ConfigurationError::MissingSecretAccessKey)
        );
    }

    #[test]
    fn it_redacts_the_secret_in_debug_output() {
        let credentials = Credentials::new("my-bucket", "AKIATEST", "wJalrXUtnFEMI");
        let debug = format!("{:?}", credentials);

        assert!(debug.contains("AKIATEST"));
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("wJalrXUtnFEMI"));
    }

    #[test]
    fn it_never_serializes_the_secret() -> TestResult {
        let credentials = Credentials::new("my-bucket", "AKIATEST", "TOPSECRET");
        let json = serde_json::to_string(&credentials)?;

        assert!(json.contains("AKIATEST"));
        assert!(!json.contains("TOPSECRET"));
        assert!(!json.contains("secret_access_key"));
        Ok(())
    }

    #[test]
    fn it_deserializes_with_the_secret() -> TestResult {
        let credentials: Credentials = serde_json::from_str(
            r#"{"bucket":"my-bucket","access_key_id":"AKIATEST","secret_access_key":"secret123"}"#,
        )?;
        assert_eq!(
            credentials,
            Credentials::new("my-bucket", "AKIATEST", "secret123")
        );

        let reloaded: Credentials = serde_json::from_str(&serde_json::to_string(&credentials)?)?;
        assert_eq!(
            reloaded.validate(),
            Err(ConfigurationError::MissingSecretAccessKey)
        );
        Ok(())
    }

    #[test]
    fn it_reads_the_standard_variables() {
        let vars = HashMap::from([
            (BUCKET_VAR, "env-bucket"),
            (ACCESS_KEY_ID_VAR, "AKIAENV"),
            (SECRET_ACCESS_KEY_VAR, "env-secret"),
        ]);
        let credentials = Credentials::from_vars(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(
            credentials,
            Credentials::new("env-bucket", "AKIAENV", "env-secret")
        );
    }

    #[test]
    fn it_leaves_unset_variables_empty() {
        let credentials = Credentials::from_vars(|name| {
            (name == BUCKET_VAR).then(|| "env-bucket".to_string())
        });

        assert_eq!(credentials.bucket(), "env-bucket");
        assert_eq!(
            credentials.validate(),
            Err(ConfigurationError::MissingAccessKeyId)
        );
    }

    #[test]
    fn it_reads_credentials_from_the_environment() {
        // No other test in this crate reads these variables.
        unsafe {
            std::env::set_var(BUCKET_VAR, "env-bucket");
            std::env::set_var(ACCESS_KEY_ID_VAR, "AKIAENV");
            std::env::set_var(SECRET_ACCESS_KEY_VAR, "env-secret");
        }

        assert_eq!(
            Credentials::from_env(),
            Credentials::new("env-bucket", "AKIAENV", "env-secret")
        );
    }
}

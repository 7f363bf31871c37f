//! HMAC-SHA1 signatures over encoded policies.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::single_line;

/// Signing key for POST policies.
///
/// Browser form uploads authorized with an access key id and a `signature`
/// field use HMAC-SHA1 keyed with the raw secret access key.
#[derive(Clone)]
pub(crate) struct SigningKey(Hmac<Sha1>);

impl SigningKey {
    /// Create a signing key from the secret access key.
    pub(crate) fn new(secret_key: &str) -> Self {
        Self(Hmac::new_from_slice(secret_key.as_bytes()).expect("HMAC can take key of any size"))
    }

    /// Sign a message with this key.
    pub(crate) fn sign(&self, message: &[u8]) -> Signature {
        let mut mac = self.0.clone();
        mac.update(message);
        Signature(mac.finalize().into_bytes().to_vec())
    }
}

/// Raw HMAC-SHA1 digest.
pub(crate) struct Signature(Vec<u8>);

impl Signature {
    /// Base64 form used in the `signature` form field.
    pub(crate) fn encode(&self) -> String {
        single_line(STANDARD.encode(&self.0))
    }
}

/// Sign an encoded policy with the secret access key.
///
/// The message is the exact text that will be sent in the `policy` form
/// field, so callers must pass the single-line encoding. The result is the
/// base64 HMAC-SHA1 digest without line breaks. Signing is deterministic and
/// accepts any key, including an empty one; the storage service is the one
/// that rejects an unusable signature.
///
/// ```
/// assert_eq!(pail_policy::sign("a", "b"), "ZleFVoaCOYbIdDYnMROXUgFMtgs=");
/// ```
pub fn sign(secret_key: &str, encoded_policy: &str) -> String {
    SigningKey::new(secret_key)
        .sign(encoded_policy.as_bytes())
        .encode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_matches_known_vector() {
        assert_eq!(sign("a", "b"), "ZleFVoaCOYbIdDYnMROXUgFMtgs=");
    }

    #[test]
    fn it_is_deterministic() {
        let policy = "eyJleHBpcmF0aW9uIjoiYiJ9";
        assert_eq!(sign("secret", policy), sign("secret", policy));
    }

    #[test]
    fn it_depends_on_the_key() {
        let policy = "eyJleHBpcmF0aW9uIjoiYiJ9";
        assert_ne!(sign("secret", policy), sign("other", policy));
    }

    #[test]
    fn it_accepts_an_empty_key() {
        let signature = sign("", "b");
        // SHA-1 digest is 20 bytes, 28 base64 characters with padding.
        assert_eq!(signature.len(), 28);
    }

    #[test]
    fn it_reuses_a_signing_key() {
        let key = SigningKey::new("a");
        assert_eq!(key.sign(b"b").encode(), "ZleFVoaCOYbIdDYnMROXUgFMtgs=");
        assert_eq!(key.sign(b"b").encode(), sign("a", "b"));
    }
}

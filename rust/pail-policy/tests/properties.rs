use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use pail_policy::{build_policy, sign};
use proptest::prelude::*;
use serde_json::Value;

proptest! {
    #[test]
    fn signatures_are_deterministic_and_single_line(secret in ".*", message in ".*") {
        let first = sign(&secret, &message);
        let second = sign(&secret, &message);

        prop_assert_eq!(&first, &second);
        prop_assert!(!first.contains('\n'));
        prop_assert!(!first.contains('\r'));
    }

    #[test]
    fn policies_decode_to_the_fixed_shape(
        bucket in "[a-z0-9.-]{1,63}",
        expiration in "[0-9TZ:-]{1,24}",
        acl in "[a-z-]{1,32}",
        max_filesize in any::<u64>(),
    ) {
        let encoded = build_policy(&bucket, &expiration, &acl, max_filesize);
        prop_assert!(!encoded.contains('\n'));

        let document: Value = serde_json::from_slice(&STANDARD.decode(&encoded).unwrap()).unwrap();
        let object = document.as_object().unwrap();
        prop_assert_eq!(object.len(), 2);
        prop_assert_eq!(&document["expiration"], &Value::from(expiration));

        let conditions = document["conditions"].as_array().unwrap();
        prop_assert_eq!(conditions.len(), 8);
        prop_assert_eq!(&conditions[0]["bucket"], &Value::from(bucket));
        prop_assert_eq!(&conditions[1]["acl"], &Value::from(acl));
        prop_assert_eq!(&conditions[3][2], &Value::from(max_filesize));
    }

    #[test]
    fn policy_encoding_roundtrips(
        bucket in "\\PC{1,40}",
        acl in "\\PC{1,20}",
        max_filesize in any::<u64>(),
    ) {
        let encoded = build_policy(&bucket, "2030-01-01T00:00:00Z", &acl, max_filesize);
        let decoded = STANDARD.decode(&encoded).unwrap();

        prop_assert_eq!(STANDARD.encode(decoded), encoded);
    }
}

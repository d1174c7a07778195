// Canonical serialization and digests for chain metadata.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Canonicalizes a serializable value according to RFC 8785 (JCS) and
/// returns the UTF-8 bytes.
///
/// Object keys are sorted lexicographically and no whitespace is emitted,
/// so the same value always produces the same bytes.
pub fn canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let canonical = serde_jcs::to_string(value)?;
    Ok(canonical.into_bytes())
}

/// Computes the SHA-256 hash of the input bytes as a lowercase hex string.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_bytes_sorts_keys() {
        let json = r#"{"title": "Completion", "holderName": "Ada", "issueDate": "2024-01-01"}"#;
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        let bytes = canonical_bytes(&value).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"holderName":"Ada","issueDate":"2024-01-01","title":"Completion"}"#
        );
    }

    #[test]
    fn test_canonical_bytes_field_order_independent() {
        let a: serde_json::Value =
            serde_json::from_str(r#"{"b": 2, "a": 1}"#).unwrap();
        let b: serde_json::Value =
            serde_json::from_str(r#"{"a": 1, "b": 2}"#).unwrap();
        assert_eq!(canonical_bytes(&a).unwrap(), canonical_bytes(&b).unwrap());
    }

    #[test]
    fn test_sha256_known_hash() {
        // SHA-256 of the empty input is well-known.
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_is_lowercase_hex() {
        let digest = sha256_hex(b"certificate");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
    }
}

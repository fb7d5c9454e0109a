//! Hashing System - SHA-256 for Seeds and Catalogs
//!
//! The seed digest is the sole source of selection entropy.

use sha2::{Sha256, Digest};
use serde::{Serialize, Serializer};
use serde_json::{Value, to_string};

/// SHA-256 output of a seed's UTF-8 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeedDigest([u8; 32]);

impl SeedDigest {
    pub fn of(seed: &str) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&Sha256::digest(seed.as_bytes()));
        Self(bytes)
    }

    pub fn byte(&self, index: usize) -> u8 {
        self.0[index]
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Serialize for SeedDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    let sorted = sort_value(&v);
    to_string(&sorted)
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let sorted_map: serde_json::Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(arr) => {
            Value::Array(arr.iter().map(sort_value).collect())
        }
        _ => v.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": 3});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_seed_digest_known_vector() {
        let digest = SeedDigest::of("");
        assert_eq!(
            digest.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(digest.byte(0), 0xe3);
    }

    #[test]
    fn test_seed_digest_default() {
        let digest = SeedDigest::of("default");
        assert_eq!(&digest.as_bytes()[..6], &[55, 168, 238, 193, 206, 25]);
    }

    #[test]
    fn test_hash_deterministic() {
        let data = b"test data";
        assert_eq!(sha256_hex(data), sha256_hex(data));
        assert_eq!(sha256_hex(data).len(), 64);
    }

    #[test]
    fn test_digest_serializes_as_hex() {
        let digest = SeedDigest::of("default");
        let json = serde_json::to_value(digest).unwrap();
        assert_eq!(json, json!(digest.to_hex()));
    }
}

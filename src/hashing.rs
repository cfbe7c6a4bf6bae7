//! Hashing System - SHA-256 Fingerprints
//!
//! Schema and document fingerprints are taken over canonical JSON so the
//! same definitions always hash the same, whatever order keys were built in.

use serde::Serialize;
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256};

use crate::schema::DocumentType;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
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
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// Fingerprint of an ordered list of document types. Order is part of the
/// hash; preview functions are not (only their selections).
pub fn compute_schema_hash(types: &[DocumentType]) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(&types)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

/// Fingerprint of a document's content. System keys (`_id`, `_rev`,
/// `_createdAt`, ...) are left out; `_type` is kept.
pub fn compute_content_hash(document: &Value) -> Result<String, serde_json::Error> {
    let content = match document {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, _)| !k.starts_with('_') || k.as_str() == "_type")
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    };
    let canonical = canonical_json(&content)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaRegistry;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": 3});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_schema_hash_stable() {
        let h1 = compute_schema_hash(SchemaRegistry::studio().list()).unwrap();
        let h2 = compute_schema_hash(SchemaRegistry::studio().list()).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);

        let h3 = compute_schema_hash(SchemaRegistry::catalog().list()).unwrap();
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_content_hash_ignores_system_keys() {
        let a = json!({"_id": "one", "_type": "retreat", "title": "T"});
        let b = json!({"_id": "two", "_type": "retreat", "title": "T"});
        let c = json!({"_id": "one", "_type": "housing", "title": "T"});
        assert_eq!(compute_content_hash(&a).unwrap(), compute_content_hash(&b).unwrap());
        assert_ne!(compute_content_hash(&a).unwrap(), compute_content_hash(&c).unwrap());
    }
}

// Cache key derivation and hashing utilities

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::error::CacheError;

/// Maximum cache key length (Redis allows 512MB, but we use a practical limit)
/// Keys longer than this will be hashed
pub const MAX_KEY_LENGTH: usize = 250;

/// Builds a deterministic cache key from an endpoint resource name and its
/// query parameters.
///
/// The parameters are serialized to canonical JSON with object keys sorted
/// recursively, so two parameter sets with identical values but different
/// field order collide to the same key.
///
/// # Format
/// - Short keys: `{resource}:{canonical-json}`
/// - Long keys: `{resource}:hash:{sha256}`
///
/// # Errors
/// Returns `CacheError::SerializationError` if `params` cannot be serialized
/// to JSON.
pub fn build_key<P: Serialize>(resource: &str, params: &P) -> Result<String, CacheError> {
    let value = serde_json::to_value(params)?;
    let canonical = canonical_json(&value);

    let full_key = format!("{}:{}", resource, canonical);
    if full_key.len() > MAX_KEY_LENGTH {
        Ok(hash_long_key(resource, &canonical))
    } else {
        Ok(full_key)
    }
}

/// Glob pattern matching every key of a resource, for pattern invalidation
/// (e.g. `products:*` after a product write).
pub fn resource_pattern(resource: &str) -> String {
    format!("{}:*", resource)
}

/// Renders a JSON value with object keys sorted recursively.
///
/// Array element order is preserved; only object key order is normalized.
fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, val)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // serde_json handles string escaping for the key
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(val, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Hashes a long key using SHA256
///
/// Format: "{resource}:hash:{sha256}"
fn hash_long_key(resource: &str, canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());

    let hash = hasher.finalize();
    let hash_hex = hex::encode(hash);

    format!("{}:hash:{}", resource, hash_hex)
}

/// Validates a cache key before store operations
///
/// # Errors
/// Returns `CacheError::InvalidKey` if:
/// - Key is empty
/// - Key contains null bytes
pub fn validate_key(key: &str) -> Result<(), CacheError> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key is empty".to_string()));
    }

    if key.contains('\0') {
        return Err(CacheError::InvalidKey(
            "key contains null bytes".to_string(),
        ));
    }

    Ok(())
}

use serde::Serialize;
use sha2::{Digest, Sha256};
use crate::error::Result;

pub fn sha256_text(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// SHA-256 of the compact JSON form. `serde_json::Map` keeps keys sorted,
/// so equal documents hash equally regardless of insertion order.
pub fn sha256_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let canonical = serde_json::to_value(value)?;
    Ok(sha256_text(&serde_json::to_string(&canonical)?))
}

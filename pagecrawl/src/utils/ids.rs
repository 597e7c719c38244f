//! Identifier generation for chunks and crawl requests.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generates a request id for one crawl.
#[must_use]
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Short stable hash of a URL.
#[must_use]
pub fn url_hash(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..6])
}

/// Formats a non-negative integer in base 36.
#[must_use]
pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Builds a chunk id: `chunk_{url-hash}_{base36 millis}_{index}`.
///
/// All chunks of one page share `generated_at`, so ids differ only by index.
#[must_use]
pub fn generate_chunk_id(url: &str, generated_at: DateTime<Utc>, index: usize) -> String {
    let millis = u64::try_from(generated_at.timestamp_millis()).unwrap_or(0);
    format!("chunk_{}_{}_{}", url_hash(url), to_base36(millis), index)
}

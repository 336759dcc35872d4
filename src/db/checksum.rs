//! Checksum calculation for credential report content.

use sha2::{Digest, Sha256};

/// Calculate the SHA-256 hash of a report's content.
///
/// # Arguments
/// * `content` - Serialized report content
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_report_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

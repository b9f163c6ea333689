//! Checksum calculation for uploaded result files.
//!
//! Each import run records the SHA-256 of the uploaded content so operators
//! can tell whether two runs ingested the same file.

use sha2::{Digest, Sha256};

/// Calculate the SHA-256 checksum of an uploaded file's content.
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

//! Integrity: SHA-256 of a reassembled file so the host can show or compare it.

use sha2::{Digest, Sha256};

/// Hash a file buffer. Returns 32-byte digest.
pub fn hash_file(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Verify a file buffer against an expected digest.
pub fn verify_file(data: &[u8], expected: &[u8; 32]) -> bool {
    hash_file(data) == *expected
}

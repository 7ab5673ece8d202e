//! Shared hex digest utilities.

use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Compute a SHA-1 hex digest of the given bytes.
pub fn sha1_hex(data: &[u8]) -> String {
    let hash = Sha1::digest(data);
    format!("{hash:x}")
}

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

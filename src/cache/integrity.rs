//! Content Integrity Module
//!
//! Fingerprints cached content so corruption of stored bytes is detected
//! before they are ever served.

use sha2::{Digest, Sha256};

// == Integrity Store ==
/// Stateless content fingerprinting.
pub struct IntegrityStore;

impl IntegrityStore {
    /// Computes the SHA-256 fingerprint of `content` as a lowercase hex string.
    ///
    /// Deterministic and side-effect free; equal content always produces an
    /// equal fingerprint.
    pub fn fingerprint(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

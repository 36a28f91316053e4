// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content fingerprints — SHA-256 over the canonical PNG encoding of an image.

use bildpress_core::error::Result;
use bildpress_document::ImageContent;
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest identifying an image's pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Full hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading 12 hex characters, enough to tell images apart in log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Fingerprint `content` by re-encoding it as PNG and hashing those bytes.
///
/// The digest is taken after decoding, never over upload bytes, so a photo
/// arriving as JPEG and as PNG with the same pixels has one fingerprint.
pub fn compute_fingerprint(content: &ImageContent) -> Result<Fingerprint> {
    let canonical = content.to_png_bytes()?;
    Ok(Fingerprint(hash_bytes(&canonical)))
}

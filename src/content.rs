//! Content addressing for off-chain payloads
//!
//! Derives a stable identifier for a structured payload so it can be
//! referenced by hash on the ledger instead of embedded. This only names
//! content; making the referenced payload retrievable is the caller's
//! responsibility, out-of-band.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{RegistryError, Result};

/// Derive the content address of a serializable payload.
///
/// Canonicalizes through `serde_json::Value` (map keys are ordered), hashes
/// with SHA-256, and returns a `sha256-<hex>` string. Deterministic: equal
/// payloads always yield equal addresses, which lets callers detect
/// idempotent resubmission. The ledger itself does not deduplicate.
pub fn derive_content_address<T: Serialize + ?Sized>(payload: &T) -> Result<String> {
    let value = serde_json::to_value(payload)
        .map_err(|e| RegistryError::InvalidPayload(e.to_string()))?;
    let canonical = serde_json::to_string(&value)
        .map_err(|e| RegistryError::InvalidPayload(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(format!("sha256-{}", hex::encode(hasher.finalize())))
}

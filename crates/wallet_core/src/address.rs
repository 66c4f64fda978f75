//! EVM address validation - syntactic grammar plus EIP-55 checksum.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Why a candidate address was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("address is empty")]
    Empty,

    #[error("address must start with 0x")]
    BadPrefix,

    #[error("address must contain exactly 40 hex digits after 0x, got {0}")]
    BadLength(usize),

    #[error("address contains non-hexadecimal characters")]
    NonHex,

    #[error("mixed-case address failed the EIP-55 checksum")]
    ChecksumMismatch,
}

/// Validates candidate EVM account addresses.
///
/// Syntax first (`0x` followed by exactly 40 hex digits), then the EIP-55
/// mixed-case checksum. All-lowercase and all-uppercase addresses carry no
/// checksum information and pass on syntax alone. `strict_checksum` decides
/// whether a checksum mismatch rejects the address or is accepted with a
/// warning.
#[derive(Debug, Clone, Copy)]
pub struct AddressValidator {
    strict_checksum: bool,
}

impl Default for AddressValidator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AddressValidator {
    pub fn new(strict_checksum: bool) -> Self {
        Self { strict_checksum }
    }

    /// Convenience wrapper over [`validate`](Self::validate).
    pub fn is_valid(&self, candidate: &str) -> bool {
        self.validate(candidate).is_ok()
    }

    /// Check a candidate address. Callers trim surrounding whitespace
    /// before calling; no trimming happens here.
    pub fn validate(&self, candidate: &str) -> Result<(), ValidationError> {
        if candidate.is_empty() {
            return Err(ValidationError::Empty);
        }
        let body = candidate
            .strip_prefix("0x")
            .ok_or(ValidationError::BadPrefix)?;
        if body.len() != 40 {
            return Err(ValidationError::BadLength(body.len()));
        }
        if !body.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ValidationError::NonHex);
        }

        // Single-cased addresses carry no checksum.
        if !body.bytes().any(|b| b.is_ascii_uppercase())
            || !body.bytes().any(|b| b.is_ascii_lowercase())
        {
            return Ok(());
        }

        if checksum_matches(body) {
            Ok(())
        } else if self.strict_checksum {
            Err(ValidationError::ChecksumMismatch)
        } else {
            log::warn!("accepting address with EIP-55 checksum mismatch (strict_checksum=false)");
            Ok(())
        }
    }
}

/// EIP-55: Keccak-256 of the lowercase hex body; each letter must be
/// uppercase iff the corresponding hash nibble is >= 8.
fn checksum_matches(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    let hash = Keccak256::digest(lower.as_bytes());

    body.bytes().enumerate().all(|(i, ch)| {
        if !ch.is_ascii_alphabetic() {
            return true;
        }
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if nibble >= 8 {
            ch.is_ascii_uppercase()
        } else {
            ch.is_ascii_lowercase()
        }
    })
}

// ============================================
// File: crates/petrel-core/src/crypto/algorithms.rs
// ============================================
//! # Algorithm Descriptors
//!
//! ## Creation Reason
//! Describes the cipher and seal-digest algorithms a frame may use, plus
//! the per-call sealing configuration. Frames do not carry algorithm
//! identifiers on the wire; both peers agree on them at session setup and
//! pass descriptors into every encode/decode call.
//!
//! ## Main Functionality
//! - `CipherAlgorithm`: Supported symmetric ciphers with size queries
//! - `DigestAlgorithm`: Seal digests with build-availability queries
//! - `SealMode`: `Authenticated { digest, tag_len }` or `Unauthenticated`
//! - `SealPolicy`: Strict-mode and unauthenticated-frame configuration
//!
//! ## Algorithm Identifiers
//! | Value | Cipher |        | Value | Digest |
//! |-------|--------|        |-------|--------|
//! | 0x01  | AES-128-CBC |   | 0x01  | SHA-256 |
//! | 0x02  | AES-256-CBC |   | 0x02  | SHA-1 (weak fallback) |
//!
//! ## ⚠️ Important Note for Next Developer
//! - `SealPolicy` travels per call; there is deliberately no process-wide
//!   mutable switch for the fallback behavior
//! - Add new algorithms at the end of each table
//!
//! ## Last Modified
//! v0.1.0 - Initial algorithm descriptors

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================
// CipherAlgorithm
// ============================================

/// Symmetric cipher used to encrypt frame cleartext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CipherAlgorithm {
    /// AES-128 in CBC mode with PKCS#7 padding.
    Aes128Cbc = 0x01,
    /// AES-256 in CBC mode with PKCS#7 padding.
    Aes256Cbc = 0x02,
}

impl CipherAlgorithm {
    /// Converts an algorithm identifier byte to a `CipherAlgorithm`.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Self::Aes128Cbc),
            0x02 => Some(Self::Aes256Cbc),
            _ => None,
        }
    }

    /// Returns the algorithm identifier byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Returns the key size in bytes.
    #[must_use]
    pub const fn key_size(self) -> usize {
        match self {
            Self::Aes128Cbc => 16,
            Self::Aes256Cbc => 32,
        }
    }

    /// Returns the cipher block size in bytes.
    #[must_use]
    pub const fn block_size(self) -> usize {
        16
    }

    /// Returns the IV size in bytes (one block for CBC ciphers).
    #[must_use]
    pub const fn iv_size(self) -> usize {
        self.block_size()
    }
}

impl TryFrom<u8> for CipherAlgorithm {
    type Error = crate::error::CoreError;

    fn try_from(value: u8) -> crate::error::Result<Self> {
        Self::from_byte(value).ok_or(crate::error::CoreError::UnsupportedAlgorithm(value))
    }
}

impl fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aes128Cbc => write!(f, "AES-128-CBC"),
            Self::Aes256Cbc => write!(f, "AES-256-CBC"),
        }
    }
}

// ============================================
// DigestAlgorithm
// ============================================

/// Keyed digest used to seal a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DigestAlgorithm {
    /// HMAC-SHA-256 (requires the `strong-digests` feature).
    Sha256 = 0x01,
    /// HMAC-SHA-1. Always compiled in; serves as the weak fallback for
    /// constrained builds when the policy permits it.
    Sha1 = 0x02,
}

impl DigestAlgorithm {
    /// Digest substituted for an unavailable one when the seal policy is
    /// not strict.
    pub const WEAK_FALLBACK: Self = Self::Sha1;

    /// Converts an algorithm identifier byte to a `DigestAlgorithm`.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Self::Sha256),
            0x02 => Some(Self::Sha1),
            _ => None,
        }
    }

    /// Returns the algorithm identifier byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Returns the raw digest output size in bytes.
    #[must_use]
    pub const fn digest_size(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha1 => 20,
        }
    }

    /// Returns `true` if this digest is compiled into the current build.
    #[must_use]
    pub const fn is_available(self) -> bool {
        match self {
            Self::Sha256 => cfg!(feature = "strong-digests"),
            Self::Sha1 => true,
        }
    }

    /// Returns the digest name for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
            Self::Sha1 => "SHA-1",
        }
    }
}

impl TryFrom<u8> for DigestAlgorithm {
    type Error = crate::error::CoreError;

    fn try_from(value: u8) -> crate::error::Result<Self> {
        Self::from_byte(value).ok_or(crate::error::CoreError::UnsupportedAlgorithm(value))
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================
// SealMode
// ============================================

/// Sealing configuration for a frame.
///
/// The historical protocol expressed "no seal" as an absent digest
/// algorithm; here it is an explicit variant so that an unauthenticated
/// frame is always a visible decision, never an inferred one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SealMode {
    /// Seal frames with a keyed digest, truncated (or zero-expanded) to
    /// `tag_len` bytes on the wire.
    Authenticated {
        /// Digest algorithm for the seal.
        digest: DigestAlgorithm,
        /// Target seal length in bytes; must be non-zero.
        tag_len: usize,
    },
    /// Emit frames with `hmac_len = 0`. Peers only accept these when
    /// their `SealPolicy` explicitly allows it.
    Unauthenticated,
}

impl SealMode {
    /// Returns the number of seal bytes this mode puts on the wire.
    #[must_use]
    pub const fn tag_len(&self) -> usize {
        match self {
            Self::Authenticated { tag_len, .. } => *tag_len,
            Self::Unauthenticated => 0,
        }
    }

    /// Returns `true` if this mode seals frames.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

// ============================================
// SealPolicy
// ============================================

/// Caller-supplied verification policy.
///
/// # Defaults
/// Strict mode on, unauthenticated frames rejected. Both relaxations are
/// explicit opt-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealPolicy {
    /// When set, an unavailable digest is a hard error instead of a
    /// downgrade to [`DigestAlgorithm::WEAK_FALLBACK`].
    pub strict: bool,
    /// When set, frames with `hmac_len = 0` pass seal checking.
    pub allow_unauthenticated: bool,
}

impl Default for SealPolicy {
    fn default() -> Self {
        Self {
            strict: true,
            allow_unauthenticated: false,
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cipher_byte_roundtrip() {
        for alg in [CipherAlgorithm::Aes128Cbc, CipherAlgorithm::Aes256Cbc] {
            assert_eq!(CipherAlgorithm::from_byte(alg.as_byte()), Some(alg));
        }
        assert_eq!(CipherAlgorithm::from_byte(0x00), None);
        assert_eq!(CipherAlgorithm::from_byte(0xff), None);
    }

    #[test]
    fn test_reserved_identifiers_are_rejected() {
        use crate::error::CoreError;

        assert!(matches!(
            CipherAlgorithm::try_from(0x7f),
            Err(CoreError::UnsupportedAlgorithm(0x7f))
        ));
        assert!(matches!(
            DigestAlgorithm::try_from(0x00),
            Err(CoreError::UnsupportedAlgorithm(0x00))
        ));
        assert_eq!(DigestAlgorithm::try_from(0x02).unwrap(), DigestAlgorithm::Sha1);
    }

    #[test]
    fn test_cipher_sizes() {
        assert_eq!(CipherAlgorithm::Aes128Cbc.key_size(), 16);
        assert_eq!(CipherAlgorithm::Aes256Cbc.key_size(), 32);
        assert_eq!(CipherAlgorithm::Aes256Cbc.iv_size(), 16);
    }

    #[test]
    fn test_digest_sizes_and_availability() {
        assert_eq!(DigestAlgorithm::Sha256.digest_size(), 32);
        assert_eq!(DigestAlgorithm::Sha1.digest_size(), 20);

        // SHA-1 is the always-present fallback
        assert!(DigestAlgorithm::Sha1.is_available());
        assert!(DigestAlgorithm::WEAK_FALLBACK.is_available());
    }

    #[test]
    fn test_seal_mode_tag_len() {
        let sealed = SealMode::Authenticated {
            digest: DigestAlgorithm::Sha1,
            tag_len: 16,
        };
        assert_eq!(sealed.tag_len(), 16);
        assert!(sealed.is_authenticated());

        assert_eq!(SealMode::Unauthenticated.tag_len(), 0);
        assert!(!SealMode::Unauthenticated.is_authenticated());
    }

    #[test]
    fn test_policy_defaults_are_strict() {
        let policy = SealPolicy::default();
        assert!(policy.strict);
        assert!(!policy.allow_unauthenticated);
    }

    #[test]
    fn test_policy_serde_roundtrip() {
        let policy = SealPolicy {
            strict: false,
            allow_unauthenticated: true,
        };
        let json = serde_json::to_string(&policy).unwrap();
        let restored: SealPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(policy, restored);
    }
}
